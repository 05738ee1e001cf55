//! One-level closure of replaced commits.
//!
//! Each primary commit records the commits its blame output points at. The
//! blamed commits are not re-blamed; `known` only grows transitively because
//! several primaries accumulate into the same run.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::BlameMap;

/// Every commit seen so far, in discovery order.
#[derive(Debug, Default, Clone)]
pub struct KnownCommits {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl KnownCommits {
    /// Returns `true` when `commit` was not known before.
    pub fn insert(&mut self, commit: &str) -> bool {
        if !self.seen.insert(commit.to_string()) {
            return false;
        }
        self.order.push(commit.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

#[derive(Debug, Default, Clone)]
pub struct CommitClosure {
    pub known: KnownCommits,
    pub replacement_tree: BTreeMap<String, BTreeSet<String>>,
}

impl CommitClosure {
    /// Fold one primary commit's blame output in and return the commits it
    /// replaces that were not known before, in discovery order.
    pub fn extend(&mut self, primary: &str, blame: &BlameMap) -> Vec<String> {
        self.known.insert(primary);

        let mut branch = BTreeSet::new();
        let mut discovered = Vec::new();
        for commit in blame.blamed_commits() {
            if commit == primary {
                continue;
            }
            branch.insert(commit.to_string());
            if self.known.insert(commit) {
                discovered.push(commit.to_string());
            }
        }

        self.replacement_tree.insert(primary.to_string(), branch);
        discovered
    }

    pub fn replaced_by(&self, primary: &str) -> Option<&BTreeSet<String>> {
        self.replacement_tree.get(primary)
    }
}
