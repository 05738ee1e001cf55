//! Blame data transfer objects.
//!
//! Provides per-line provenance for the predecessor lines a commit replaced.
//! Used by the report sections to show who last modified each displaced line.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Provenance of a single predecessor line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlameEntry {
    /// Commit that last modified the line
    pub commit: String,
    /// Author name of that commit
    pub author: String,
    /// Author timestamp, with the author's offset preserved
    pub timestamp: DateTime<FixedOffset>,
}

/// path -> (new line number -> provenance)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BlameMap {
    pub files: BTreeMap<String, BTreeMap<u32, BlameEntry>>,
}

impl BlameMap {
    #[cfg(test)]
    pub fn entry(&self, path: &str, line: u32) -> Option<&BlameEntry> {
        self.files.get(path).and_then(|lines| lines.get(&line))
    }

    /// Distinct blamed commits in discovery order (file order, then line order).
    pub fn blamed_commits(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.files
            .values()
            .flat_map(|lines| lines.values())
            .map(|entry| entry.commit.as_str())
            .filter(|commit| seen.insert(*commit))
            .collect()
    }
}
