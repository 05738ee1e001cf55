//! Report DTOs handed to the rendering layer.
//!
//! - `Report`: everything produced for one defect id
//! - `CommitSection`: one primary commit with its parsed diff and blame
//! - `PaletteClass`: stable visual class of a commit across the report
//! - `SkippedCommit`: a primary commit whose VCS queries failed

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{BlameMap, CommitNode, FileDiff};

/// Class 0 is reserved for primary commits; 1..=N are palette entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PaletteClass(pub u8);

impl PaletteClass {
    pub const CURRENT: PaletteClass = PaletteClass(0);

    /// Class for a zero-based palette slot.
    pub fn slot(index: usize) -> Self {
        PaletteClass(u8::try_from(index + 1).unwrap_or(u8::MAX))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSection {
    pub commit: String,
    pub message: String,
    pub bug: Option<String>,
    pub predecessor: Option<String>,
    /// Commits whose lines this commit displaced
    pub replaces: BTreeSet<String>,
    pub diff: FileDiff,
    pub blame: BlameMap,
    /// Blame lines that could not be attributed
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedCommit {
    pub commit: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub bug: String,
    pub sections: Vec<CommitSection>,
    /// Metadata for every primary and replaced commit
    pub commits: BTreeMap<String, CommitNode>,
    pub replacement_tree: BTreeMap<String, BTreeSet<String>>,
    pub palette: BTreeMap<String, PaletteClass>,
    pub skipped: Vec<SkippedCommit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub path: String,
    pub head_branch: Option<String>,
    pub head_commit: Option<String>,
}
