use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One line of the defect-filtered log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub commit: String,
    pub message: String,
    pub bug: Option<String>,
}

/// Metadata of a commit, fetched once per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitNode {
    pub commit: String,
    pub notes: Vec<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub bug_ids: BTreeSet<String>,
}

impl CommitNode {
    /// First non-blank note line, i.e. the commit subject.
    pub fn title(&self) -> Option<&str> {
        self.notes
            .iter()
            .map(|note| note.trim())
            .find(|note| !note.is_empty())
    }
}

/// Abbreviated commit id for display.
pub fn short_id(commit: &str) -> &str {
    commit.get(..10).unwrap_or(commit)
}
