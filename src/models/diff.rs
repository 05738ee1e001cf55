//! Parsed unified-diff DTOs.
//!
//! - `LineRecord`: one physical line of a diff body, classified
//! - `LineKind`: the tag of a `LineRecord`, for tabular views
//! - `FileDiff`: per-file record sequences keyed by new-side path
//!
//! The diff is taken from a commit towards its predecessor, so the "new"
//! side is the predecessor: `Added` lines are the lines the commit replaced.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineRecord {
    HunkHeader { text: String },
    Context { old_line: u32, new_line: u32, text: String },
    Removed { old_line: u32, text: String },
    Added { new_line: u32, text: String },
    Raw { text: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    HunkHeader,
    Context,
    Removed,
    Added,
    Raw,
}

impl LineRecord {
    pub fn kind(&self) -> LineKind {
        match self {
            LineRecord::HunkHeader { .. } => LineKind::HunkHeader,
            LineRecord::Context { .. } => LineKind::Context,
            LineRecord::Removed { .. } => LineKind::Removed,
            LineRecord::Added { .. } => LineKind::Added,
            LineRecord::Raw { .. } => LineKind::Raw,
        }
    }

    #[cfg(test)]
    pub fn old_line(&self) -> Option<u32> {
        match self {
            LineRecord::Context { old_line, .. } | LineRecord::Removed { old_line, .. } => {
                Some(*old_line)
            }
            _ => None,
        }
    }

    pub fn new_line(&self) -> Option<u32> {
        match self {
            LineRecord::Context { new_line, .. } | LineRecord::Added { new_line, .. } => {
                Some(*new_line)
            }
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        match self {
            LineRecord::HunkHeader { text }
            | LineRecord::Context { text, .. }
            | LineRecord::Removed { text, .. }
            | LineRecord::Added { text, .. }
            | LineRecord::Raw { text } => text,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FileDiff {
    pub files: BTreeMap<String, Vec<LineRecord>>,
}

impl FileDiff {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn records(&self, path: &str) -> Option<&[LineRecord]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// New-side line numbers of every `Added` record in `path`, in diff order.
    pub fn added_lines(&self, path: &str) -> Vec<u32> {
        self.records(path)
            .unwrap_or_default()
            .iter()
            .filter(|record| record.kind() == LineKind::Added)
            .filter_map(LineRecord::new_line)
            .collect()
    }
}
