//! The seam between the engine and the version-control tool.
//!
//! Every method returns raw text exactly as the tool prints it; parsing
//! lives in `log`, `metadata`, `diff` and `blame`. Implementations block
//! until the query finishes.

use crate::error::Result;

/// Inclusive 1-based line range for a blame query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn single(line: u32) -> Self {
        Self { start: line, end: line }
    }
}

pub trait VersionControl {
    /// No-merge, one-line-per-commit log of commits whose message contains `pattern`.
    fn log_grep(&self, pattern: &str) -> Result<String>;

    /// Header and message of a single commit.
    fn show_commit(&self, commit: &str) -> Result<String>;

    /// First parent of `commit`, or `None` for a root commit.
    fn predecessor(&self, commit: &str) -> Result<Option<String>>;

    /// Whitespace- and blank-line-insensitive unified diff from `commit` to `predecessor`.
    fn diff(&self, commit: &str, predecessor: &str) -> Result<String>;

    /// Annotated lines of `path` at `revision`, restricted to `ranges`.
    fn blame(&self, revision: &str, path: &str, ranges: &[LineRange]) -> Result<String>;
}
