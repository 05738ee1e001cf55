//! Report assembly for a defect id.
//!
//! - `closure`: one-level closure of replaced commits
//! - `palette`: stable palette classes per commit
//! - `builder`: the sequential per-commit loop producing a `Report`

pub mod builder;
pub mod closure;
pub mod palette;

pub use builder::build_report;

use palette::DEFAULT_PALETTE_SIZE;

/// What to do when a VCS query for one primary commit fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the commit as skipped and continue with the next one
    #[default]
    Skip,
    /// Abort the whole run
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    pub palette_size: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            palette_size: DEFAULT_PALETTE_SIZE,
            failure_policy: FailurePolicy::default(),
        }
    }
}
