//! Data transfer objects produced by the engine.
//!
//! These structs are serialized to JSON for the rendering layer.
//! - `commit`: LogEntry, CommitNode
//! - `diff`: FileDiff, LineRecord, LineKind
//! - `blame`: BlameMap, BlameEntry for per-line provenance
//! - `report`: Report, CommitSection, PaletteClass, RepositoryInfo

pub mod blame;
pub mod commit;
pub mod diff;
pub mod report;

pub use blame::*;
pub use commit::*;
pub use diff::*;
pub use report::*;
