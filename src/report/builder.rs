//! The per-commit loop.
//!
//! For every primary commit, in log order: metadata, predecessor, diff,
//! blame, metadata of the replaced commits, and only then the fold into
//! the closure and the palette. All queries for a commit run before any
//! run state changes, so a skipped commit leaves no trace in the closure.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::git::blame::attribute_blame;
use crate::git::diff::parse_unified_diff;
use crate::git::log::lookup_commits;
use crate::git::metadata::CommitStore;
use crate::git::query::VersionControl;
use crate::models::{
    BlameMap, CommitSection, FileDiff, LogEntry, Report, SkippedCommit, short_id,
};
use crate::report::closure::CommitClosure;
use crate::report::palette::CommitPalette;
use crate::report::{FailurePolicy, ReportConfig};

/// State threaded through the whole run.
#[derive(Debug)]
pub struct RunState {
    pub closure: CommitClosure,
    pub palette: CommitPalette,
    pub commits: CommitStore,
}

impl RunState {
    pub fn new(palette_size: usize) -> Self {
        Self {
            closure: CommitClosure::default(),
            palette: CommitPalette::new(palette_size),
            commits: CommitStore::default(),
        }
    }

    fn into_report(
        self,
        bug: &str,
        sections: Vec<CommitSection>,
        skipped: Vec<SkippedCommit>,
    ) -> Report {
        let palette = self.palette.into_classes();
        // Metadata fetched for a skipped commit is not part of the report.
        let commits: BTreeMap<_, _> = self
            .commits
            .into_nodes()
            .into_iter()
            .filter(|(commit, _)| palette.contains_key(commit))
            .collect();

        Report {
            bug: bug.to_string(),
            sections,
            commits,
            replacement_tree: self.closure.replacement_tree,
            palette,
            skipped,
        }
    }
}

/// Build the report for `bug` from every non-merge commit that mentions it.
pub fn build_report<V: VersionControl + ?Sized>(
    vcs: &V,
    bug: &str,
    config: &ReportConfig,
) -> Result<Report> {
    let entries = lookup_commits(vcs, bug)?;
    let mut state = RunState::new(config.palette_size);
    let mut sections = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for entry in &entries {
        match process_commit(vcs, entry, &mut state) {
            Ok(section) => sections.push(section),
            Err(err) if config.failure_policy == FailurePolicy::Skip => {
                tracing::warn!("Skipping commit {}: {}", short_id(&entry.commit), err);
                skipped.push(SkippedCommit {
                    commit: entry.commit.clone(),
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(
        "Report for {}: {} section(s), {} commit(s) involved, {} skipped",
        bug,
        sections.len(),
        state.closure.known.len(),
        skipped.len()
    );

    Ok(state.into_report(bug, sections, skipped))
}

fn process_commit<V: VersionControl + ?Sized>(
    vcs: &V,
    entry: &LogEntry,
    state: &mut RunState,
) -> Result<CommitSection> {
    let primary = entry.commit.as_str();
    let node = state.commits.get_or_fetch(vcs, primary)?;
    tracing::info!(
        "Processing {} {}",
        short_id(primary),
        node.title().unwrap_or(entry.message.as_str())
    );

    let predecessor = vcs.predecessor(primary)?;
    let (diff, blame, issues) = match &predecessor {
        Some(parent) => {
            let diff = parse_unified_diff(&vcs.diff(primary, parent)?);
            if diff.is_empty() {
                tracing::debug!("{} has no textual changes against {}", short_id(primary), short_id(parent));
            }
            let (blame, issues) = attribute_blame(vcs, parent, &diff)?;
            (diff, blame, issues)
        }
        None => {
            tracing::debug!("{} is a root commit; nothing was replaced", short_id(primary));
            (FileDiff::default(), BlameMap::default(), Vec::new())
        }
    };

    for replaced in blame.blamed_commits() {
        if replaced != primary {
            state.commits.get_or_fetch(vcs, replaced)?;
        }
    }

    let discovered = state.closure.extend(primary, &blame);
    if !discovered.is_empty() {
        tracing::debug!("{} replaced {} new commit(s)", short_id(primary), discovered.len());
    }
    state.palette.extend(primary, &state.closure.known);

    Ok(CommitSection {
        commit: entry.commit.clone(),
        message: entry.message.clone(),
        bug: entry.bug.clone(),
        predecessor,
        replaces: state
            .closure
            .replaced_by(primary)
            .cloned()
            .unwrap_or_default(),
        diff,
        blame,
        warnings: issues.iter().map(ToString::to_string).collect(),
    })
}
