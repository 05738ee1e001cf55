//! In-memory `VersionControl` with canned output, recording every query.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::git::query::{LineRange, VersionControl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Log(String),
    Show(String),
    Predecessor(String),
    Diff(String, String),
    Blame(String, String, Vec<LineRange>),
}

#[derive(Default)]
pub struct ScriptedVcs {
    logs: HashMap<String, String>,
    shows: HashMap<String, String>,
    parents: HashMap<String, Option<String>>,
    diffs: HashMap<(String, String), String>,
    blames: HashMap<(String, String), String>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedVcs {
    pub fn with_log(mut self, pattern: &str, output: &str) -> Self {
        self.logs.insert(pattern.to_string(), output.to_string());
        self
    }

    pub fn with_show(mut self, commit: &str, output: &str) -> Self {
        self.shows.insert(commit.to_string(), output.to_string());
        self
    }

    pub fn with_parent(mut self, commit: &str, parent: Option<&str>) -> Self {
        self.parents
            .insert(commit.to_string(), parent.map(str::to_string));
        self
    }

    pub fn with_diff(mut self, commit: &str, predecessor: &str, output: &str) -> Self {
        self.diffs.insert(
            (commit.to_string(), predecessor.to_string()),
            output.to_string(),
        );
        self
    }

    pub fn with_blame(mut self, revision: &str, path: &str, output: &str) -> Self {
        self.blames
            .insert((revision.to_string(), path.to_string()), output.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn show_count(&self, commit: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Show(c) if c == commit))
            .count()
    }

    pub fn blame_requests(&self) -> Vec<(String, String, Vec<LineRange>)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Blame(rev, path, ranges) => Some((rev.clone(), path.clone(), ranges.clone())),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl VersionControl for ScriptedVcs {
    fn log_grep(&self, pattern: &str) -> Result<String> {
        self.record(Call::Log(pattern.to_string()));
        Ok(self.logs.get(pattern).cloned().unwrap_or_default())
    }

    fn show_commit(&self, commit: &str) -> Result<String> {
        self.record(Call::Show(commit.to_string()));
        self.shows
            .get(commit)
            .cloned()
            .ok_or_else(|| AppError::CommitNotFound(commit.to_string()))
    }

    fn predecessor(&self, commit: &str) -> Result<Option<String>> {
        self.record(Call::Predecessor(commit.to_string()));
        self.parents
            .get(commit)
            .cloned()
            .ok_or_else(|| AppError::CommitNotFound(commit.to_string()))
    }

    fn diff(&self, commit: &str, predecessor: &str) -> Result<String> {
        self.record(Call::Diff(commit.to_string(), predecessor.to_string()));
        self.diffs
            .get(&(commit.to_string(), predecessor.to_string()))
            .cloned()
            .ok_or_else(|| AppError::Command {
                command: format!("git diff {} {}", commit, predecessor),
                status: "exit status: 128".to_string(),
                stderr: "fatal: bad revision".to_string(),
            })
    }

    fn blame(&self, revision: &str, path: &str, ranges: &[LineRange]) -> Result<String> {
        self.record(Call::Blame(
            revision.to_string(),
            path.to_string(),
            ranges.to_vec(),
        ));
        Ok(self
            .blames
            .get(&(revision.to_string(), path.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
