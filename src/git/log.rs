use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ParseIssue, Result};
use crate::git::query::VersionControl;
use crate::models::LogEntry;

pub static ISSUE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]{3,}-[0-9]+").unwrap());

/// First issue-id-like token in `text`.
pub fn parse_bug_id(text: &str) -> Option<String> {
    ISSUE_ID.find(text).map(|m| m.as_str().to_string())
}

/// Split a one-line log entry on its first whitespace run.
pub fn parse_log_line(line: &str) -> std::result::Result<LogEntry, ParseIssue> {
    let line = line.trim_end();
    let (commit, message) = match line.split_once(char::is_whitespace) {
        Some((commit, rest)) => (commit, rest.trim_start()),
        None => (line, ""),
    };

    if commit.is_empty() || !commit.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseIssue::UnparsableLogLine(line.to_string()));
    }

    Ok(LogEntry {
        commit: commit.to_string(),
        message: message.to_string(),
        bug: parse_bug_id(message),
    })
}

pub fn parse_log_output(raw: &str) -> Vec<LogEntry> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_log_line(line) {
            Ok(entry) => Some(entry),
            Err(issue) => {
                tracing::warn!("{}", issue);
                None
            }
        })
        .collect()
}

/// Primary commits for `bug`, newest first as the log prints them.
pub fn lookup_commits<V: VersionControl + ?Sized>(vcs: &V, bug: &str) -> Result<Vec<LogEntry>> {
    let raw = vcs.log_grep(bug)?;
    let entries = parse_log_output(&raw);
    tracing::info!("Found {} commit(s) referencing {}", entries.len(), bug);
    Ok(entries)
}
