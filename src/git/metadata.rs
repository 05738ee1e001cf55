//! Commit metadata parsing and the per-run memo.
//!
//! Only the header lines are structured (`commit`, `Author:`, `Date:`);
//! every other line before the first `diff` line is a note. A header that
//! is absent leaves its field `None` rather than a guessed default.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::git::log::ISSUE_ID;
use crate::git::query::VersionControl;
use crate::models::CommitNode;

static AUTHOR_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Author:\s*(.*?)\s*<([^>]*)>\s*$").unwrap());

/// Fallbacks after RFC 3339: git's default date format, then `--date=iso`.
const DATE_FORMATS: [&str; 2] = ["%a %b %e %H:%M:%S %Y %z", "%Y-%m-%d %H:%M:%S %z"];

fn parse_commit_date(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok().or_else(|| {
        DATE_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(value, format).ok())
    })
}

/// Parse the output of a single-commit log query.
pub fn parse_commit_metadata(commit: &str, raw: &str) -> CommitNode {
    let mut node = CommitNode {
        commit: commit.to_string(),
        ..CommitNode::default()
    };

    for line in raw.lines() {
        if line.starts_with("diff") {
            break;
        }

        if let Some(rest) = line.strip_prefix("commit ") {
            if let Some(id) = rest.split_whitespace().next() {
                node.commit = id.to_string();
            }
        } else if let Some(rest) = line.strip_prefix("Date:") {
            node.timestamp = parse_commit_date(rest.trim());
            if node.timestamp.is_none() {
                tracing::debug!("Unrecognised date {:?} for {}", rest.trim(), commit);
            }
        } else if line.starts_with("Author:") {
            match AUTHOR_LINE.captures(line) {
                Some(caps) => {
                    node.author = Some(caps[1].to_string());
                    node.email = Some(caps[2].to_string());
                }
                None => {
                    let name = line["Author:".len()..].trim();
                    node.author = (!name.is_empty()).then(|| name.to_string());
                }
            }
        } else {
            let note = line.strip_prefix("    ").unwrap_or(line);
            node.bug_ids
                .extend(ISSUE_ID.find_iter(note).map(|m| m.as_str().to_string()));
            node.notes.push(note.to_string());
        }
    }

    trim_blank_notes(&mut node.notes);

    if node.author.is_none() {
        tracing::debug!("No author header for {}", commit);
    }
    if node.timestamp.is_none() {
        tracing::debug!("No date header for {}", commit);
    }

    node
}

fn trim_blank_notes(notes: &mut Vec<String>) {
    let end = notes
        .iter()
        .rposition(|note| !note.trim().is_empty())
        .map_or(0, |i| i + 1);
    notes.truncate(end);
    let start = notes
        .iter()
        .position(|note| !note.trim().is_empty())
        .unwrap_or(notes.len());
    notes.drain(..start);
}

/// Commit metadata fetched at most once per commit id.
#[derive(Debug, Default)]
pub struct CommitStore {
    nodes: BTreeMap<String, CommitNode>,
}

impl CommitStore {
    pub fn get_or_fetch<V: VersionControl + ?Sized>(
        &mut self,
        vcs: &V,
        commit: &str,
    ) -> Result<&CommitNode> {
        match self.nodes.entry(commit.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                tracing::debug!("Fetching metadata for {}", commit);
                let raw = vcs.show_commit(commit)?;
                Ok(entry.insert(parse_commit_metadata(commit, &raw)))
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, commit: &str) -> Option<&CommitNode> {
        self.nodes.get(commit)
    }

    pub fn into_nodes(self) -> BTreeMap<String, CommitNode> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::ScriptedVcs;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const SHOW_OUTPUT: &str = indoc! {"
        commit a1b2c3d4e5f60718293a4b5c6d7e8f9012345678
        Author: Jane Doe <jane@example.com>
        Date:   2020-01-01T10:00:00+00:00

            Fix null check in parser (ABC-123)

            The tokenizer returned None for empty input.
            Refs: XYZ-9
    "};

    #[test]
    fn test_parse_headers_and_notes() {
        let node = parse_commit_metadata("a1b2c3d4e5", SHOW_OUTPUT);

        assert_eq!(node.commit, "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678");
        assert_eq!(node.author.as_deref(), Some("Jane Doe"));
        assert_eq!(node.email.as_deref(), Some("jane@example.com"));
        assert_eq!(
            node.timestamp.map(|t| t.to_rfc3339()),
            Some("2020-01-01T10:00:00+00:00".to_string())
        );
        assert_eq!(
            node.notes,
            vec![
                "Fix null check in parser (ABC-123)",
                "",
                "The tokenizer returned None for empty input.",
                "Refs: XYZ-9",
            ]
        );
        assert_eq!(node.title(), Some("Fix null check in parser (ABC-123)"));
        assert_eq!(
            node.bug_ids.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["ABC-123", "XYZ-9"]
        );
    }

    #[test]
    fn test_default_git_date_format() {
        let node = parse_commit_metadata(
            "abc",
            "commit abc\nAuthor: A <a@b>\nDate:   Wed Jan 1 10:00:00 2020 +0100\n",
        );

        assert_eq!(
            node.timestamp.map(|t| t.to_rfc3339()),
            Some("2020-01-01T10:00:00+01:00".to_string())
        );
    }

    #[test]
    fn test_missing_headers_stay_absent() {
        let node = parse_commit_metadata("abc", "commit abc\n\n    Message only\n");

        assert_eq!(node.author, None);
        assert_eq!(node.email, None);
        assert_eq!(node.timestamp, None);
        assert_eq!(node.notes, vec!["Message only"]);
    }

    #[test]
    fn test_notes_stop_at_diff() {
        let raw = indoc! {"
            commit abc
            Author: Jane Doe <jane@example.com>

                Subject ABC-1
            diff --git a/x b/x
            +ZZZ-2
        "};

        let node = parse_commit_metadata("abc", raw);

        assert_eq!(node.notes, vec!["Subject ABC-1"]);
        assert!(!node.bug_ids.contains("ZZZ-2"));
    }

    #[test]
    fn test_metadata_fetched_once() {
        let vcs = ScriptedVcs::default().with_show("a1b2c3d4e5", SHOW_OUTPUT);
        let mut store = CommitStore::default();

        let first = store.get_or_fetch(&vcs, "a1b2c3d4e5").unwrap().clone();
        let second = store.get_or_fetch(&vcs, "a1b2c3d4e5").unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(vcs.show_count("a1b2c3d4e5"), 1);
        assert!(store.get("a1b2c3d4e5").is_some());
    }

    #[test]
    fn test_failed_fetch_is_not_memoized() {
        let vcs = ScriptedVcs::default();
        let mut store = CommitStore::default();

        assert!(store.get_or_fetch(&vcs, "deadbeef").is_err());
        assert!(store.get("deadbeef").is_none());
    }
}
