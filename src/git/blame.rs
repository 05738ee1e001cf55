//! Line-range blame of the lines a commit replaced.
//!
//! For every file with `Added` records (predecessor-side lines), one blame
//! query is issued against the predecessor with a single-line range per
//! added line, so each result is keyed exactly to an added line even when a
//! file has several disjoint runs.

use std::collections::BTreeMap;

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ParseIssue, Result};
use crate::git::query::{LineRange, VersionControl};
use crate::models::{BlameEntry, BlameMap, FileDiff};

/// `<hash> [<path>] (<author> <YYYY-MM-DD HH:MM:SS ±ZZZZ> <line>) <content>`
static BLAME_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\^?([0-9a-fA-F]+)[^(]*\((.+?)\s+(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} [+-]\d{4})\D*?(\d+)\)",
    )
    .unwrap()
});

const BLAME_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Parse a single annotated line into `(line number, entry)`.
pub fn parse_blame_line(line: &str) -> Option<(u32, BlameEntry)> {
    let caps = BLAME_LINE.captures(line)?;
    let timestamp = DateTime::parse_from_str(&caps[3], BLAME_DATE_FORMAT).ok()?;
    let line_number = caps[4].parse().ok()?;

    Some((
        line_number,
        BlameEntry {
            commit: caps[1].to_string(),
            author: caps[2].trim_end().to_string(),
            timestamp,
        },
    ))
}

/// Parse the blame output for one file, collecting the lines that did not match.
pub fn parse_blame_output(path: &str, raw: &str) -> (BTreeMap<u32, BlameEntry>, Vec<ParseIssue>) {
    let mut entries = BTreeMap::new();
    let mut issues = Vec::new();

    for line in raw.lines().filter(|line| !line.trim().is_empty()) {
        match parse_blame_line(line) {
            Some((number, entry)) => {
                entries.insert(number, entry);
            }
            None => {
                let issue = ParseIssue::UnparsableBlameLine {
                    path: path.to_string(),
                    line: line.to_string(),
                };
                tracing::warn!("{}", issue);
                issues.push(issue);
            }
        }
    }

    (entries, issues)
}

/// Blame every added line of `diff` against `predecessor`.
pub fn attribute_blame<V: VersionControl + ?Sized>(
    vcs: &V,
    predecessor: &str,
    diff: &FileDiff,
) -> Result<(BlameMap, Vec<ParseIssue>)> {
    let mut blame = BlameMap::default();
    let mut issues = Vec::new();

    for path in diff.files.keys() {
        let ranges: Vec<LineRange> = diff
            .added_lines(path)
            .into_iter()
            .map(LineRange::single)
            .collect();
        if ranges.is_empty() {
            continue;
        }

        tracing::debug!("Blaming {} line(s) of {} at {}", ranges.len(), path, predecessor);
        let raw = vcs.blame(predecessor, path, &ranges)?;
        let (entries, file_issues) = parse_blame_output(path, &raw);
        blame.files.insert(path.clone(), entries);
        issues.extend(file_issues);
    }

    Ok((blame, issues))
}
