//! Unified diff text → per-file classified line records.
//!
//! Each line is classified once, most specific pattern first:
//! `diff ` section start, hunk header, then (inside a hunk) the removed,
//! added and context markers. Everything else is kept as `Raw`. Parsing
//! never fails; a malformed stream yields a best-effort reconstruction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{FileDiff, LineRecord};

static HUNK_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").unwrap());
static DIFF_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^diff --git a/(\S+) b/(.+)$").unwrap());
static NEW_FILE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+\+\+ b/(.+)$").unwrap());

/// Accumulates one file section at a time.
struct Section {
    path: String,
    records: Vec<LineRecord>,
    old_line: u32,
    new_line: u32,
    in_hunk: bool,
}

impl Section {
    fn new(path: String) -> Self {
        Self {
            path,
            records: Vec::new(),
            old_line: 0,
            new_line: 0,
            in_hunk: false,
        }
    }

    fn push_raw(&mut self, line: &str) {
        self.records.push(LineRecord::Raw { text: line.to_string() });
    }

    fn classify(&mut self, line: &str) {
        if let Some(caps) = HUNK_HEADER.captures(line) {
            // Captures are all-digit; only overflow can fail.
            match (caps[1].parse(), caps[2].parse()) {
                (Ok(old_start), Ok(new_start)) => {
                    self.old_line = old_start;
                    self.new_line = new_start;
                    self.in_hunk = true;
                    self.records.push(LineRecord::HunkHeader { text: line.to_string() });
                }
                _ => self.push_raw(line),
            }
            return;
        }

        if !self.in_hunk {
            if let Some(caps) = NEW_FILE_MARKER.captures(line) {
                self.path = caps[1].to_string();
            }
            self.push_raw(line);
            return;
        }

        if let Some(text) = line.strip_prefix('-') {
            self.records.push(LineRecord::Removed {
                old_line: self.old_line,
                text: text.to_string(),
            });
            self.old_line += 1;
        } else if let Some(text) = line.strip_prefix('+') {
            self.records.push(LineRecord::Added {
                new_line: self.new_line,
                text: text.to_string(),
            });
            self.new_line += 1;
        } else if line.is_empty() || line.starts_with(' ') {
            self.records.push(LineRecord::Context {
                old_line: self.old_line,
                new_line: self.new_line,
                text: line.get(1..).unwrap_or_default().to_string(),
            });
            self.old_line += 1;
            self.new_line += 1;
        } else {
            // "\ No newline at end of file" and anything unrecognised
            self.push_raw(line);
        }
    }
}

fn flush(section: Section, diff: &mut FileDiff) {
    if section.records.is_empty() {
        return;
    }
    diff.files
        .entry(section.path)
        .or_default()
        .extend(section.records);
}

/// Parse the full text of a unified diff.
pub fn parse_unified_diff(raw: &str) -> FileDiff {
    let mut diff = FileDiff::default();
    let mut current = Section::new(String::new());

    for line in raw.lines() {
        if line.starts_with("diff ") {
            let path = DIFF_HEADER
                .captures(line)
                .map(|caps| caps[2].to_string())
                .unwrap_or_default();
            let finished = std::mem::replace(&mut current, Section::new(path));
            flush(finished, &mut diff);
            current.push_raw(line);
        } else {
            current.classify(line);
        }
    }
    flush(current, &mut diff);

    diff
}
