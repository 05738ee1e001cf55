//! Stable palette classes for commits across the report.
//!
//! Primary commits always show `PaletteClass::CURRENT`. Every other commit
//! keeps the first class it was given; classes are handed out in discovery
//! order and wrap around once the palette is exhausted.

use std::collections::BTreeMap;

use crate::models::PaletteClass;
use crate::report::closure::KnownCommits;

pub const DEFAULT_PALETTE_SIZE: usize = 8;

#[derive(Debug, Clone)]
pub struct CommitPalette {
    classes: BTreeMap<String, PaletteClass>,
    next_index: usize,
    size: usize,
}

impl Default for CommitPalette {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE_SIZE)
    }
}

impl CommitPalette {
    pub fn new(size: usize) -> Self {
        Self {
            classes: BTreeMap::new(),
            next_index: 0,
            size: size.max(1),
        }
    }

    /// Mark `primary` as current, then classify every known commit that has no class yet.
    pub fn extend(&mut self, primary: &str, known: &KnownCommits) {
        self.classes.insert(primary.to_string(), PaletteClass::CURRENT);

        for commit in known.iter() {
            if self.classes.contains_key(commit) {
                continue;
            }
            self.classes
                .insert(commit.to_string(), PaletteClass::slot(self.next_index));
            self.next_index = (self.next_index + 1) % self.size;
        }
    }

    #[cfg(test)]
    pub fn class_of(&self, commit: &str) -> Option<PaletteClass> {
        self.classes.get(commit).copied()
    }

    pub fn into_classes(self) -> BTreeMap<String, PaletteClass> {
        self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn known(commits: &[&str]) -> KnownCommits {
        let mut known = KnownCommits::default();
        for commit in commits {
            known.insert(commit);
        }
        known
    }

    #[test]
    fn test_primary_is_current_and_others_in_discovery_order() {
        let mut palette = CommitPalette::default();

        palette.extend("p1", &known(&["p1", "x9", "y7"]));

        assert_eq!(palette.class_of("p1"), Some(PaletteClass::CURRENT));
        assert_eq!(palette.class_of("x9"), Some(PaletteClass(1)));
        assert_eq!(palette.class_of("y7"), Some(PaletteClass(2)));
        assert_eq!(palette.class_of("zz"), None);
    }

    #[test]
    fn test_class_kept_across_primaries() {
        let mut palette = CommitPalette::default();

        palette.extend("p1", &known(&["p1", "x9"]));
        palette.extend("p2", &known(&["p1", "x9", "p2", "z1"]));

        assert_eq!(palette.class_of("x9"), Some(PaletteClass(1)));
        assert_eq!(palette.class_of("p2"), Some(PaletteClass::CURRENT));
        assert_eq!(palette.class_of("z1"), Some(PaletteClass(2)));
    }

    #[test]
    fn test_primary_overrides_earlier_class() {
        let mut palette = CommitPalette::default();

        palette.extend("p1", &known(&["p1", "x9"]));
        assert_eq!(palette.class_of("x9"), Some(PaletteClass(1)));

        palette.extend("x9", &known(&["p1", "x9", "w3"]));

        assert_eq!(palette.class_of("x9"), Some(PaletteClass::CURRENT));
        assert_eq!(palette.class_of("w3"), Some(PaletteClass(2)));
    }

    #[test]
    fn test_palette_wraps_without_reset() {
        let mut palette = CommitPalette::new(8);
        let commits: Vec<String> = (0..10).map(|i| format!("c{}", i)).collect();
        let mut all = vec!["p1"];
        all.extend(commits.iter().map(String::as_str));

        palette.extend("p1", &known(&all));

        assert_eq!(palette.class_of("c0"), Some(PaletteClass(1)));
        assert_eq!(palette.class_of("c7"), Some(PaletteClass(8)));
        assert_eq!(palette.class_of("c8"), Some(PaletteClass(1)));
        assert_eq!(palette.class_of("c9"), Some(PaletteClass(2)));
    }
}
