//! Step numbering and canonical step file names.
//!
//! Source files carry a numeric id after a short prefix (`node5.html`,
//! `node5.1.html`, `step07.html`). Steps are ordered by that id, never by
//! file name, so `node2.html` sorts before `node10.html`.

use std::fmt;

/// Numeric id of a step, `major[.minor]`.
///
/// Ordering is numeric on `major`, then `minor` (a bare `5` sorts before `5.1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepNumber {
    pub major: u32,
    pub minor: Option<u32>,
}

impl StepNumber {
    pub fn new(major: u32) -> Self {
        Self { major, minor: None }
    }

    /// Parse the id out of `<prefix><digits>[.<digits>].html`.
    ///
    /// The prefix match is ASCII case-insensitive; `.htm` is accepted too.
    pub fn from_file_name(name: &str, prefix: &str) -> Option<Self> {
        let stem = name
            .strip_suffix(".html")
            .or_else(|| name.strip_suffix(".htm"))?;
        if stem.len() <= prefix.len() || !stem.is_char_boundary(prefix.len()) {
            return None;
        }
        let (head, id) = stem.split_at(prefix.len());
        if !head.eq_ignore_ascii_case(prefix) {
            return None;
        }
        Self::parse(id)
    }

    /// Parse a bare id such as `7` or `5.1`.
    pub fn parse(id: &str) -> Option<Self> {
        let (major, minor) = match id.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (id, None),
        };
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(major) || !minor.is_none_or(digits) {
            return None;
        }
        Some(Self {
            major: major.parse().ok()?,
            minor: match minor {
                Some(m) => Some(m.parse().ok()?),
                None => None,
            },
        })
    }

    /// Canonical output file name: `stepNN.html`, major zero-padded to two digits.
    pub fn file_name(self) -> String {
        format!("step{self}.html")
    }
}

impl fmt::Display for StepNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{minor}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_canonical_names() {
        let two = StepNumber::from_file_name("node2.html", "node").unwrap();
        let ten = StepNumber::from_file_name("node10.html", "node").unwrap();
        assert_eq!(two.file_name(), "step02.html");
        assert_eq!(ten.file_name(), "step10.html");
        assert!(two < ten);
        assert!("step10.html" < "step2.html", "lexical order would be wrong");
    }

    #[test]
    fn test_decimal_ids() {
        let n = StepNumber::from_file_name("node5.1.html", "node").unwrap();
        assert_eq!(n, StepNumber { major: 5, minor: Some(1) });
        assert_eq!(n.file_name(), "step05.1.html");
        assert!(StepNumber::new(5) < n);
        assert!(n < StepNumber::new(6));
    }

    #[test]
    fn test_canonical_round_trip() {
        let n = StepNumber::from_file_name("step07.html", "step").unwrap();
        assert_eq!(n, StepNumber::new(7));
        assert_eq!(StepNumber::from_file_name(&n.file_name(), "step"), Some(n));
    }

    #[test]
    fn test_rejects_other_names() {
        assert_eq!(StepNumber::from_file_name("index.html", "node"), None);
        assert_eq!(StepNumber::from_file_name("node.html", "node"), None);
        assert_eq!(StepNumber::from_file_name("node3.txt", "node"), None);
        assert_eq!(StepNumber::from_file_name("node3a.html", "node"), None);
        assert_eq!(StepNumber::from_file_name("node3..html", "node"), None);
        assert_eq!(StepNumber::from_file_name("step3.html", "node"), None);
        assert_eq!(
            StepNumber::from_file_name("NODE4.htm", "node"),
            Some(StepNumber::new(4))
        );
    }

    proptest! {
        #[test]
        fn prop_sorting_by_number_is_numeric(mut ids in prop::collection::vec(0u32..500, 1..20)) {
            let mut numbers: Vec<StepNumber> = ids
                .iter()
                .map(|id| StepNumber::from_file_name(&format!("node{id}.html"), "node").unwrap())
                .collect();
            numbers.sort();
            ids.sort();
            let majors: Vec<u32> = numbers.iter().map(|n| n.major).collect();
            prop_assert_eq!(majors, ids);
        }

        #[test]
        fn prop_canonical_name_parses_back(major in 0u32..10_000, minor in prop::option::of(0u32..100)) {
            let n = StepNumber { major, minor };
            prop_assert_eq!(StepNumber::from_file_name(&n.file_name(), "step"), Some(n));
        }
    }
}
