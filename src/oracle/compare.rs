//! Response equivalence predicates.
//!
//! # Design Decisions
//! - Predicates combine with AND semantics: exactly the selected set, no more, no fewer
//! - An empty selection means body-content equality, decided here and nowhere else

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::oracle::types::Response;

/// One way of deciding that two responses match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    #[serde(alias = "status")]
    StatusCode,
    #[serde(alias = "body")]
    BodyContent,
    #[serde(alias = "words")]
    WordCount,
    #[serde(alias = "lines")]
    LineCount,
    #[serde(alias = "bytes")]
    ByteLength,
}

impl Predicate {
    pub const ALL: [Predicate; 5] = [
        Predicate::StatusCode,
        Predicate::BodyContent,
        Predicate::WordCount,
        Predicate::LineCount,
        Predicate::ByteLength,
    ];

    /// True when `baseline` and `candidate` agree on this property.
    pub fn holds(self, baseline: &Response, candidate: &Response) -> bool {
        match self {
            Predicate::StatusCode => baseline.status() == candidate.status(),
            Predicate::BodyContent => baseline.body() == candidate.body(),
            Predicate::WordCount => baseline.word_count() == candidate.word_count(),
            Predicate::LineCount => baseline.line_count() == candidate.line_count(),
            Predicate::ByteLength => baseline.byte_len() == candidate.byte_len(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Predicate::StatusCode => "status_code",
            Predicate::BodyContent => "body_content",
            Predicate::WordCount => "word_count",
            Predicate::LineCount => "line_count",
            Predicate::ByteLength => "byte_length",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty set of active predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateSet {
    predicates: BTreeSet<Predicate>,
}

impl PredicateSet {
    /// Build the active set; an empty selection falls back to body-content equality.
    pub fn new(selected: impl IntoIterator<Item = Predicate>) -> Self {
        let mut predicates: BTreeSet<Predicate> = selected.into_iter().collect();
        if predicates.is_empty() {
            predicates.insert(Predicate::BodyContent);
        }
        Self { predicates }
    }

    pub fn contains(&self, predicate: Predicate) -> bool {
        self.predicates.contains(&predicate)
    }

    pub fn iter(&self) -> impl Iterator<Item = Predicate> + '_ {
        self.predicates.iter().copied()
    }

    /// True only if every active predicate holds.
    pub fn equivalent(&self, baseline: &Response, candidate: &Response) -> bool {
        self.predicates.iter().all(|p| p.holds(baseline, candidate))
    }
}

impl Default for PredicateSet {
    fn default() -> Self {
        Self::new([])
    }
}

impl fmt::Display for PredicateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Predicate::as_str).collect();
        f.write_str(&names.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_defaults_to_body() {
        let set = PredicateSet::new([]);
        assert!(set.contains(Predicate::BodyContent));
        assert_eq!(set.iter().count(), 1);
        assert_eq!(set, PredicateSet::default());
    }

    #[test]
    fn test_body_is_full_comparison() {
        let set = PredicateSet::default();
        let base = Response::new(200, "Success");
        assert!(set.equivalent(&base, &Response::new(500, "Success")));
        assert!(!set.equivalent(&base, &Response::new(200, "Success!")));
        assert!(!set.equivalent(&base, &Response::new(200, "Succ")));
    }

    #[test]
    fn test_selected_predicates_only() {
        let set = PredicateSet::new([Predicate::StatusCode, Predicate::WordCount]);
        let base = Response::new(200, "one two three");
        // Different bytes and length, same status and word count.
        let candidate = Response::new(200, "uno dos tres-longer");
        assert!(set.equivalent(&base, &candidate));
        assert!(!set.equivalent(&base, &Response::new(401, "one two three")));
        assert!(!set.equivalent(&base, &Response::new(200, "one two")));
    }

    #[test]
    fn test_line_and_byte_predicates() {
        let lines = PredicateSet::new([Predicate::LineCount]);
        assert!(lines.equivalent(&Response::new(200, "a\nb"), &Response::new(200, "xx\nyy")));
        assert!(!lines.equivalent(&Response::new(200, "a\nb"), &Response::new(200, "a")));

        let bytes = PredicateSet::new([Predicate::ByteLength]);
        assert!(bytes.equivalent(&Response::new(200, "abc"), &Response::new(404, "xyz")));
    }

    #[test]
    fn test_serde_aliases() {
        #[derive(Deserialize)]
        struct Wrapper {
            p: Vec<Predicate>,
        }
        let w: Wrapper = toml::from_str(r#"p = ["status", "word_count", "bytes"]"#).unwrap();
        assert_eq!(
            w.p,
            vec![Predicate::StatusCode, Predicate::WordCount, Predicate::ByteLength]
        );
    }

    #[test]
    fn test_display() {
        let set = PredicateSet::new([Predicate::WordCount, Predicate::StatusCode]);
        assert_eq!(set.to_string(), "status_code+word_count");
    }
}
