//! Parsing for `ParentScopeIndexRange` values.
//!
//! Two shapes are accepted: an explicit set such as `2, 5, 7` and an
//! inclusive range such as `3-6` (either direction, so `6-3` is the same set).
//! Ranges are kept as their bounds and walked lazily, so `1-2000000` costs
//! no more than `1-2`.

use std::{collections::BTreeSet, sync::OnceLock};

use itertools::Either;
use regex::Regex;

fn index_range_rule() -> &'static Regex {
    static RULE: OnceLock<Regex> = OnceLock::new();
    RULE.get_or_init(|| {
        Regex::new(r"^(\s*\d+\s*,)*\s*\d+\s*$|^\s*\d+\s*-\s*\d+\s*$")
            .expect("index range pattern compiles")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexRange {
    Span { low: i64, high: i64 },
    Set(BTreeSet<i64>),
}

impl IndexRange {
    /// Indexes in ascending order.
    pub fn indexes(&self) -> impl Iterator<Item = i64> + '_ {
        match self {
            IndexRange::Span { low, high } => Either::Left(*low..=*high),
            IndexRange::Set(set) => Either::Right(set.iter().copied()),
        }
    }

    pub fn contains(&self, index: i64) -> bool {
        match self {
            IndexRange::Span { low, high } => (*low..=*high).contains(&index),
            IndexRange::Set(set) => set.contains(&index),
        }
    }
}

pub fn is_index_range_valid(statement: &str) -> bool {
    !statement.trim().is_empty() && index_range_rule().is_match(statement)
}

/// `None` when the statement is malformed or names an index that does not fit
/// in an `i64`.
pub fn parse_index_range(statement: &str) -> Option<IndexRange> {
    if !is_index_range_valid(statement) {
        return None;
    }
    if let Some((begin, end)) = statement.split_once('-') {
        let begin: i64 = begin.trim().parse().ok()?;
        let end: i64 = end.trim().parse().ok()?;
        let (low, high) = if begin <= end { (begin, end) } else { (end, begin) };
        return Some(IndexRange::Span { low, high });
    }
    statement
        .split(',')
        .map(|token| token.trim().parse::<i64>().ok())
        .collect::<Option<BTreeSet<_>>>()
        .map(IndexRange::Set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexes(statement: &str) -> Vec<i64> {
        parse_index_range(statement)
            .expect("parsed")
            .indexes()
            .collect()
    }

    #[test]
    fn parses_inclusive_range() {
        assert_eq!(indexes("1-3"), vec![1, 2, 3]);
    }

    #[test]
    fn parses_reversed_range() {
        assert_eq!(indexes(" 5 - 3 "), vec![3, 4, 5]);
    }

    #[test]
    fn parses_explicit_set() {
        assert_eq!(indexes("5,1, 3"), vec![1, 3, 5]);
        assert!(parse_index_range("2, 5").is_some());
        assert_eq!(indexes("7"), vec![7]);
    }

    #[test]
    fn wide_range_keeps_only_its_bounds() {
        let range = parse_index_range("1-2000000").expect("range");
        assert_eq!(range, IndexRange::Span { low: 1, high: 2_000_000 });
        assert!(range.contains(1_999_999));
        assert!(!range.contains(0));
        assert_eq!(range.indexes().take(2).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn overflowing_index_is_rejected_after_format_check() {
        for statement in ["1-99999999999999999999", "99999999999999999999"] {
            assert!(is_index_range_valid(statement));
            assert!(parse_index_range(statement).is_none());
        }
    }

    #[test]
    fn rejects_malformed_statements() {
        for statement in ["", "   ", "abc", "1-", "1,", "1-2-3", "1-2,3", "-1"] {
            assert!(
                parse_index_range(statement).is_none(),
                "expected '{statement}' to be rejected"
            );
            assert!(!is_index_range_valid(statement));
        }
    }
}
