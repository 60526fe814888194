//! Query/filter index over a scan snapshot.
//!
//! Produces the filtered, totally ordered entry sequence consumed by
//! statistics, export, and presentation. Grouping is a presentation
//! concern; this module only guarantees a stable total order sufficient
//! for any grouping strategy.

use crate::{Entry, ScanIndex};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

/// Conjunctive entry predicate: an entry must satisfy every active filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive exact match on the entry keyword
    pub keyword: Option<String>,
    /// Case-insensitive substring match against `text` or `line_text`
    pub text: Option<String>,
    /// Case-insensitive substring match against the file path
    pub path: Option<String>,
    /// Restrict to entries of `current_file` only
    pub current_file_only: bool,
    /// Reference file for the current-file restriction
    pub current_file: Option<PathBuf>,
}

/// Sort order for query results.
///
/// `LineThenFile` orders identically to `FileThenLine` here; consumers
/// that group by line rather than by file only present the same order
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// File path lexicographically, then line ascending
    FileThenLine,
    /// Keyword lexicographically, then file path, then line
    KeywordThenFile,
    /// Same order as `FileThenLine`; grouping differs in presentation
    LineThenFile,
}

/// Filter and sort a snapshot into an ordered entry sequence.
pub fn query<'a>(index: &'a ScanIndex, filter: &FilterSpec, sort: SortMode) -> Vec<&'a Entry> {
    let mut results: Vec<&Entry> = index
        .entries()
        .iter()
        .filter(|entry| matches(entry, filter))
        .collect();

    // Stable sort so equal keys preserve aggregation order.
    results.sort_by(|a, b| compare(a, b, sort));
    results
}

fn matches(entry: &Entry, filter: &FilterSpec) -> bool {
    if let Some(keyword) = &filter.keyword {
        if !entry.kind.eq_ignore_ascii_case(keyword) {
            return false;
        }
    }

    if let Some(text) = &filter.text {
        let needle = text.to_lowercase();
        let in_text = entry.text.to_lowercase().contains(&needle);
        let in_line = entry.line_text.to_lowercase().contains(&needle);
        if !in_text && !in_line {
            return false;
        }
    }

    if let Some(path) = &filter.path {
        let needle = path.to_lowercase();
        let haystack = entry.path.to_string_lossy().to_lowercase();
        if !haystack.contains(&needle) {
            return false;
        }
    }

    if filter.current_file_only {
        // Fail closed: active restriction with no reference matches nothing.
        match &filter.current_file {
            Some(current) => {
                if entry.path != *current {
                    return false;
                }
            }
            None => return false,
        }
    }

    true
}

fn compare(a: &Entry, b: &Entry, sort: SortMode) -> Ordering {
    match sort {
        SortMode::FileThenLine | SortMode::LineThenFile => {
            a.path.cmp(&b.path).then(a.line.cmp(&b.line))
        }
        SortMode::KeywordThenFile => a
            .kind
            .cmp(&b.kind)
            .then_with(|| a.path.cmp(&b.path))
            .then(a.line.cmp(&b.line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: &str, text: &str, path: &str, line: usize) -> Entry {
        Entry {
            kind: kind.to_string(),
            text: text.to_string(),
            path: PathBuf::from(path),
            line,
            line_text: format!("// {kind}: {text}"),
        }
    }

    fn index() -> ScanIndex {
        ScanIndex::from_entries(vec![
            entry("TODO", "fix null handling", "src/b.ts", 10),
            entry("BUG", "null deref on save", "src/a.ts", 3),
            entry("FIXME", "slow path", "src/a.ts", 7),
            entry("BUG", "wrong offset", "src/c.ts", 1),
        ])
    }

    #[test]
    fn test_no_filter_sorted_by_file_then_line() {
        let idx = index();
        let results = query(&idx, &FilterSpec::default(), SortMode::FileThenLine);
        let lines: Vec<_> = results
            .iter()
            .map(|e| (e.path.to_str().unwrap(), e.line))
            .collect();
        assert_eq!(
            lines,
            vec![("src/a.ts", 3), ("src/a.ts", 7), ("src/b.ts", 10), ("src/c.ts", 1)]
        );
    }

    #[test]
    fn test_keyword_then_file_order() {
        let idx = index();
        let results = query(&idx, &FilterSpec::default(), SortMode::KeywordThenFile);
        let kinds: Vec<_> = results
            .iter()
            .map(|e| (e.kind.as_str(), e.path.to_str().unwrap()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("BUG", "src/a.ts"),
                ("BUG", "src/c.ts"),
                ("FIXME", "src/a.ts"),
                ("TODO", "src/b.ts"),
            ]
        );
    }

    #[test]
    fn test_line_then_file_matches_file_then_line() {
        let idx = index();
        let a = query(&idx, &FilterSpec::default(), SortMode::FileThenLine);
        let b = query(&idx, &FilterSpec::default(), SortMode::LineThenFile);
        assert_eq!(a, b);
    }

    #[test]
    fn test_keyword_filter_case_insensitive() {
        let idx = index();
        let filter = FilterSpec {
            keyword: Some("bug".to_string()),
            ..Default::default()
        };
        let results = query(&idx, &filter, SortMode::FileThenLine);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|e| e.kind == "BUG"));
    }

    #[test]
    fn test_text_filter_matches_text_or_line_text() {
        let idx = index();
        let filter = FilterSpec {
            text: Some("NULL".to_string()),
            ..Default::default()
        };
        let results = query(&idx, &filter, SortMode::FileThenLine);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_path_filter() {
        let idx = index();
        let filter = FilterSpec {
            path: Some("A.TS".to_string()),
            ..Default::default()
        };
        let results = query(&idx, &filter, SortMode::FileThenLine);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let idx = index();
        let filter = FilterSpec {
            keyword: Some("BUG".to_string()),
            text: Some("null".to_string()),
            ..Default::default()
        };
        let results = query(&idx, &filter, SortMode::FileThenLine);
        // "fix null handling" is TODO, "wrong offset" is BUG without "null":
        // only the entry satisfying both filters survives.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "null deref on save");
    }

    #[test]
    fn test_current_file_restriction() {
        let idx = index();
        let filter = FilterSpec {
            current_file_only: true,
            current_file: Some(PathBuf::from("src/a.ts")),
            ..Default::default()
        };
        let results = query(&idx, &filter, SortMode::FileThenLine);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|e| e.path == PathBuf::from("src/a.ts")));
    }

    #[test]
    fn test_current_file_restriction_fails_closed() {
        let idx = index();
        let filter = FilterSpec {
            current_file_only: true,
            current_file: None,
            ..Default::default()
        };
        let results = query(&idx, &filter, SortMode::FileThenLine);
        assert!(results.is_empty());
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let idx = ScanIndex::from_entries(vec![
            entry("TODO", "first", "same.ts", 5),
            entry("TODO", "second", "same.ts", 5),
        ]);
        let results = query(&idx, &FilterSpec::default(), SortMode::FileThenLine);
        assert_eq!(results[0].text, "first");
        assert_eq!(results[1].text, "second");
    }
}
