//! Marker entries and the aggregated scan index.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// One matched marker occurrence.
///
/// Entries are immutable once created; a changed file produces a wholly
/// new entry set on its next scan, never a patched one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Matched keyword (e.g. "TODO"); any configured keyword is valid
    pub kind: String,
    /// Trailing text after the keyword, leading `: - ` run stripped
    pub text: String,
    /// Path of the owning file
    pub path: PathBuf,
    /// Zero-based line index at scan time
    pub line: usize,
    /// Full raw text of the matched line
    pub line_text: String,
}

/// The complete snapshot of all current entries.
///
/// Replaced wholesale after each completed scan pass; readers see either
/// the prior complete snapshot or the new one, never a partial mix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanIndex {
    entries: Vec<Entry>,
}

impl ScanIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from aggregated entries.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// All entries, in aggregation order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Total entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct keywords present in the index.
    pub fn keywords(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.kind.clone()).collect()
    }

    /// Entry counts per keyword.
    pub fn counts_by_keyword(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.kind.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of distinct files contributing entries.
    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.path.as_path())
            .collect::<BTreeSet<&Path>>()
            .len()
    }
}
