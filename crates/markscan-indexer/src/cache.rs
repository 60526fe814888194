//! Incremental per-file result cache.
//!
//! Keyed by file path for the process lifetime. A hit requires the
//! stored fingerprint to equal the file's current fingerprint; anything
//! else is a miss and the scanner runs. Unbounded by default, with an
//! optional LRU bound.

use crate::Fingerprint;
use chrono::{DateTime, Utc};
use lru::LruCache;
use markscan_core::Entry;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cached scan result for one file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// File state at the time of the scan
    pub fingerprint: Fingerprint,
    /// Entries produced by that scan (may be empty)
    pub entries: Vec<Entry>,
    /// When the scan ran; informational only, never used for eviction
    pub scanned_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a record stamped with the current time.
    pub fn new(fingerprint: Fingerprint, entries: Vec<Entry>) -> Self {
        Self {
            fingerprint,
            entries,
            scanned_at: Utc::now(),
        }
    }
}

/// Thread-safe cache of per-file scan results.
///
/// `put` replaces a file's record atomically: either the full entry
/// list for that file is stored, or the prior record stands.
pub struct ScanCache {
    records: Mutex<LruCache<PathBuf, FileRecord>>,
}

impl ScanCache {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(LruCache::unbounded()),
        }
    }

    /// Create a cache bounded to `capacity` files, evicting the least
    /// recently used record beyond that.
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self {
            records: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up the record for a file, if any.
    pub fn get(&self, path: &Path) -> Option<FileRecord> {
        self.records.lock().get(path).cloned()
    }

    /// Store or replace the record for a file.
    pub fn put(&self, path: PathBuf, record: FileRecord) {
        self.records.lock().put(path, record);
    }

    /// Drop the record for a file (save/create/delete notification).
    pub fn invalidate(&self, path: &Path) {
        if self.records.lock().pop(path).is_some() {
            debug!(path = ?path, "Invalidated cache record");
        }
    }

    /// Drop all records. Called when configuration that affects match
    /// semantics changes; entries computed under old keywords are not
    /// reusable even though fingerprints still compare equal.
    pub fn clear(&self) {
        let mut records = self.records.lock();
        let dropped = records.len();
        records.clear();
        debug!(dropped, "Cleared scan cache");
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Default for ScanCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(mtime: u64) -> FileRecord {
        FileRecord::new(Fingerprint::from_bytes(b"content", mtime), Vec::new())
    }

    #[test]
    fn test_get_miss_when_absent() {
        let cache = ScanCache::new();
        assert!(cache.get(Path::new("a.ts")).is_none());
    }

    #[test]
    fn test_put_then_get() {
        let cache = ScanCache::new();
        cache.put(PathBuf::from("a.ts"), record(1));

        let rec = cache.get(Path::new("a.ts")).unwrap();
        assert_eq!(rec.fingerprint, Fingerprint::from_bytes(b"content", 1));
    }

    #[test]
    fn test_put_replaces_record() {
        let cache = ScanCache::new();
        cache.put(PathBuf::from("a.ts"), record(1));
        cache.put(PathBuf::from("a.ts"), record(2));

        let rec = cache.get(Path::new("a.ts")).unwrap();
        assert_eq!(rec.fingerprint, Fingerprint::from_bytes(b"content", 2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_removes_record() {
        let cache = ScanCache::new();
        cache.put(PathBuf::from("a.ts"), record(1));
        cache.invalidate(Path::new("a.ts"));
        assert!(cache.get(Path::new("a.ts")).is_none());
    }

    #[test]
    fn test_invalidate_absent_is_noop() {
        let cache = ScanCache::new();
        cache.invalidate(Path::new("never-seen.ts"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache = ScanCache::new();
        cache.put(PathBuf::from("a.ts"), record(1));
        cache.put(PathBuf::from("b.ts"), record(1));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_bounded_evicts_least_recently_used() {
        let cache = ScanCache::bounded(NonZeroUsize::new(2).unwrap());
        cache.put(PathBuf::from("a.ts"), record(1));
        cache.put(PathBuf::from("b.ts"), record(1));
        // Touch a.ts so b.ts becomes the eviction candidate.
        cache.get(Path::new("a.ts"));
        cache.put(PathBuf::from("c.ts"), record(1));

        assert!(cache.get(Path::new("a.ts")).is_some());
        assert!(cache.get(Path::new("b.ts")).is_none());
        assert!(cache.get(Path::new("c.ts")).is_some());
    }
}
