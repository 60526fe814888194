//! Scan orchestrator.
//!
//! Enumerates candidate files per include pattern, applies the size
//! limit, runs the fingerprint/cache/scan pipeline per file, and
//! aggregates the results into a new snapshot. Per-file and per-pattern
//! failures degrade to logged skips; only a configuration that cannot
//! drive a pass at all is fatal.

use crate::cache::{FileRecord, ScanCache};
use crate::fingerprint::fingerprint_file;
use crate::scanner::scan_file;
use crate::walker::{enumerate, FileMeta};
use crate::IndexError;
use markscan_core::{ScanConfig, ScanIndex};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Receives incremental progress during a pass.
pub trait ProgressSink: Send + Sync {
    /// Called after each processed file.
    fn update(&self, completed: usize, total: usize, current: &Path);
}

/// A sink that discards progress updates.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _completed: usize, _total: usize, _current: &Path) {}
}

/// Cooperative cancellation flag, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the in-flight pass.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of one scan pass.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// The aggregated snapshot; partial if the pass was cancelled
    pub index: Arc<ScanIndex>,
    /// Candidate files resolved across all include patterns
    pub total: usize,
    /// Files freshly scanned this pass
    pub scanned: usize,
    /// Files served from the cache without a content read
    pub reused: usize,
    /// Files skipped for exceeding the size limit
    pub skipped: usize,
    /// Files skipped after a read/decode/fingerprint failure
    pub errored: usize,
    /// True when the pass was cancelled before completing
    pub partial: bool,
    /// Pass duration in milliseconds
    pub duration_ms: u64,
}

/// The incremental scan engine.
///
/// Owns the per-file cache and the current snapshot. Constructed
/// explicitly, passed to consumers; there is no ambient global state.
/// Concurrent `run_scan` calls are serialized behind an internal lock.
pub struct ScanEngine {
    cache: ScanCache,
    pass_lock: tokio::sync::Mutex<()>,
    index: RwLock<Arc<ScanIndex>>,
}

impl ScanEngine {
    /// Create an engine with an unbounded cache.
    pub fn new() -> Self {
        Self::with_cache(ScanCache::new())
    }

    /// Create an engine around a preconfigured cache.
    pub fn with_cache(cache: ScanCache) -> Self {
        Self {
            cache,
            pass_lock: tokio::sync::Mutex::new(()),
            index: RwLock::new(Arc::new(ScanIndex::new())),
        }
    }

    /// The current snapshot. Readers see the last completed pass.
    pub fn index(&self) -> Arc<ScanIndex> {
        Arc::clone(&self.index.read())
    }

    /// Total entry count in the current snapshot.
    pub fn entry_count(&self) -> usize {
        self.index.read().len()
    }

    /// Distinct keywords present in the current snapshot.
    pub fn keywords(&self) -> BTreeSet<String> {
        self.index.read().keywords()
    }

    /// Drop the cache record for one file. Called from change
    /// notifications (save/create/delete) before the next pass.
    pub fn invalidate(&self, path: &Path) {
        self.cache.invalidate(path);
    }

    /// Drop every cache record. Called when configuration that affects
    /// match semantics (keywords, patterns) changes.
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }

    /// Run one full scan pass.
    ///
    /// On success the engine's snapshot is replaced wholesale and the
    /// report carries it. A cancelled pass returns `partial: true` with
    /// whatever was aggregated; the stored snapshot is left untouched so
    /// readers keep seeing the last complete pass. A `Config` error
    /// leaves both cache and snapshot untouched.
    pub async fn run_scan(
        &self,
        root: &Path,
        config: &ScanConfig,
        progress: &dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> Result<ScanReport, IndexError> {
        let _pass = self.pass_lock.lock().await;
        let start = Instant::now();

        config.validate()?;
        if !root.exists() {
            return Err(IndexError::NotFound(root.to_path_buf()));
        }

        info!(root = ?root, patterns = config.include.len(), "Starting scan pass");

        // Enumerate per pattern, in caller order. Results concatenate;
        // duplicates across overlapping patterns are tolerated.
        let excludes = config.effective_excludes();
        let mut candidates: Vec<FileMeta> = Vec::new();
        let mut any_pattern_resolved = false;

        for pattern in &config.include {
            match enumerate(root, pattern, &excludes) {
                Ok(files) => {
                    debug!(pattern = %pattern, count = files.len(), "Pattern resolved");
                    candidates.extend(files);
                    any_pattern_resolved = true;
                }
                Err(e) => {
                    error!(pattern = %pattern, error = %e, "Pattern enumeration failed");
                }
            }
        }

        if !any_pattern_resolved {
            return Err(IndexError::Config(
                "no include pattern could be resolved".to_string(),
            ));
        }

        let total = candidates.len();
        let mut entries = Vec::new();
        let mut scanned = 0;
        let mut reused = 0;
        let mut skipped = 0;
        let mut errored = 0;
        let mut completed = 0;
        let mut partial = false;

        for candidate in &candidates {
            if cancel.is_cancelled() {
                partial = true;
                break;
            }

            let path = candidate.path.as_path();

            if candidate.size > config.max_file_size {
                debug!(path = ?path, size = candidate.size, "Skipping large file");
                skipped += 1;
                completed += 1;
                progress.update(completed, total, path);
                continue;
            }

            match fingerprint_file(path).await {
                Ok(fingerprint) => {
                    let cached = self
                        .cache
                        .get(path)
                        .filter(|record| record.fingerprint == fingerprint);

                    if let Some(record) = cached {
                        entries.extend(record.entries);
                        reused += 1;
                    } else {
                        match scan_file(path, &config.keywords).await {
                            Ok(fresh) => {
                                self.cache.put(
                                    candidate.path.clone(),
                                    FileRecord::new(fingerprint, fresh.clone()),
                                );
                                entries.extend(fresh);
                                scanned += 1;
                            }
                            Err(e) => {
                                warn!(path = ?path, error = %e, "Scan failed, skipping file");
                                errored += 1;
                            }
                        }
                    }
                }
                Err(e) => {
                    // Force a rescan attempt; without a valid fingerprint
                    // the result is not cached.
                    warn!(path = ?path, error = %e, "Fingerprint failed, forcing rescan");
                    match scan_file(path, &config.keywords).await {
                        Ok(fresh) => {
                            entries.extend(fresh);
                            scanned += 1;
                        }
                        Err(e) => {
                            warn!(path = ?path, error = %e, "Forced rescan failed, skipping file");
                            errored += 1;
                        }
                    }
                }
            }

            completed += 1;
            progress.update(completed, total, path);
        }

        let index = Arc::new(ScanIndex::from_entries(entries));
        if !partial {
            *self.index.write() = Arc::clone(&index);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            total,
            scanned,
            reused,
            skipped,
            errored,
            partial,
            entries = index.len(),
            duration_ms,
            "Scan pass complete"
        );

        Ok(ScanReport {
            index,
            total,
            scanned,
            reused,
            skipped,
            errored,
            partial,
            duration_ms,
        })
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new()
    }
}
