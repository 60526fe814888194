//! File-system change notifications.
//!
//! Collaborator for the engine: watches a tree, debounces event bursts,
//! and emits per-file changes. Consumers feed each change into
//! `ScanEngine::invalidate` and trigger a rescan after the quiet
//! period; the engine itself never depends on this module.

use crate::IndexError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebouncedEvent, Debouncer, RecommendedCache};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// File change type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was created
    Created,
    /// File content or name was modified
    Modified,
    /// File was deleted
    Deleted,
}

/// A file system change event.
#[derive(Debug, Clone)]
pub struct FileChange {
    /// Path to the changed file
    pub path: PathBuf,
    /// Kind of change
    pub kind: ChangeKind,
}

/// Options for the file watcher.
#[derive(Debug, Clone)]
pub struct WatcherOptions {
    /// Quiet period before a burst of events is delivered
    pub debounce: Duration,
    /// Whether to watch recursively
    pub recursive: bool,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            recursive: true,
        }
    }
}

/// Debounced file system watcher.
pub struct FileWatcher {
    options: WatcherOptions,
    tx: mpsc::Sender<FileChange>,
    rx: mpsc::Receiver<FileChange>,
    _debouncer: Option<Debouncer<RecommendedWatcher, RecommendedCache>>,
}

impl FileWatcher {
    /// Create a watcher with the given options.
    pub fn new(options: WatcherOptions) -> Self {
        let (tx, rx) = mpsc::channel(1000);
        Self {
            options,
            tx,
            rx,
            _debouncer: None,
        }
    }

    /// Start watching a directory.
    pub fn watch(&mut self, path: &Path) -> Result<(), IndexError> {
        let path = path
            .canonicalize()
            .map_err(|_| IndexError::NotFound(path.to_path_buf()))?;

        let tx = self.tx.clone();

        let mut debouncer = new_debouncer(
            self.options.debounce,
            None,
            move |result: Result<Vec<DebouncedEvent>, Vec<notify::Error>>| match result {
                Ok(events) => {
                    for event in events {
                        if let Some(change) = convert_event(&event.event) {
                            if let Err(e) = tx.blocking_send(change) {
                                error!(error = %e, "Failed to deliver change event");
                            }
                        }
                    }
                }
                Err(errors) => {
                    for e in errors {
                        warn!(error = %e, "Watcher error");
                    }
                }
            },
        )
        .map_err(|e| IndexError::Watcher(e.to_string()))?;

        let mode = if self.options.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        debouncer
            .watch(&path, mode)
            .map_err(|e: notify::Error| IndexError::Watcher(e.to_string()))?;

        info!(path = ?path, recursive = self.options.recursive, "Started watching");

        self._debouncer = Some(debouncer);

        Ok(())
    }

    /// Receive the next change event.
    pub async fn next(&mut self) -> Option<FileChange> {
        self.rx.recv().await
    }

    /// Try to receive a change event without blocking.
    pub fn try_next(&mut self) -> Option<FileChange> {
        self.rx.try_recv().ok()
    }
}

/// Convert a notify event to a change, ignoring what invalidation does
/// not care about (directories, access events).
fn convert_event(event: &Event) -> Option<FileChange> {
    let path = event.paths.first()?.clone();

    if path.is_dir() {
        return None;
    }

    let kind = match &event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Deleted,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => return None,
    };

    debug!(path = ?path, kind = ?kind, "File change detected");

    Some(FileChange { path, kind })
}

/// Collapses a burst of changes into at most one change per path.
///
/// A delete always wins over a create or modify for the same path, so
/// a create-write-delete burst invalidates without resurrecting the
/// file's record.
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: BTreeMap<PathBuf, ChangeKind>,
}

impl ChangeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one change into the set.
    pub fn add(&mut self, change: FileChange) {
        self.changes
            .entry(change.path)
            .and_modify(|kind| {
                if change.kind == ChangeKind::Deleted || *kind != ChangeKind::Deleted {
                    *kind = change.kind;
                }
            })
            .or_insert(change.kind);
    }

    /// Take the collapsed changes, leaving the set empty.
    pub fn drain(&mut self) -> Vec<FileChange> {
        std::mem::take(&mut self.changes)
            .into_iter()
            .map(|(path, kind)| FileChange { path, kind })
            .collect()
    }

    /// Number of distinct changed paths.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
