//! Markscan Indexer
//!
//! This crate provides the incremental scan-and-cache engine for
//! markscan, including:
//! - File fingerprinting (content hash + mtime cache-validity tokens)
//! - Line-oriented marker scanning with binary-input tolerance
//! - A fingerprint-validated per-file result cache
//! - The scan orchestrator aggregating per-file results into a snapshot
//! - File watching with debounced change notifications

mod cache;
mod engine;
mod error;
mod fingerprint;
mod scanner;
mod walker;
pub mod watcher;

pub use cache::{FileRecord, ScanCache};
pub use engine::{CancelFlag, NoProgress, ProgressSink, ScanEngine, ScanReport};
pub use error::IndexError;
pub use fingerprint::{fingerprint_file, Fingerprint};
pub use scanner::scan_file;
pub use walker::{enumerate, FileMeta};
pub use watcher::{ChangeKind, ChangeSet, FileChange, FileWatcher, WatcherOptions};
