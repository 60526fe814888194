//! File enumeration for one include pattern.
//!
//! Resolves an include glob against a root directory, pruning excluded
//! paths, and returns the matching files with their sizes.

use crate::IndexError;
use ignore::overrides::OverrideBuilder;
use ignore::{WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::debug;

/// A resolved candidate file.
#[derive(Debug, Clone)]
pub struct FileMeta {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes, from the enumeration stat
    pub size: u64,
}

/// Enumerate the files under `root` matching `include`, excluding any
/// path matching an exclude pattern.
///
/// The result is sorted by path for deterministic ordering. A pattern
/// that fails to compile is a `Config` error for this call only; the
/// orchestrator logs it and moves on to the next include pattern.
/// Individual unreadable directory entries are logged and skipped.
pub fn enumerate(
    root: &Path,
    include: &str,
    excludes: &[String],
) -> Result<Vec<FileMeta>, IndexError> {
    let mut builder = OverrideBuilder::new(root);
    builder
        .add(include)
        .map_err(|e| IndexError::Config(format!("include pattern {include:?}: {e}")))?;
    for exclude in excludes {
        builder
            .add(&format!("!{exclude}"))
            .map_err(|e| IndexError::Config(format!("exclude pattern {exclude:?}: {e}")))?;
    }
    let overrides = builder
        .build()
        .map_err(|e| IndexError::Config(e.to_string()))?;

    let walker = WalkBuilder::new(root)
        .overrides(overrides)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .follow_links(false)
        .build_parallel();

    let (tx, rx) = mpsc::channel();

    walker.run(|| {
        let tx = tx.clone();
        Box::new(move |result| {
            match result {
                Ok(entry) => {
                    if entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                        match entry.metadata() {
                            Ok(metadata) => {
                                let _ = tx.send(FileMeta {
                                    path: entry.path().to_path_buf(),
                                    size: metadata.len(),
                                });
                            }
                            Err(e) => {
                                debug!(path = ?entry.path(), error = %e, "Stat failed");
                            }
                        }
                    }
                }
                Err(e) => {
                    // One unreadable entry must not abort the enumeration.
                    debug!(error = %e, "Walk error");
                }
            }
            WalkState::Continue
        })
    });

    drop(tx);

    let mut files: Vec<FileMeta> = rx.into_iter().collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(files)
}
