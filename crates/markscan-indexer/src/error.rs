//! Indexer error types.

use markscan_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during scan operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File content could not be decoded as text
    #[error("Cannot decode {path} as text: {message}")]
    Encoding { path: PathBuf, message: String },

    /// Fatal configuration problem; no partial results are produced
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Pass aborted by caller request; a normal termination mode
    #[error("Scan cancelled")]
    Cancelled,

    /// File watcher error
    #[error("Watcher error: {0}")]
    Watcher(String),

    /// Path not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),
}

impl From<CoreError> for IndexError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Config(message) => IndexError::Config(message),
            CoreError::Io(io) => IndexError::Io(io),
        }
    }
}
