//! File fingerprinting for cache validity.
//!
//! A fingerprint combines the SHA-256 of a file's bytes with its
//! modification time. The mtime component makes this deliberately
//! conservative: a file rewritten with identical bytes but a new mtime
//! compares unequal and is rescanned.

use crate::IndexError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Opaque cache-validity token for a file's content + mtime state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    content_hash: String,
    mtime: u64,
}

impl Fingerprint {
    /// Build a fingerprint from raw content bytes and an mtime
    /// (seconds since the Unix epoch).
    pub fn from_bytes(bytes: &[u8], mtime: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self {
            content_hash: format!("{:x}", hasher.finalize()),
            mtime,
        }
    }

    /// Hex digest of the content hash component.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

/// Compute the fingerprint of a file's current on-disk state.
///
/// Fails with `IndexError::Io` when the file cannot be stat'd or read;
/// the caller treats that as a forced rescan attempt, not a fatal error.
pub async fn fingerprint_file(path: &Path) -> Result<Fingerprint, IndexError> {
    let metadata = tokio::fs::metadata(path).await?;
    let mtime = metadata
        .modified()?
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let bytes = tokio::fs::read(path).await?;
    Ok(Fingerprint::from_bytes(&bytes, mtime))
}
