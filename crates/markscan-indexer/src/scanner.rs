//! Per-file marker scanning.

use crate::IndexError;
use markscan_core::{match_line, Entry};
use std::path::Path;
use tracing::warn;

/// Detect binary content by checking for NUL bytes in the first 512
/// bytes. The same heuristic git and grep use.
fn looks_binary(bytes: &[u8]) -> bool {
    let probe = &bytes[..bytes.len().min(512)];
    probe.contains(&0)
}

/// Scan one file, applying the line matcher to every line.
///
/// A file with zero matches yields an empty list; that is not an error.
/// Binary content fails with `IndexError::Encoding`, which the
/// orchestrator logs and counts as a skipped file. Non-binary content
/// with invalid UTF-8 is decoded lossily so near-text files still
/// contribute entries.
pub async fn scan_file(path: &Path, keywords: &[String]) -> Result<Vec<Entry>, IndexError> {
    let bytes = tokio::fs::read(path).await?;

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            if looks_binary(&bytes) {
                return Err(IndexError::Encoding {
                    path: path.to_path_buf(),
                    message: "binary content".to_string(),
                });
            }
            warn!(path = ?path, "Invalid UTF-8, decoding lossily");
            String::from_utf8_lossy(&bytes).into_owned()
        }
    };

    let mut entries = Vec::new();
    for (line, line_text) in content.lines().enumerate() {
        if let Some(m) = match_line(line_text, keywords) {
            entries.push(Entry {
                kind: m.kind,
                text: m.text,
                path: path.to_path_buf(),
                line,
                line_text: line_text.to_string(),
            });
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn keywords() -> Vec<String> {
        ["TODO", "FIXME", "BUG", "HACK", "NOTE"]
            .iter()
            .map(|k| k.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_scan_extracts_entries_with_positions() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("app.ts");
        std::fs::write(
            &path,
            "const x = 1;\n// TODO: wire up the API\nlet y;\n// FIXME - broken offset\n",
        )
        .unwrap();

        let entries = scan_file(&path, &keywords()).await.unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].kind, "TODO");
        assert_eq!(entries[0].text, "wire up the API");
        assert_eq!(entries[0].line, 1);
        assert_eq!(entries[0].line_text, "// TODO: wire up the API");
        assert_eq!(entries[0].path, path);

        assert_eq!(entries[1].kind, "FIXME");
        assert_eq!(entries[1].text, "broken offset");
        assert_eq!(entries[1].line, 3);
    }

    #[tokio::test]
    async fn test_scan_no_matches_is_empty_ok() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("clean.ts");
        std::fs::write(&path, "const x = 1;\nconst y = 2;\n").unwrap();

        let entries = scan_file(&path, &keywords()).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_scan_binary_is_encoding_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("blob.bin");
        std::fs::write(&path, [0u8, 159, 146, 150, 0, 1, 2]).unwrap();

        let err = scan_file(&path, &keywords()).await.unwrap_err();
        assert!(matches!(err, IndexError::Encoding { .. }));
    }

    #[tokio::test]
    async fn test_scan_invalid_utf8_without_nul_degrades_lossily() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("latin1.ts");
        // 0xE9 is not valid UTF-8 but the file is not binary.
        let mut bytes = b"// TODO: caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"\n");
        std::fs::write(&path, bytes).unwrap();

        let entries = scan_file(&path, &keywords()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].text.starts_with("caf"));
    }

    #[tokio::test]
    async fn test_scan_missing_file_is_io_error() {
        let temp_dir = tempdir().unwrap();
        let err = scan_file(&temp_dir.path().join("gone.ts"), &keywords())
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::Io(_)));
    }

    #[tokio::test]
    async fn test_scan_uses_keyword_list_order() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("order.ts");
        std::fs::write(&path, "// FIXME TODO: both present\n").unwrap();

        let entries = scan_file(&path, &keywords()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, "TODO");
    }
}
