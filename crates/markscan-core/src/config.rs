//! Scan configuration.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Keywords matched when none are configured.
pub const DEFAULT_KEYWORDS: &[&str] = &["TODO", "FIXME", "BUG", "HACK", "NOTE"];

/// Maximum file size scanned when none is configured (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5_242_880;

/// Exclude patterns always merged into the configured set. Covers the
/// dependency/build/VCS directories of the common ecosystems.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/bower_components/**",
    "**/dist/**",
    "**/build/**",
    "**/out/**",
    "**/target/**",
    "**/.git/**",
    "**/.hg/**",
    "**/.svn/**",
    "**/__pycache__/**",
    "**/.venv/**",
    "**/venv/**",
    "**/.tox/**",
    "**/.cache/**",
    "**/coverage/**",
    "**/.next/**",
    "**/.nuxt/**",
    "**/vendor/**",
];

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Marker keywords, matched as literal substrings in list order
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Include glob patterns, processed in order
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Extra exclude glob patterns, merged with the built-in defaults
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Maximum file size in bytes; larger files are skipped, not scanned
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Rescan automatically when a watched file is saved
    #[serde(default = "default_scan_on_save")]
    pub scan_on_save: bool,

    /// Quiet period before change notifications trigger a rescan
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_include() -> Vec<String> {
    vec!["**/*.{ts,tsx,js,jsx}".to_string()]
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_scan_on_save() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            include: default_include(),
            exclude: Vec::new(),
            max_file_size: default_max_file_size(),
            scan_on_save: default_scan_on_save(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a YAML file.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can drive a scan pass at all.
    /// Individual bad glob patterns are handled per-pattern at scan time;
    /// this rejects only configurations that are unusable as a whole.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.keywords.is_empty() {
            return Err(CoreError::Config("keyword list is empty".to_string()));
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(CoreError::Config("keyword list contains a blank keyword".to_string()));
        }
        if self.include.is_empty() {
            return Err(CoreError::Config("include pattern list is empty".to_string()));
        }
        if self.max_file_size == 0 {
            return Err(CoreError::Config("max_file_size must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Built-in exclude defaults plus the configured additions.
    pub fn effective_excludes(&self) -> Vec<String> {
        let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|e| e.to_string()).collect();
        excludes.extend(self.exclude.iter().cloned());
        excludes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.keywords, vec!["TODO", "FIXME", "BUG", "HACK", "NOTE"]);
        assert_eq!(config.include, vec!["**/*.{ts,tsx,js,jsx}"]);
        assert!(config.exclude.is_empty());
        assert_eq!(config.max_file_size, 5_242_880);
        assert!(config.scan_on_save);
        assert_eq!(config.debounce_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_keywords() {
        let config = ScanConfig {
            keywords: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_keyword() {
        let config = ScanConfig {
            keywords: vec!["TODO".to_string(), "  ".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_includes() {
        let config = ScanConfig {
            include: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_excludes_merges_additions() {
        let config = ScanConfig {
            exclude: vec!["**/generated/**".to_string()],
            ..Default::default()
        };
        let excludes = config.effective_excludes();
        assert!(excludes.iter().any(|e| e == "**/node_modules/**"));
        assert!(excludes.iter().any(|e| e == "**/.git/**"));
        assert!(excludes.iter().any(|e| e == "**/generated/**"));
    }

    #[test]
    fn test_load_from_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("markscan.yaml");
        std::fs::write(
            &path,
            r#"keywords:
  - TODO
  - XXX
include:
  - "**/*.rs"
max_file_size: 1024
"#,
        )
        .unwrap();

        let config = ScanConfig::load_from(&path).unwrap();
        assert_eq!(config.keywords, vec!["TODO", "XXX"]);
        assert_eq!(config.include, vec!["**/*.rs"]);
        assert_eq!(config.max_file_size, 1024);
        // Unspecified fields fall back to defaults
        assert!(config.scan_on_save);
    }

    #[test]
    fn test_load_from_invalid_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("markscan.yaml");
        std::fs::write(&path, "keywords: [unclosed").unwrap();

        assert!(matches!(
            ScanConfig::load_from(&path),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        assert!(matches!(
            ScanConfig::load_from(Path::new("/nonexistent/markscan.yaml")),
            Err(CoreError::Io(_))
        ));
    }
}
