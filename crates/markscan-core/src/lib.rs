//! Markscan Core Components
//!
//! This crate provides the data model shared by the markscan engine and
//! its consumers, including scan configuration, marker entries, the pure
//! line matcher, and the query/filter index.

mod config;
mod entry;
mod error;
mod matcher;
mod query;

pub use config::{ScanConfig, DEFAULT_EXCLUDES, DEFAULT_KEYWORDS, DEFAULT_MAX_FILE_SIZE};
pub use entry::{Entry, ScanIndex};
pub use error::CoreError;
pub use matcher::{match_line, LineMatch};
pub use query::{query, FilterSpec, SortMode};
