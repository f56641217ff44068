//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "method": "hash",
//!   "root": "/data",
//!   "duplicates": [
//!     {
//!       "key": "4f4e99c2da696a47de3b455758bff316",
//!       "files": ["/data/file1.txt", "/data/file3.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 7,
//!     "total_size": 63,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "scan_duration_ms": 12,
//!     "errors": [
//!       { "path": "/data/locked", "message": "Permission denied: /data/locked" }
//!     ]
//!   }
//! }
//! ```
//!
//! JSON strings must be valid UTF-8. Keys and paths that are not are written
//! with U+FFFD in place of the invalid bytes; grouping itself always compares
//! the raw names, so such entries are still grouped correctly.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::duplicates::{DuplicateGroups, ScanMode, ScanSummary};
use crate::scanner::ScanError;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Hex digest or base filename
    pub key: String,
    /// Member paths as reported by the walk
    pub files: Vec<String>,
}

/// One skipped entry.
#[derive(Debug, Clone, Serialize)]
pub struct JsonScanError {
    /// Path that could not be processed
    pub path: String,
    /// Human-readable reason
    pub message: String,
}

impl From<&ScanError> for JsonScanError {
    fn from(error: &ScanError) -> Self {
        Self {
            path: path_string(error.path()),
            message: error.to_string(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files discovered
    pub total_files: usize,
    /// Total size of all discovered files in bytes
    pub total_size: u64,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Members beyond the first of each group
    pub duplicate_files: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// Entries skipped because they could not be read
    pub errors: Vec<JsonScanError>,
}

impl From<&ScanSummary> for JsonSummary {
    fn from(summary: &ScanSummary) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            errors: summary.errors.iter().map(JsonScanError::from).collect(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Detection method (`hash` or `name`)
    pub method: ScanMode,
    /// Scanned directory
    pub root: String,
    /// Groups with two or more members
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the document for a completed scan.
    ///
    /// # Example
    ///
    /// ```
    /// use dupescan::duplicates::{DuplicateGroups, ScanMode, ScanSummary};
    /// use dupescan::output::JsonOutput;
    /// use std::path::Path;
    ///
    /// let output = JsonOutput::new(
    ///     ScanMode::Content,
    ///     Path::new("/data"),
    ///     &DuplicateGroups::default(),
    ///     &ScanSummary::default(),
    /// );
    /// assert!(output.duplicates.is_empty());
    /// ```
    #[must_use]
    pub fn new(
        mode: ScanMode,
        root: &Path,
        groups: &DuplicateGroups,
        summary: &ScanSummary,
    ) -> Self {
        Self {
            method: mode,
            root: path_string(root),
            duplicates: groups
                .iter()
                .map(|group| JsonDuplicateGroup {
                    key: group.display_key().into_owned(),
                    files: group.files.iter().map(|p| path_string(p)).collect(),
                })
                .collect(),
            summary: JsonSummary::from(summary),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Render a path as a JSON string, replacing invalid UTF-8.
fn path_string(path: &Path) -> String {
    match path.to_str() {
        Some(s) => s.to_string(),
        None => {
            log::debug!("Non-UTF-8 path written lossily: {}", path.display());
            path.to_string_lossy().into_owned()
        }
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON output: {0}")]
    Io(#[from] std::io::Error),
}
