//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "hash": "abc123...",
//!       "size": 1024,
//!       "files": ["/path/to/file1.txt", "/path/to/file2.txt"]
//!     }
//!   ],
//!   "failures": [
//!     { "path": "/path/to/unreadable", "error": "Permission denied: ..." }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "duplicate_groups": 5,
//!     "reclaimable_space": 51200,
//!     "scan_duration_ms": 1234,
//!     "exit_code": 0,
//!     "exit_code_name": "DF000"
//!   }
//! }
//! ```
//!
//! `hash` is `null` for groups found by pairwise comparison.

use std::io::Write;

use serde::Serialize;

use super::display_path;
use crate::duplicates::{DuplicateGroup, ScanResult, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::HashError;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// BLAKE3 hash as hexadecimal string (64 characters), if computed
    pub hash: Option<String>,
    /// File size in bytes
    pub size: u64,
    /// Paths of all files in the group, in match order
    pub files: Vec<String>,
}

impl From<&DuplicateGroup> for JsonDuplicateGroup {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.hash_hex(),
            size: group.size,
            files: group.files.iter().map(|p| display_path(p)).collect(),
        }
    }
}

/// A file excluded by a read failure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFailure {
    /// Path of the file, when known
    pub path: Option<String>,
    /// Error message
    pub error: String,
}

impl From<&HashError> for JsonFailure {
    fn from(err: &HashError) -> Self {
        Self {
            path: err.path().map(display_path),
            error: err.to_string(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Zero-byte files ignored
    pub empty_files: usize,
    /// Files eliminated by size grouping
    pub eliminated_by_size: usize,
    /// Size buckets compared by content
    pub buckets: usize,
    /// Files excluded by read failures
    pub failed_files: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates (bytes)
    pub reclaimable_space: u64,
    /// Duration of the walking phase in milliseconds
    pub walk_duration_ms: u64,
    /// Duration of the size grouping phase in milliseconds
    pub grouping_duration_ms: u64,
    /// Duration of the content matching phase in milliseconds
    pub matching_duration_ms: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DF000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            empty_files: summary.empty_files,
            eliminated_by_size: summary.eliminated_by_size,
            buckets: summary.buckets,
            failed_files: summary.failed_files(),
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            walk_duration_ms: summary.walk_duration.as_millis() as u64,
            grouping_duration_ms: summary.grouping_duration.as_millis() as u64,
            matching_duration_ms: summary.matching_duration.as_millis() as u64,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// List of duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Files left out of the result
    pub failures: Vec<JsonFailure>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from a result, its summary and the exit code.
    ///
    /// ```
    /// use dupfind::duplicates::{DuplicateGroup, ScanResult, ScanSummary};
    /// use dupfind::error::ExitCode;
    /// use dupfind::output::JsonOutput;
    /// use std::path::PathBuf;
    ///
    /// let result = ScanResult::new(vec![DuplicateGroup::new(
    ///     1024,
    ///     None,
    ///     vec![PathBuf::from("/file1.txt"), PathBuf::from("/file2.txt")],
    /// )]);
    ///
    /// let output = JsonOutput::new(&result, &ScanSummary::default(), ExitCode::Success);
    /// assert_eq!(output.duplicates.len(), 1);
    /// assert!(output.to_json().unwrap().starts_with('{'));
    /// ```
    #[must_use]
    pub fn new(result: &ScanResult, summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            duplicates: result.iter().map(JsonDuplicateGroup::from).collect(),
            failures: summary.failures.iter().map(JsonFailure::from).collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON followed by a newline.
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

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
