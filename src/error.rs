//! Structured error handling and exit codes.
//!
//! The library reports failures through `thiserror` enums; the binary works
//! in `anyhow::Result` and maps the outcome of a run onto an [`ExitCode`]
//! here. With `--json-errors` a failure is written to stderr as a
//! [`StructuredError`] instead of plain text.

use serde::Serialize;

use crate::duplicates::{FinderError, ScanSummary};

/// Exit codes for the dupfind binary.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (including an invalid root)
/// - 2: No duplicates found (completed normally, no duplicates)
/// - 3: Partial success (completed, but some files could not be read)
/// - 130: Cancelled by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Scan completed and duplicates were found.
    Success = 0,
    /// An error stopped the run.
    GeneralError = 1,
    /// Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Scan completed but some files were excluded by read failures.
    PartialSuccess = 3,
    /// Scan was cancelled by user (Ctrl+C).
    Cancelled = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DF000",
            Self::GeneralError => "DF001",
            Self::NoDuplicates => "DF002",
            Self::PartialSuccess => "DF003",
            Self::Cancelled => "DF130",
        }
    }

    /// Exit code for a scan that ran to completion.
    ///
    /// Read failures take precedence over the duplicates/no-duplicates
    /// distinction, since the result may be missing groups.
    #[must_use]
    pub fn for_summary(summary: &ScanSummary) -> Self {
        if summary.has_failures() {
            Self::PartialSuccess
        } else if summary.duplicate_groups > 0 {
            Self::Success
        } else {
            Self::NoDuplicates
        }
    }

    /// Exit code for a run that failed with `err`.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<FinderError>() {
            Some(FinderError::Cancelled) => Self::Cancelled,
            _ => Self::GeneralError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // All variants fit in a u8
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DF001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Underlying causes, outermost first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
    /// Whether the operation was cancelled
    pub cancelled: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            causes: err.chain().skip(1).map(ToString::to_string).collect(),
            cancelled: exit_code == ExitCode::Cancelled,
        }
    }

    /// Serialize to a single-line JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"code":"{}","exit_code":{},"message":"serialization failed"}}"#,
                self.code, self.exit_code
            )
        })
    }
}
