//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Text for people at a terminal
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! All formatters write to any `io::Write`; the binary passes stdout.
//!
//! # Example
//!
//! ```no_run
//! use dupfind::duplicates::DuplicateFinder;
//! use dupfind::error::ExitCode;
//! use dupfind::output::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (result, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&result, &summary, ExitCode::for_summary(&summary));
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::path::Path;

// Re-export main types
pub use self::csv::{CsvOutput, CsvOutputError};
pub use self::json::{JsonOutput, JsonOutputError};
pub use self::text::TextOutput;

/// Display form of a path for reports.
///
/// Non-UTF-8 bytes are replaced rather than dropped, so every file still
/// gets a row.
pub(crate) fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
