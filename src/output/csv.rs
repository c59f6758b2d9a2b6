//! CSV output formatter for duplicate scan results.
//!
//! One row is generated for each file in a duplicate group.
//!
//! # Columns
//!
//! - `group_id`: 1-based ID of the duplicate group
//! - `hash`: BLAKE3 content hash (hexadecimal), empty for pairwise groups
//! - `path`: Path to the file
//! - `size`: File size in bytes

use std::io;

use serde::Serialize;
use thiserror::Error;

use super::display_path;
use crate::duplicates::ScanResult;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    hash: &'a str,
    path: String,
    size: u64,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    result: &'a ScanResult,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(result: &'a ScanResult) -> Self {
        Self { result }
    }

    /// Write the CSV output, header first, to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        // An empty result still gets a header
        if self.result.is_empty() {
            csv_writer.write_record(["group_id", "hash", "path", "size"])?;
        }

        for (idx, group) in self.result.iter().enumerate() {
            let hash = group.hash_hex().unwrap_or_default();
            for path in &group.files {
                csv_writer.serialize(CsvRow {
                    group_id: idx + 1,
                    hash: &hash,
                    path: display_path(path),
                    size: group.size,
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
