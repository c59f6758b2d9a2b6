//! Human-readable text output.
//!
//! ```text
//! Group 1: 2 files, 5 B each [ea8f163db386]
//!   /data/a.txt
//!   /data/b.txt
//!
//! 1 duplicate group, 1 redundant file, 5 B reclaimable
//! ```

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::{Paint, Style};

use super::display_path;
use crate::duplicates::{ScanResult, ScanSummary};

/// Number of hash characters shown in group headers.
const SHORT_HASH_LEN: usize = 12;

/// Text output formatter.
pub struct TextOutput<'a> {
    result: &'a ScanResult,
    summary: &'a ScanSummary,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter. Colors are on by default.
    #[must_use]
    pub fn new(result: &'a ScanResult, summary: &'a ScanSummary) -> Self {
        Self {
            result,
            summary,
            color: true,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.paint(style).to_string()
        } else {
            text.to_string()
        }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let header = Style::new().bold();
        let dim = Style::new().dim();

        for (idx, group) in self.result.iter().enumerate() {
            let mut title = format!(
                "Group {}: {} files, {} each",
                idx + 1,
                group.len(),
                ByteSize::b(group.size)
            );
            write!(writer, "{}", self.paint(&title, header))?;
            if let Some(hex) = group.hash_hex() {
                title = format!(" [{}]", &hex[..SHORT_HASH_LEN]);
                write!(writer, "{}", self.paint(&title, dim))?;
            }
            writeln!(writer)?;

            for path in &group.files {
                writeln!(writer, "  {}", display_path(path))?;
            }
            writeln!(writer)?;
        }

        self.write_footer(writer)
    }

    fn write_footer<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.result.is_empty() {
            let line = format!(
                "No duplicates found among {} files",
                self.summary.total_files
            );
            writeln!(writer, "{}", self.paint(&line, Style::new().green()))?;
        } else {
            let groups = self.result.len();
            let files = self.result.duplicate_files();
            let line = format!(
                "{} duplicate {}, {} redundant {}, {} reclaimable",
                groups,
                plural(groups, "group", "groups"),
                files,
                plural(files, "file", "files"),
                ByteSize::b(self.result.reclaimable_space())
            );
            writeln!(writer, "{}", self.paint(&line, Style::new().yellow().bold()))?;
        }

        let failed = self.summary.failed_files();
        if failed > 0 {
            let line = format!(
                "{} {} could not be read and {} skipped",
                failed,
                plural(failed, "file", "files"),
                plural(failed, "was", "were")
            );
            writeln!(writer, "{}", self.paint(&line, Style::new().red()))?;
        }
        Ok(())
    }

    /// Render the report into a string.
    ///
    /// # Errors
    ///
    /// Never fails in practice; writing to a `Vec` cannot error.
    pub fn to_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn plural<'s>(n: usize, one: &'s str, many: &'s str) -> &'s str {
    if n == 1 {
        one
    } else {
        many
    }
}
