//! Command-line interface definitions for dupfind.
//!
//! Global options (verbosity, color, error format, config file) come first,
//! then a subcommand.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory and print groups as text
//! dupfind scan ~/Downloads
//!
//! # Byte-for-byte comparison, pretty JSON for scripting
//! dupfind scan ~/Downloads --mode pairwise --output json --pretty
//!
//! # Show the effective configuration
//! dupfind config
//! ```

use std::path::PathBuf;

use bytesize::ByteSize;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::ConfigOverrides;
use crate::duplicates::MatchStrategy;
use crate::scanner::WalkerConfig;

/// Find groups of files with identical content.
///
/// dupfind narrows candidates by size, then confirms identical content with
/// BLAKE3 checksums or a direct byte-for-byte comparison.
#[derive(Debug, Parser)]
#[command(name = "dupfind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report failures on stderr as a JSON object
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files
    Scan(ScanArgs),
    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Arguments for the scan subcommand.
///
/// Options left unset fall back to the configuration file, then to
/// `DUPFIND_*` environment variables, then to built-in defaults.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory path to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Content comparison strategy
    #[arg(short, long, value_enum, value_name = "MODE")]
    pub mode: Option<MatchStrategy>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Number of worker threads matching size buckets (default: 4)
    ///
    /// Each worker keeps at most two files open. Lower values reduce disk
    /// thrashing on HDDs.
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Read chunk size for hashing and comparison (e.g., 64KiB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub chunk_size: Option<u64>,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Maximum directory depth (1 = only direct children of PATH)
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_depth: Option<usize>,

    /// Log per-phase durations and print the total elapsed time
    #[arg(long)]
    pub timing: bool,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

impl ScanArgs {
    /// Settings given explicitly on the command line.
    ///
    /// Flags that were not passed stay `None` so they do not mask lower
    /// configuration layers.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mode: self.mode,
            chunk_size: self
                .chunk_size
                .map(|size| usize::try_from(size).unwrap_or(usize::MAX)),
            io_threads: self.io_threads,
            skip_hidden: self.skip_hidden.then_some(true),
            pretty: self.pretty.then_some(true),
            progress: self.no_progress.then_some(false),
        }
    }

    /// Walker configuration for this scan.
    #[must_use]
    pub fn walker_config(&self, skip_hidden: bool) -> WalkerConfig {
        WalkerConfig::new(skip_hidden, self.max_depth)
    }
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write a default configuration file
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing configuration file
    #[arg(long, requires = "init")]
    pub force: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON for scripting
    Json,
    /// CSV for spreadsheets, one row per file
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Accepts plain byte counts and decimal or binary suffixes.
///
/// ```
/// use dupfind::cli::parse_size;
///
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
///
/// # Errors
///
/// Returns an error message if the string is empty or not a size.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    s.parse::<ByteSize>()
        .map(|size| size.as_u64())
        .map_err(|e| format!("Invalid size '{s}': {e}"))
}
