//! dupfind - duplicate file finder
//!
//! Finds groups of files with identical content beneath a directory. Files
//! are narrowed down by size, then confirmed identical either by BLAKE3
//! checksum or by direct byte-for-byte comparison.
//!
//! The core pipeline lives in [`scanner`] and [`duplicates`] and does no
//! printing. The remaining modules make up the command-line front end.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use cli::{Cli, Commands, ConfigArgs, OutputFormat, ScanArgs};
use config::{Config, ConfigError, ConfigOverrides};
use duplicates::{DuplicateFinder, FinderConfig, ScanResult, ScanSummary};
use error::ExitCode;
use output::{CsvOutput, JsonOutput, TextOutput};
use progress::{Progress, ProgressCallback};

/// Run the command described by `cli`.
///
/// Returns the exit code for a run that completed, including scans that
/// found nothing or had to skip unreadable files.
///
/// # Errors
///
/// Returns an error for invalid configuration, an invalid scan root,
/// cancellation, or a failure writing the report. Use
/// [`ExitCode::for_error`] to map it to an exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Scan(args) => run_scan(&cli, args),
        Commands::Config(args) => run_config(&cli, args),
    }
}

fn run_scan(cli: &Cli, args: &ScanArgs) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref(), &args.overrides())?;
    let handler = signal::install_handler()?;

    let show_progress = config.progress
        && !cli.quiet
        && args.output == OutputFormat::Text
        && io::stderr().is_terminal();

    let mut finder_config = FinderConfig::default()
        .with_strategy(config.mode)
        .with_io_threads(config.io_threads)
        .with_chunk_size(config.chunk_size)
        .with_walker_config(args.walker_config(config.skip_hidden))
        .with_shutdown_flag(handler.get_flag());
    if show_progress {
        let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(false));
        finder_config = finder_config.with_progress_callback(progress);
    }

    log::debug!("Finder configuration: {:?}", finder_config);

    let finder = DuplicateFinder::new(finder_config);
    let (result, summary) = finder.find_duplicates(&args.path)?;

    if args.timing {
        report_timing(&summary);
    }

    let exit_code = ExitCode::for_summary(&summary);
    let color = !cli.no_color && io::stdout().is_terminal();
    write_report(args.output, &result, &summary, exit_code, config.pretty, color)
        .context("Failed to write scan results")?;

    Ok(exit_code)
}

fn write_report(
    format: OutputFormat,
    result: &ScanResult,
    summary: &ScanSummary,
    exit_code: ExitCode,
    pretty: bool,
    color: bool,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Text => TextOutput::new(result, summary)
            .with_color(color)
            .write_to(&mut out)?,
        OutputFormat::Json => JsonOutput::new(result, summary, exit_code).write_to(&mut out, pretty)?,
        OutputFormat::Csv => CsvOutput::new(result).write_to(&mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn report_timing(summary: &ScanSummary) {
    log::info!("Walk:     {:.3?}", summary.walk_duration);
    log::info!("Grouping: {:.3?}", summary.grouping_duration);
    log::info!("Matching: {:.3?}", summary.matching_duration);
    eprintln!("Elapsed: {:.3?}", summary.scan_duration);
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<ExitCode> {
    if args.init {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::default_path().ok_or(ConfigError::NoConfigDir)?,
        };
        Config::default().save(&path, args.force)?;
        println!("{}", path.display());
        return Ok(ExitCode::Success);
    }

    let config = Config::load(cli.config.as_deref(), &ConfigOverrides::default())?;
    print!("{}", config.to_toml()?);
    Ok(ExitCode::Success)
}
