//! Duplicate finder pipeline orchestration.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs the detection pipeline end to end:
//! 1. **Walk**: collect eligible files under the root (see [`crate::scanner::Walker`])
//! 2. **Group**: bucket files by exact size (see [`super::groups`])
//! 3. **Match**: split each bucket into identical-content groups (see [`super::matcher`])
//!
//! Buckets are matched on a dedicated rayon pool of `io_threads` workers.
//! Each bucket is handled start to finish by one worker and results are
//! collected in bucket order, so the output order does not depend on
//! scheduling. A worker holds at most two files open at once.
//!
//! # Example
//!
//! ```no_run
//! use dupfind::duplicates::{DuplicateFinder, FinderConfig, MatchStrategy};
//! use std::path::Path;
//!
//! let config = FinderConfig::default()
//!     .with_strategy(MatchStrategy::Pairwise)
//!     .with_io_threads(2);
//! let finder = DuplicateFinder::new(config);
//!
//! let (result, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//! println!("{} groups, {} reclaimable", result.len(), summary.reclaimable_display());
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;

use super::matcher::{BucketMatch, ContentMatcher, MatchStrategy};
use super::{group_entries_by_size_with_errors, ScanResult};
use crate::progress::ProgressCallback;
use crate::scanner::{
    FileEntry, HashError, RootError, ScanError, Walker, WalkerConfig, DEFAULT_CHUNK_SIZE,
    MIN_CHUNK_SIZE,
};

/// Default number of bucket workers.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Content comparison strategy.
    pub strategy: MatchStrategy,
    /// Number of worker threads matching buckets.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Read chunk size in bytes for hashing and comparison.
    pub chunk_size: usize,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("strategy", &self.strategy)
            .field("io_threads", &self.io_threads)
            .field("chunk_size", &self.chunk_size)
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::default(),
            io_threads: DEFAULT_IO_THREADS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the content comparison strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the number of bucket workers (at least 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the read chunk size (at least [`MIN_CHUNK_SIZE`]).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(MIN_CHUNK_SIZE);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Total number of files handed to size grouping
    pub total_files: usize,
    /// Total size of all files that could be stat-ed, in bytes
    pub total_size: u64,
    /// Zero-byte files dropped before matching
    pub empty_files: usize,
    /// Files eliminated because no other file shared their size
    pub eliminated_by_size: usize,
    /// Size buckets that went through content matching
    pub buckets: usize,
    /// Directory entries the walker could not read
    pub skipped_entries: usize,
    /// Files excluded because they could not be read after discovery
    pub failures: Vec<HashError>,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding one original per group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Time spent walking the tree
    pub walk_duration: Duration,
    /// Time spent grouping by size
    pub grouping_duration: Duration,
    /// Time spent matching contents
    pub matching_duration: Duration,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Number of files excluded by read failures.
    #[must_use]
    pub fn failed_files(&self) -> usize {
        self.failures.len()
    }

    /// Whether any file was excluded by a read failure.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The root is missing, not a directory, or unreadable.
    #[error("Invalid root {}: {reason}", path.display())]
    InvalidRoot {
        /// The rejected root
        path: PathBuf,
        /// Why it was rejected
        reason: RootError,
    },

    /// The scan was cancelled (Ctrl+C or shutdown signal).
    #[error("Scan cancelled by user")]
    Cancelled,

    /// The bucket worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

}

/// Only root-level walk errors reach here; per-entry errors are collected
/// by the walker and never abort the scan.
impl From<ScanError> for FinderError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidRoot { path, reason } => FinderError::InvalidRoot { path, reason },
            ScanError::Interrupted => FinderError::Cancelled,
            ScanError::PermissionDenied(path) => FinderError::InvalidRoot {
                path,
                reason: RootError::Unreadable(io::ErrorKind::PermissionDenied.into()),
            },
            ScanError::Io { path, source } => FinderError::InvalidRoot {
                path,
                reason: RootError::Unreadable(source),
            },
        }
    }
}

/// Duplicate finder that orchestrates the detection pipeline.
///
/// # Example
///
/// ```no_run
/// use dupfind::duplicates::DuplicateFinder;
/// use std::path::Path;
///
/// let finder = DuplicateFinder::with_defaults();
/// match finder.find_duplicates(Path::new(".")) {
///     Ok((result, summary)) => {
///         println!("Found {} duplicate groups", result.len());
///         println!("Can reclaim {} bytes", summary.reclaimable_space);
///     }
///     Err(e) => eprintln!("Scan failed: {}", e),
/// }
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    matcher: ContentMatcher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut matcher = ContentMatcher::new(config.strategy).with_chunk_size(config.chunk_size);
        if let Some(ref flag) = config.shutdown_flag {
            matcher = matcher.with_shutdown_flag(flag.clone());
        }
        Self { config, matcher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The configuration this finder runs with.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find all duplicate files beneath `root`.
    ///
    /// # Errors
    ///
    /// - [`FinderError::InvalidRoot`] if `root` is missing, not a directory,
    ///   or unreadable; nothing is traversed in that case
    /// - [`FinderError::Cancelled`] if shutdown was requested at any point
    pub fn find_duplicates(&self, root: &Path) -> Result<(ScanResult, ScanSummary), FinderError> {
        let start_time = Instant::now();

        log::info!(
            "Starting duplicate scan of {} ({} strategy)",
            root.display(),
            self.config.strategy
        );

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Cancelled);
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
            callback.on_message(&format!("Walking {}", root.display()));
        }

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(callback.clone());
        }

        let (files, walk_errors) = walker.walk_with_errors()?;

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        let walk_duration = start_time.elapsed();
        log::info!(
            "Walk complete: {} files in {:.2?} ({} entries skipped)",
            files.len(),
            walk_duration,
            walk_errors.len()
        );

        let (result, mut summary) = self.find_duplicates_in_paths(files)?;
        summary.skipped_entries = walk_errors.len();
        summary.walk_duration = walk_duration;
        summary.scan_duration = start_time.elapsed();

        Ok((result, summary))
    }

    /// Find duplicates among an already collected list of paths.
    ///
    /// Paths are used as given: no eligibility filtering is applied, but
    /// repeated paths are only counted once.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Cancelled`] if shutdown was requested, or
    /// [`FinderError::ThreadPool`] if the worker pool could not be built.
    pub fn find_duplicates_in_paths(
        &self,
        paths: impl IntoIterator<Item = PathBuf>,
    ) -> Result<(ScanResult, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Cancelled);
        }

        // Phase 1: Group by size
        let entries: Vec<FileEntry> = paths.into_iter().map(FileEntry::new).collect();
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("grouping", entries.len());
        }

        let (buckets, size_stats, stat_failures) = group_entries_by_size_with_errors(entries);

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_progress(size_stats.total_files, "");
            callback.on_phase_end("grouping");
        }

        summary.total_files = size_stats.total_files;
        summary.total_size = size_stats.total_size;
        summary.empty_files = size_stats.empty_files;
        summary.eliminated_by_size = size_stats.eliminated_unique;
        summary.buckets = buckets.len();
        summary.failures = stat_failures;
        summary.grouping_duration = start_time.elapsed();

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Cancelled);
        }

        // Phase 2: Match contents within each bucket
        let matching_start = Instant::now();
        let matches = self.match_buckets(&buckets)?;
        summary.matching_duration = matching_start.elapsed();

        let mut groups = Vec::new();
        for matched in matches {
            groups.extend(matched.groups);
            summary.failures.extend(matched.failures);
        }
        let result = ScanResult::new(groups);

        summary.duplicate_groups = result.len();
        summary.duplicate_files = result.duplicate_files();
        summary.reclaimable_space = result.reclaimable_space();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable, {} failures",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display(),
            summary.failed_files()
        );

        Ok((result, summary))
    }

    /// Match every bucket on the worker pool, keeping bucket order.
    fn match_buckets(
        &self,
        buckets: &[super::SizeBucket],
    ) -> Result<Vec<BucketMatch>, FinderError> {
        if buckets.is_empty() {
            log::info!("No potential duplicates found after size grouping");
            return Ok(Vec::new());
        }

        log::info!(
            "Matching {} buckets on {} worker(s)",
            buckets.len(),
            self.config.io_threads
        );

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("matching", buckets.len());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .thread_name(|i| format!("dupfind-io-{}", i))
            .build()?;

        let completed = AtomicUsize::new(0);
        let outcome: Result<Vec<BucketMatch>, HashError> = pool.install(|| {
            buckets
                .par_iter()
                .map(|bucket| {
                    if self.config.is_shutdown_requested() {
                        return Err(HashError::Interrupted);
                    }

                    let matched = self.matcher.match_bucket(bucket)?;

                    if let Some(ref callback) = self.config.progress_callback {
                        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                        let label = bucket
                            .files
                            .first()
                            .map(|f| f.path.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        callback.on_progress(done, &label);
                    }

                    Ok(matched)
                })
                .collect()
        });

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("matching");
        }

        // match_bucket keeps per-file failures in the result; an error here
        // is always a shutdown request
        outcome.map_err(|_| {
            log::info!("Matching interrupted by shutdown signal");
            FinderError::Cancelled
        })
    }
}
