//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! This module provides the size grouping phase of duplicate detection and
//! the value types the pipeline produces: [`SizeBucket`], [`DuplicateGroup`]
//! and [`ScanResult`].
//!
//! ## Size Grouping
//!
//! Files with different sizes cannot be duplicates, so grouping by exact size
//! eliminates most files with one stat call each and no content reads.
//! Zero-byte files are dropped outright: they are all trivially identical and
//! never reported.
//!
//! # Example
//!
//! ```
//! use dupfind::scanner::FileEntry;
//! use dupfind::duplicates::group_entries_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::with_size(PathBuf::from("/file1.txt"), 1024),
//!     FileEntry::with_size(PathBuf::from("/file2.txt"), 1024),
//!     FileEntry::with_size(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (buckets, stats) = group_entries_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(buckets.len(), 1);
//! assert_eq!(buckets[0].size, 1024);
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::scanner::{hash_to_hex, FileEntry, Hash, HashError};

/// A group of files with the same non-zero size.
///
/// Buckets produced by [`group_by_size`] always hold at least two files.
#[derive(Debug, Clone)]
pub struct SizeBucket {
    /// File size in bytes (shared by all files in this bucket)
    pub size: u64,
    /// Files with this exact size, in first-seen order
    pub files: Vec<FileEntry>,
}

impl SizeBucket {
    /// Create an empty bucket for `size`.
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            size,
            files: Vec::new(),
        }
    }

    /// Create a bucket with initial files.
    #[must_use]
    pub fn with_files(size: u64, files: Vec<FileEntry>) -> Self {
        Self { size, files }
    }

    /// Number of files in this bucket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this bucket has potential duplicates (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }

    /// Paths of the files in this bucket.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Confirmed group of byte-identical files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// File size in bytes (shared by all files)
    pub size: u64,
    /// BLAKE3 content digest, when the group was built by checksum
    pub hash: Option<Hash>,
    /// Paths of the identical files, in match order
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if the group has fewer than two files.
    #[must_use]
    pub fn new(size: u64, hash: Option<Hash>, files: Vec<PathBuf>) -> Self {
        debug_assert!(files.len() >= 2, "duplicate group needs 2+ files");
        debug_assert!(size > 0, "empty files are never grouped");
        Self { size, hash, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.files.len() as u64
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Hash as hexadecimal string, if the group carries one.
    #[must_use]
    pub fn hash_hex(&self) -> Option<String> {
        self.hash.as_ref().map(hash_to_hex)
    }

    /// Whether `path` is a member of this group.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p == path)
    }
}

/// The ordered list of duplicate groups found by one run.
///
/// Immutable once built: groups are exposed through read-only accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    groups: Vec<DuplicateGroup>,
}

impl ScanResult {
    /// Wrap an ordered list of groups.
    #[must_use]
    pub fn new(groups: Vec<DuplicateGroup>) -> Self {
        Self { groups }
    }

    /// The groups, in bucket order then match order.
    #[must_use]
    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over the groups.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateGroup> {
        self.groups.iter()
    }

    /// Number of redundant copies across all groups.
    #[must_use]
    pub fn duplicate_files(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }

    /// Bytes that removing every redundant copy would free.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::wasted_space).sum()
    }

    /// Group memberships as sets, ignoring group and member order.
    ///
    /// Two results describe the same partition iff their memberships match.
    #[must_use]
    pub fn memberships(&self) -> BTreeSet<BTreeSet<PathBuf>> {
        self.groups
            .iter()
            .map(|g| g.files.iter().cloned().collect())
            .collect()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a DuplicateGroup;
    type IntoIter = std::slice::Iter<'a, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Statistics from size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files that could be stat-ed, in bytes
    pub total_size: u64,
    /// Number of distinct non-zero sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in buckets of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of empty files dropped
    pub empty_files: usize,
    /// Number of files that could not be stat-ed
    pub failed_files: usize,
    /// Number of buckets with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            let eliminated = self.total_files - self.potential_duplicates;
            (eliminated as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group paths by file size.
///
/// Convenience wrapper over [`group_entries_by_size`] for plain paths.
/// Stat failures are logged and counted; use [`group_entries_by_size_with_errors`]
/// to get them back.
#[must_use]
pub fn group_by_size(
    paths: impl IntoIterator<Item = PathBuf>,
) -> (Vec<SizeBucket>, GroupingStats) {
    group_entries_by_size(paths.into_iter().map(FileEntry::new))
}

/// Group file entries by size.
///
/// Buckets come back in order of first occurrence of their size, and files
/// within a bucket keep their input order. Zero-byte files, singleton
/// buckets and repeats of an already-seen path are discarded.
#[must_use]
pub fn group_entries_by_size(
    files: impl IntoIterator<Item = FileEntry>,
) -> (Vec<SizeBucket>, GroupingStats) {
    let (buckets, stats, _) = group_entries_by_size_with_errors(files);
    (buckets, stats)
}

/// Group file entries by size, also returning per-file stat failures.
///
/// A file that vanished or became unreadable since discovery is excluded
/// and its error returned; it never aborts the grouping.
#[must_use]
pub fn group_entries_by_size_with_errors(
    files: impl IntoIterator<Item = FileEntry>,
) -> (Vec<SizeBucket>, GroupingStats, Vec<HashError>) {
    let mut buckets: Vec<SizeBucket> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut stats = GroupingStats::default();
    let mut errors = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for file in files {
        if !seen.insert(file.path.clone()) {
            log::trace!("Ignoring repeated path: {}", file.path.display());
            continue;
        }
        stats.total_files += 1;

        let size = match file.size() {
            Ok(size) => size,
            Err(e) => {
                log::warn!("Excluding {}: {}", file.path.display(), e);
                stats.failed_files += 1;
                errors.push(e);
                continue;
            }
        };
        stats.total_size += size;

        if size == 0 {
            stats.empty_files += 1;
            log::trace!("Skipping empty file: {}", file.path.display());
            continue;
        }

        let slot = *index.entry(size).or_insert_with(|| {
            buckets.push(SizeBucket::new(size));
            buckets.len() - 1
        });
        buckets[slot].files.push(file);
    }

    if stats.empty_files > 0 {
        log::debug!("Skipped {} empty file(s)", stats.empty_files);
    }

    stats.unique_sizes = buckets.len();

    let retained: Vec<SizeBucket> = buckets
        .into_iter()
        .filter(|bucket| {
            if bucket.has_duplicates() {
                stats.potential_duplicates += bucket.len();
                stats.duplicate_groups += 1;
                log::debug!(
                    "Size bucket {} bytes: {} potential duplicates",
                    bucket.size,
                    bucket.len()
                );
                true
            } else {
                stats.eliminated_unique += bucket.len();
                false
            }
        })
        .collect();

    log::info!(
        "Size grouping: {} files → {} potential duplicates in {} buckets ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.duplicate_groups,
        stats.elimination_rate()
    );

    (retained, stats, errors)
}
