//! Content matching within a size bucket.
//!
//! # Overview
//!
//! Every file in a [`SizeBucket`] has the same non-zero size; the
//! [`ContentMatcher`] splits the bucket into classes of byte-identical files
//! using one of two interchangeable strategies:
//!
//! - [`MatchStrategy::Checksum`] hashes each file once with BLAKE3 and groups
//!   equal digests. Cost is one full read per file, linear in bucket size.
//! - [`MatchStrategy::Pairwise`] compares files chunk by chunk without hashing.
//!   Classes are built greedily: the first unclaimed file becomes the anchor,
//!   every later unclaimed file is compared against it, matches join the
//!   anchor's group. Quadratic in bucket size, but a comparison stops at the
//!   first differing chunk.
//!
//! Both strategies yield the same memberships for the same input.
//!
//! # Failures
//!
//! A file that cannot be read is excluded and reported in
//! [`BucketMatch::failures`]; the rest of the bucket is still matched. When a
//! pairwise *anchor* fails, the files already matched against it go back to
//! the unclaimed pool and are re-examined under a new anchor, so no group is
//! ever built on a comparison that did not finish.
//!
//! Pairwise reads a file only while comparing it, so an anchor left with
//! nothing to compare against is opened on its own. Both strategies then
//! report the same unreadable files.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{DuplicateGroup, SizeBucket};
use crate::scanner::{Comparator, Hash, HashError, Hasher, DEFAULT_CHUNK_SIZE};

/// How file contents are compared within a size bucket.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Whole-file BLAKE3 digest equality
    #[default]
    Checksum,
    /// Chunked byte-for-byte comparison
    Pairwise,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::Checksum => write!(f, "checksum"),
            MatchStrategy::Pairwise => write!(f, "pairwise"),
        }
    }
}

/// Outcome of matching one bucket.
#[derive(Debug, Clone, Default)]
pub struct BucketMatch {
    /// Groups of 2+ identical files, in match order
    pub groups: Vec<DuplicateGroup>,
    /// Files that were excluded because they could not be read
    pub failures: Vec<HashError>,
}

/// Splits size buckets into groups of identical files.
#[derive(Debug, Clone)]
pub struct ContentMatcher {
    strategy: MatchStrategy,
    hasher: Hasher,
    comparator: Comparator,
}

impl Default for ContentMatcher {
    fn default() -> Self {
        Self::new(MatchStrategy::default())
    }
}

impl ContentMatcher {
    /// Create a matcher using `strategy` with the default chunk size.
    #[must_use]
    pub fn new(strategy: MatchStrategy) -> Self {
        Self {
            strategy,
            hasher: Hasher::new(),
            comparator: Comparator::new(),
        }
        .with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Set the read chunk size used by both strategies.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.hasher = self.hasher.with_chunk_size(chunk_size);
        self.comparator = self.comparator.with_chunk_size(chunk_size);
        self
    }

    /// Set the shutdown flag checked between chunks.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.hasher = self.hasher.with_shutdown_flag(flag.clone());
        self.comparator = self.comparator.with_shutdown_flag(flag);
        self
    }

    /// The configured strategy.
    #[must_use]
    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Find the groups of identical files in `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Interrupted`] if shutdown was requested. Every
    /// other read failure is recorded in [`BucketMatch::failures`] instead.
    pub fn match_bucket(&self, bucket: &SizeBucket) -> Result<BucketMatch, HashError> {
        if !bucket.has_duplicates() {
            return Ok(BucketMatch::default());
        }

        let matched = match self.strategy {
            MatchStrategy::Checksum => self.match_by_checksum(bucket)?,
            MatchStrategy::Pairwise => self.match_pairwise(bucket)?,
        };

        log::debug!(
            "Bucket {} bytes ({} files, {}): {} groups, {} failures",
            bucket.size,
            bucket.len(),
            self.strategy,
            matched.groups.len(),
            matched.failures.len()
        );

        Ok(matched)
    }

    fn match_by_checksum(&self, bucket: &SizeBucket) -> Result<BucketMatch, HashError> {
        let mut first_seen: Vec<Hash> = Vec::new();
        let mut by_hash: HashMap<Hash, Vec<PathBuf>> = HashMap::new();
        let mut failures = Vec::new();

        for file in &bucket.files {
            match file.content_hash(&self.hasher) {
                Ok(hash) => {
                    log::trace!("Hashed {}", file.path.display());
                    by_hash
                        .entry(hash)
                        .or_insert_with(|| {
                            first_seen.push(hash);
                            Vec::new()
                        })
                        .push(file.path.clone());
                }
                Err(HashError::Interrupted) => return Err(HashError::Interrupted),
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", file.path.display(), e);
                    failures.push(e);
                }
            }
        }

        let groups = first_seen
            .into_iter()
            .filter_map(|hash| {
                let files = by_hash.remove(&hash)?;
                (files.len() > 1).then(|| DuplicateGroup::new(bucket.size, Some(hash), files))
            })
            .collect();

        Ok(BucketMatch { groups, failures })
    }

    fn match_pairwise(&self, bucket: &SizeBucket) -> Result<BucketMatch, HashError> {
        let paths: Vec<&Path> = bucket.files.iter().map(|f| f.path.as_path()).collect();
        let mut partition =
            partition_pairwise(&paths, |a, b| self.comparator.files_equal(a, b))?;

        // A lone anchor was never read; open it so failures match the
        // checksum strategy
        for &idx in &partition.uncompared {
            if let Err(e) = File::open(paths[idx]) {
                let e = HashError::from_io(paths[idx], e);
                log::warn!("Failed to open {}: {}", paths[idx].display(), e);
                partition.failures.push(e);
            }
        }

        let groups = partition
            .classes
            .into_iter()
            .map(|members| {
                let files = members.iter().map(|&i| paths[i].to_path_buf()).collect();
                DuplicateGroup::new(bucket.size, None, files)
            })
            .collect();

        Ok(BucketMatch {
            groups,
            failures: partition.failures,
        })
    }
}

/// Index-level outcome of a pairwise partition.
#[derive(Debug, Default)]
struct Partition {
    /// Classes of 2+ equal files, members in input order
    classes: Vec<Vec<usize>>,
    /// Files excluded by a failed comparison
    failures: Vec<HashError>,
    /// Anchors that had no unclaimed file left to compare against
    uncompared: Vec<usize>,
}

/// Greedily partition `paths` using the pairwise `equal` test.
///
/// The first unclaimed file becomes the anchor and every later unclaimed
/// file is compared against it. A failing candidate is excluded. A failing
/// anchor is excluded and the files already matched to it are released, to
/// be re-examined under the next anchor.
fn partition_pairwise<F>(paths: &[&Path], mut equal: F) -> Result<Partition, HashError>
where
    F: FnMut(&Path, &Path) -> Result<bool, HashError>,
{
    // Claimed means grouped, excluded, or already used as an anchor
    let mut claimed = vec![false; paths.len()];
    let mut partition = Partition::default();

    for anchor in 0..paths.len() {
        if claimed[anchor] {
            continue;
        }
        claimed[anchor] = true;

        let mut members = vec![anchor];
        let mut compared = false;
        let mut anchor_failed = false;

        for candidate in anchor + 1..paths.len() {
            if claimed[candidate] {
                continue;
            }
            compared = true;

            match equal(paths[anchor], paths[candidate]) {
                Ok(true) => {
                    claimed[candidate] = true;
                    members.push(candidate);
                }
                Ok(false) => {}
                Err(HashError::Interrupted) => return Err(HashError::Interrupted),
                Err(e) if e.path() == Some(paths[anchor]) => {
                    log::warn!("Failed to compare {}: {}", paths[anchor].display(), e);
                    partition.failures.push(e);
                    anchor_failed = true;
                    break;
                }
                Err(e) => {
                    log::warn!("Failed to compare {}: {}", paths[candidate].display(), e);
                    partition.failures.push(e);
                    claimed[candidate] = true;
                }
            }
        }

        if anchor_failed {
            // Matched against a file we can no longer trust; re-examine them
            for &member in &members[1..] {
                claimed[member] = false;
            }
            continue;
        }

        if !compared {
            partition.uncompared.push(anchor);
        }
        if members.len() > 1 {
            partition.classes.push(members);
        }
    }

    Ok(partition)
}
