//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping
//! - Content matching within a size bucket (checksum or pairwise)
//! - Pipeline orchestration over a bounded worker pool
//! - Duplicate group and result types

pub mod finder;
pub mod groups;
pub mod matcher;

pub use finder::{
    DuplicateFinder, FinderConfig, FinderError, ScanSummary, DEFAULT_IO_THREADS,
};
pub use groups::{
    group_by_size, group_entries_by_size, group_entries_by_size_with_errors, DuplicateGroup,
    GroupingStats, ScanResult, SizeBucket,
};
pub use matcher::{BucketMatch, ContentMatcher, MatchStrategy};
