//! Scanner module for directory traversal and file content access.
//!
//! This module provides functionality for:
//! - Root and entry validation (regular, readable, non-symlink files only)
//! - Directory walking using jwalk
//! - Streaming BLAKE3 content hashing
//! - Chunked byte-for-byte file comparison
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`validate`]: Root directory and eligible-file checks
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//! - [`compare`]: Byte-for-byte file comparison
//!
//! # Example
//!
//! ```no_run
//! use dupfind::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for path in walker.walk().unwrap() {
//!     println!("{}", path.display());
//! }
//! ```

pub mod compare;
pub mod hasher;
pub mod validate;
pub mod walker;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use compare::Comparator;
pub use hasher::{hash_to_hex, Hash, Hasher, DEFAULT_CHUNK_SIZE, MIN_CHUNK_SIZE};
pub use validate::{is_eligible_file, validate_root};
pub use walker::Walker;

/// A file discovered during a scan.
///
/// Holds the path and lazily derived facts about the file. The size and the
/// content digest are computed on first request and cached for the rest of
/// the run; nothing else about the entry ever changes.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path to the file as produced by the walker
    pub path: PathBuf,
    size: OnceLock<u64>,
    hash: OnceLock<Hash>,
}

impl FileEntry {
    /// Create a new entry whose size and digest are not yet known.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            size: OnceLock::new(),
            hash: OnceLock::new(),
        }
    }

    /// Create an entry with a size that is already known.
    #[must_use]
    pub fn with_size(path: PathBuf, size: u64) -> Self {
        let entry = Self::new(path);
        let _ = entry.size.set(size);
        entry
    }

    /// Size of the file in bytes, stat-ing the file on first call.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file vanished, became unreadable, or is
    /// no longer a regular file.
    pub fn size(&self) -> Result<u64, HashError> {
        if let Some(size) = self.size.get() {
            return Ok(*size);
        }

        let metadata =
            fs::symlink_metadata(&self.path).map_err(|e| HashError::from_io(&self.path, e))?;
        if !metadata.is_file() {
            return Err(HashError::NotARegularFile(self.path.clone()));
        }

        Ok(*self.size.get_or_init(|| metadata.len()))
    }

    /// The size, if it has already been computed.
    #[must_use]
    pub fn cached_size(&self) -> Option<u64> {
        self.size.get().copied()
    }

    /// Whole-file content digest, computed with `hasher` on first call.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be read to the end or the
    /// hasher observed a shutdown request.
    pub fn content_hash(&self, hasher: &Hasher) -> Result<Hash, HashError> {
        if let Some(hash) = self.hash.get() {
            return Ok(*hash);
        }
        let hash = hasher.full_hash(&self.path)?;
        Ok(*self.hash.get_or_init(|| hash))
    }

    /// The digest, if it has already been computed.
    #[must_use]
    pub fn cached_hash(&self) -> Option<Hash> {
        self.hash.get().copied()
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Maximum directory depth to descend into (`None` for unlimited).
    /// Depth 1 means only the root's direct children.
    pub max_depth: Option<usize>,
}

impl WalkerConfig {
    /// Create a new configuration from CLI arguments.
    #[must_use]
    pub fn new(skip_hidden: bool, max_depth: Option<usize>) -> Self {
        Self {
            skip_hidden,
            max_depth,
        }
    }
}

/// Why a root directory was rejected.
#[derive(thiserror::Error, Debug)]
pub enum RootError {
    /// Nothing exists at the path.
    #[error("path not found")]
    NotFound,

    /// The path exists but is not a directory.
    #[error("not a directory")]
    NotADirectory,

    /// The directory exists but cannot be read.
    #[error("unreadable: {0}")]
    Unreadable(#[source] io::Error),
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The scan root is missing, not a directory, or unreadable.
    #[error("Invalid root {}: {reason}", path.display())]
    InvalidRoot {
        /// The rejected root path
        path: PathBuf,
        /// What was wrong with it
        reason: RootError,
    },

    /// Permission was denied when accessing a directory below the root.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while accessing an entry below the root.
    #[error("I/O error for {}: {source}", path.display())]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The walk stopped because shutdown was requested.
    #[error("Scan interrupted")]
    Interrupted,
}

/// Errors that can occur while reading a file's content.
///
/// Everything except [`HashError::Interrupted`] is a per-file failure: the
/// affected file is dropped from grouping and the scan carries on.
#[derive(thiserror::Error, Debug, Clone)]
pub enum HashError {
    /// The file was not found (deleted after discovery).
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// The path no longer refers to a regular file.
    #[error("Not a regular file: {}", .0.display())]
    NotARegularFile(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {}: {source}", path.display())]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<io::Error>,
    },

    /// Reading stopped at a chunk boundary because shutdown was requested.
    #[error("Read interrupted by shutdown request")]
    Interrupted,
}

impl HashError {
    /// Classify an I/O error raised while accessing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: Arc::new(error),
            },
        }
    }

    /// The file this error is about, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::NotARegularFile(p) => Some(p),
            Self::Io { path, .. } => Some(path),
            Self::Interrupted => None,
        }
    }

    /// Whether this error is a shutdown request rather than a file failure.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_entry_with_size_is_cached() {
        let entry = FileEntry::with_size(PathBuf::from("/does/not/exist"), 1024);

        assert_eq!(entry.cached_size(), Some(1024));
        // Cached value wins, no stat happens
        assert_eq!(entry.size().unwrap(), 1024);
        assert!(entry.cached_hash().is_none());
    }

    #[test]
    fn test_file_entry_size_stats_lazily() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("five.txt");
        fs::write(&path, b"hello").unwrap();

        let entry = FileEntry::new(path.clone());
        assert!(entry.cached_size().is_none());
        assert_eq!(entry.size().unwrap(), 5);

        // Later changes on disk are not observed
        fs::write(&path, b"hello world").unwrap();
        assert_eq!(entry.size().unwrap(), 5);
    }

    #[test]
    fn test_file_entry_size_missing_file() {
        let entry = FileEntry::new(PathBuf::from("/nonexistent/dupfind/file.bin"));
        let err = entry.size().unwrap_err();
        assert!(matches!(err, HashError::NotFound(_)));
    }

    #[test]
    fn test_file_entry_size_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let entry = FileEntry::new(dir.path().to_path_buf());
        assert!(matches!(
            entry.size().unwrap_err(),
            HashError::NotARegularFile(_)
        ));
    }

    #[test]
    fn test_file_entry_content_hash_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"content").unwrap();

        let entry = FileEntry::new(path);
        let hasher = Hasher::new();
        let first = entry.content_hash(&hasher).unwrap();
        assert_eq!(entry.cached_hash(), Some(first));
        assert_eq!(entry.content_hash(&hasher).unwrap(), first);
    }

    #[test]
    fn test_walker_config_default() {
        let config = WalkerConfig::default();
        assert!(!config.skip_hidden);
        assert!(config.max_depth.is_none());
    }

    #[test]
    fn test_walker_config_new() {
        let config = WalkerConfig::new(true, Some(3));
        assert!(config.skip_hidden);
        assert_eq!(config.max_depth, Some(3));
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::InvalidRoot {
            path: PathBuf::from("/missing"),
            reason: RootError::NotFound,
        };
        assert_eq!(err.to_string(), "Invalid root /missing: path not found");

        let err = ScanError::InvalidRoot {
            path: PathBuf::from("/file.txt"),
            reason: RootError::NotADirectory,
        };
        assert_eq!(err.to_string(), "Invalid root /file.txt: not a directory");

        let err = ScanError::PermissionDenied(PathBuf::from("/secret"));
        assert_eq!(err.to_string(), "Permission denied: /secret");
    }

    #[test]
    fn test_hash_error_from_io() {
        let path = Path::new("/test");
        let err = HashError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, HashError::NotFound(_)));
        assert_eq!(err.to_string(), "File not found: /test");

        let err = HashError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.to_string(), "Permission denied: /test");
        assert_eq!(err.path(), Some(path));

        let err = HashError::from_io(path, io::Error::other("disk on fire"));
        assert!(matches!(err, HashError::Io { .. }));
        assert!(!err.is_interrupted());
    }

    #[test]
    fn test_hash_error_interrupted_has_no_path() {
        assert!(HashError::Interrupted.path().is_none());
        assert!(HashError::Interrupted.is_interrupted());
    }
}
