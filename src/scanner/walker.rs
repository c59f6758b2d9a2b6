//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and collecting every eligible file (see [`super::validate`]) in traversal
//! order. Directory entries are read with [`jwalk`], sorted by file name so
//! that repeated runs over an unchanged tree produce the same order.
//!
//! # Features
//!
//! - Root validation before any traversal
//! - Symbolic links are never followed or reported, files and directories alike
//! - Optional hidden-entry skipping and depth limit
//! - Unreadable subdirectories are reported, not fatal
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use dupfind::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files = walker.walk().unwrap();
//! println!("Found {} files", files.len());
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jwalk::WalkDir;

use super::validate::{is_eligible_file, validate_root};
use super::{ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

/// Directory walker for file discovery.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback, notified per discovered file
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walk stops at the next entry and
    /// fails with [`ScanError::Interrupted`].
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

    /// Walk the directory tree and return every eligible file.
    ///
    /// Entry-level errors (unreadable subdirectories) are logged and skipped.
    ///
    /// # Errors
    ///
    /// - [`ScanError::InvalidRoot`] if the root fails validation; nothing is
    ///   traversed in that case
    /// - [`ScanError::Interrupted`] if shutdown was requested mid-walk
    pub fn walk(&self) -> Result<Vec<PathBuf>, ScanError> {
        self.walk_with_errors().map(|(files, _)| files)
    }

    /// Like [`Walker::walk`], but also returns the skipped entry errors.
    ///
    /// # Errors
    ///
    /// Same as [`Walker::walk`].
    pub fn walk_with_errors(&self) -> Result<(Vec<PathBuf>, Vec<ScanError>), ScanError> {
        validate_root(&self.root)?;

        let mut walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(self.config.skip_hidden)
            .sort(true);
        if let Some(depth) = self.config.max_depth {
            walk_dir = walk_dir.max_depth(depth);
        }

        let mut files = Vec::new();
        let mut errors = Vec::new();

        for entry_result in walk_dir {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return Err(ScanError::Interrupted);
            }

            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    errors.push(self.handle_jwalk_error(e));
                    continue;
                }
            };

            // The root itself
            if entry.depth() == 0 {
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            let path = entry.path();
            if file_type.is_symlink() {
                log::trace!("Skipping symlink: {}", path.display());
                continue;
            }

            if !is_eligible_file(&path) {
                continue;
            }

            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(files.len() + 1, path.to_string_lossy().as_ref());
            }
            files.push(path);
        }

        log::debug!(
            "Walked {}: {} eligible files, {} skipped entries",
            self.root.display(),
            files.len(),
            errors.len()
        );

        Ok((files, errors))
    }

    /// Convert a jwalk error into a non-fatal [`ScanError`].
    fn handle_jwalk_error(&self, error: jwalk::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.io_error().map(io::Error::kind) {
            Some(io::ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                ScanError::Io {
                    path,
                    source: io::Error::other(error.to_string()),
                }
            }
        }
    }
}
