//! Filesystem-safety checks for the scan root and candidate files.
//!
//! A root must be an existing, readable directory. A candidate file is only
//! *eligible* when it is a regular file, reached without following a symbolic
//! link, and can be opened for reading. Symbolic links are never eligible,
//! even when they point at regular files, so a file is never counted twice and
//! linked directories cannot create cycles.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use super::{RootError, ScanError};

/// Confirm that `path` is an existing, readable directory.
///
/// # Errors
///
/// Returns [`ScanError::InvalidRoot`] if the path does not exist, is not a
/// directory, or its listing cannot be opened.
///
/// # Example
///
/// ```no_run
/// use dupfind::scanner::validate_root;
/// use std::path::Path;
///
/// assert!(validate_root(Path::new("/tmp")).is_ok());
/// assert!(validate_root(Path::new("/definitely/not/here")).is_err());
/// ```
pub fn validate_root(path: &Path) -> Result<(), ScanError> {
    let invalid = |reason| ScanError::InvalidRoot {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => invalid(RootError::NotFound),
        _ => invalid(RootError::Unreadable(e)),
    })?;

    if !metadata.is_dir() {
        return Err(invalid(RootError::NotADirectory));
    }

    // Opening the listing is the only portable readability check
    fs::read_dir(path).map_err(|e| invalid(RootError::Unreadable(e)))?;

    Ok(())
}

/// Whether `path` is a regular, readable, non-symlink file.
///
/// Never fails: anything that cannot be confirmed eligible is simply not.
#[must_use]
pub fn is_eligible_file(path: &Path) -> bool {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) => {
            log::trace!("Cannot stat {}: {}", path.display(), e);
            return false;
        }
    };

    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        log::trace!("Skipping symlink: {}", path.display());
        return false;
    }
    if !file_type.is_file() {
        return false;
    }

    match File::open(path) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("Skipping unreadable file {}: {}", path.display(), e);
            false
        }
    }
}
