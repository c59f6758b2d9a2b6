//! Chunked byte-for-byte file comparison.
//!
//! Two files are equal iff every corresponding chunk matches and both reach
//! end-of-file on the same read. Comparison stops at the first differing
//! chunk, so unequal files are usually rejected without reading them fully.

use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::hasher::{read_chunk, DEFAULT_CHUNK_SIZE, MIN_CHUNK_SIZE};
use super::HashError;

/// Byte-for-byte comparator.
///
/// Holds at most two open files at a time.
#[derive(Debug, Clone)]
pub struct Comparator {
    chunk_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparator {
    /// Create a comparator with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
        }
    }

    /// Set the read chunk size (clamped to at least [`MIN_CHUNK_SIZE`]).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(MIN_CHUNK_SIZE);
        self
    }

    /// Set the shutdown flag checked between chunks.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Compare the contents of two files.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] naming whichever file could not be opened or
    /// read, or [`HashError::Interrupted`] on shutdown.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupfind::scanner::Comparator;
    /// use std::path::Path;
    ///
    /// let same = Comparator::new()
    ///     .files_equal(Path::new("a.bin"), Path::new("b.bin"))
    ///     .unwrap();
    /// ```
    pub fn files_equal(&self, a: &Path, b: &Path) -> Result<bool, HashError> {
        let mut file_a = File::open(a).map_err(|e| HashError::from_io(a, e))?;
        let mut file_b = File::open(b).map_err(|e| HashError::from_io(b, e))?;

        let mut buf_a = vec![0u8; self.chunk_size];
        let mut buf_b = vec![0u8; self.chunk_size];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted);
            }

            let n_a = read_chunk(&mut file_a, &mut buf_a, a)?;
            let n_b = read_chunk(&mut file_b, &mut buf_b, b)?;

            if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
                log::trace!("Content differs: {} vs {}", a.display(), b.display());
                return Ok(false);
            }
            if n_a == 0 {
                return Ok(true);
            }
        }
    }
}
