//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! The [`Hasher`] reads a file in fixed-size chunks and feeds each chunk into
//! an incremental BLAKE3 state, so memory use stays at one chunk regardless of
//! file size. The shutdown flag is checked between chunks.
//!
//! # Example
//!
//! ```no_run
//! use dupfind::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let hash = hasher.full_hash(Path::new("Cargo.toml")).unwrap();
//! println!("{}", hash_to_hex(&hash));
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::HashError;

/// A BLAKE3 digest (32 bytes).
pub type Hash = [u8; 32];

/// Default read chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Smallest chunk size accepted; smaller requests are rounded up.
pub const MIN_CHUNK_SIZE: usize = 4 * 1024;

/// Streaming whole-file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default chunk size.
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

    /// The read chunk size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash the entire content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read, or
    /// [`HashError::Interrupted`] if shutdown was requested mid-file.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file, path)
    }

    /// Hash everything readable from `reader`; `path` is used for errors only.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::full_hash`].
    pub fn hash_reader<R: Read>(&self, mut reader: R, path: &Path) -> Result<Hash, HashError> {
        let mut state = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            if self.is_shutdown_requested() {
                log::debug!("Hashing interrupted: {}", path.display());
                return Err(HashError::Interrupted);
            }

            let n = read_chunk(&mut reader, &mut buffer, path)?;
            if n == 0 {
                break;
            }
            state.update(&buffer[..n]);
        }

        Ok(*state.finalize().as_bytes())
    }
}

/// Fill `buffer` from `reader`, stopping early only at end-of-file.
///
/// Returns the number of bytes placed in `buffer`; 0 means end-of-file.
/// Short reads are retried so chunk boundaries line up across files.
pub(crate) fn read_chunk<R: Read>(
    reader: &mut R,
    buffer: &mut [u8],
    path: &Path,
) -> Result<usize, HashError> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(HashError::from_io(path, e)),
        }
    }
    Ok(filled)
}

/// Encode a digest as lowercase hexadecimal (64 characters).
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}
