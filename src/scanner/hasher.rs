//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] computes the content [`Fingerprint`] of a single file by
//! streaming it through SHA-256 in fixed-size chunks, so arbitrarily large
//! files are hashed in constant memory.
//!
//! Zero-length files are never fingerprinted: [`Hasher::hash_file`] returns
//! [`HashError::Empty`] for them, and callers skip the file.
//!
//! # Example
//!
//! ```no_run
//! use fic::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let fingerprint = hasher.hash_file(Path::new("/etc/hosts"))?;
//! println!("{fingerprint}");
//! # Ok::<(), fic::scanner::HashError>(())
//! ```

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::HashError;
use crate::store::Fingerprint;

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the read buffer size (clamped to at least 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Hash the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`HashError::Io`] if the file cannot be opened, inspected or read
    /// - [`HashError::Empty`] if the file is zero-length
    pub fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let io_err = |source| HashError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let metadata = file.metadata().map_err(io_err)?;
        if metadata.len() == 0 {
            return Err(HashError::Empty(path.to_path_buf()));
        }

        let mut digest = Sha256::new();
        let mut buffer = vec![0u8; self.buffer_size];
        loop {
            match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => digest.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_err(e)),
            }
        }

        Ok(Fingerprint::new(format!("{:x}", digest.finalize())))
    }
}

/// Fingerprint of an in-memory buffer, as [`Hasher::hash_file`] would compute
/// it for a file with the same content.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> Fingerprint {
    Fingerprint::new(format!("{:x}", Sha256::digest(data)))
}
