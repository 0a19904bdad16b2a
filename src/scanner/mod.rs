//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking using walkdir
//! - Content hashing with SHA-256
//! - Building a [`Snapshot`](crate::store::Snapshot) of every regular file
//!   under a set of roots
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: SHA-256 file hashing (streaming)
//! - [`scan`]: The scanning pass tying both together
//!
//! A bad path never aborts a scan: traversal and hashing failures are logged
//! through the supplied [`LogSink`](crate::logging::LogSink) and the
//! offending entry is left out.
//!
//! # Example
//!
//! ```no_run
//! use fic::logging::LogFacade;
//! use fic::scanner::Scanner;
//!
//! let sink = LogFacade;
//! let (snapshot, stats) = Scanner::new(&sink).scan(&["/etc", "/usr/local/bin"]);
//! println!("{} files fingerprinted, {} skipped", snapshot.len(), stats.skipped());
//! ```

pub mod hasher;
pub mod scan;
pub mod walker;

use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{hash_bytes, Hasher, DEFAULT_BUFFER_SIZE};
pub use scan::{ScanStats, Scanner};
pub use walker::{list_immediate, Discovered, Walker};

/// Snapshot key for a discovered path.
///
/// The database stores paths as JSON strings, so a path that is not valid
/// UTF-8 has no key. Replacing the invalid bytes instead would let two
/// distinct files share one entry.
#[must_use]
pub fn path_key(path: &Path) -> Option<String> {
    path.to_str().map(str::to_owned)
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised for `path`.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }

    /// The path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(path) | Self::NotFound(path) | Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file could not be opened or read.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is zero-length. Not a fault: empty files are never recorded.
    #[error("File is empty: {0}")]
    Empty(PathBuf),
}

impl HashError {
    #[must_use]
    pub fn is_empty_file(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}
