//! Persistent hash database for fic.
//!
//! This module owns the baseline: the on-disk mapping from file path to
//! content fingerprint that scans are compared against.
//!
//! # Architecture
//!
//! * [`entry`]: [`Fingerprint`], [`Entry`] and [`Snapshot`], shared with the
//!   scanner and the differ.
//! * [`database`]: [`HashStore`], the JSON-backed database with
//!   create/load/upsert/persist operations.
//! * [`lock`]: the sidecar advisory lock every load and persist runs under.
//!
//! # Concurrency
//!
//! Within one process a [`HashStore`] is mutated through `&mut self`, so a
//! single owner serializes its own operations. Across processes (a monitor
//! daemon and a manual `fic update`, say) the sidecar lock serializes access
//! to the file. Lock acquisition never waits: a held lock surfaces as
//! [`StoreError::LockContention`] and the caller retries later.

pub mod database;
pub mod entry;
pub mod lock;

use std::path::PathBuf;

pub use database::{write_snapshot, HashStore, UpsertOutcome};
pub use entry::{Entry, Fingerprint, Snapshot};
pub use lock::{lock_path_for, with_exclusive_lock, LOCK_SUFFIX};

/// Errors that can occur while reading or writing the hash database.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Opening, reading, writing or locking a file failed.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The persisted database is not valid JSON of the expected shape.
    #[error("Malformed hash database {path}: {source}")]
    Parse {
        /// Database file that failed to parse
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Another process holds the database lock.
    #[error("Hash database is locked by another process: {0}")]
    LockContention(PathBuf),
}

impl StoreError {
    /// Whether retrying later may succeed without operator intervention.
    #[must_use]
    pub fn is_contention(&self) -> bool {
        matches!(self, Self::LockContention(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
