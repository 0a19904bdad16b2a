//! Sidecar advisory lock for the hash database.
//!
//! A writer (or reader) of `<db>` first creates `<db>.lock` exclusively and
//! takes a non-blocking exclusive advisory lock on it. If either step finds
//! another holder, the operation fails with
//! [`StoreError::LockContention`] instead of waiting. The lock file is
//! removed again when the guarded operation returns, on every exit path.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use fd_lock::RwLock;

use super::{StoreError, StoreResult};

/// Suffix appended to the database path to form the lock file path.
pub const LOCK_SUFFIX: &str = ".lock";

/// Path of the sidecar lock file for a database at `store_path`.
#[must_use]
pub fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut name = OsString::from(store_path.as_os_str());
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}

/// Removes the lock file when dropped.
///
/// Only constructed after `create_new` succeeded, so a lock file owned by
/// another process is never removed.
struct Sidecar {
    path: PathBuf,
}

impl Drop for Sidecar {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                log::warn!("Failed to remove lock file {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Run `op` while holding the exclusive lock for the database at `store_path`.
///
/// # Errors
///
/// - [`StoreError::LockContention`] if the lock file already exists or the
///   advisory lock is held elsewhere
/// - [`StoreError::Io`] if the lock file cannot be created or locked
/// - whatever `op` returns
pub fn with_exclusive_lock<T>(
    store_path: &Path,
    op: impl FnOnce() -> StoreResult<T>,
) -> StoreResult<T> {
    let lock_path = lock_path_for(store_path);

    let file = create_lock_file(&lock_path)?;
    let _sidecar = Sidecar {
        path: lock_path.clone(),
    };

    let mut lock = RwLock::new(file);
    let _guard = match lock.try_write() {
        Ok(guard) => guard,
        Err(e) if e.kind() == ErrorKind::WouldBlock => {
            return Err(StoreError::LockContention(lock_path));
        }
        Err(e) => {
            return Err(StoreError::Io {
                path: lock_path,
                source: e,
            });
        }
    };

    // Drop order: guard (unlock), lock (close), sidecar (remove).
    op()
}

fn create_lock_file(lock_path: &Path) -> StoreResult<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)
        .map_err(|e| lock_open_error(lock_path, e))
}

fn lock_open_error(lock_path: &Path, error: io::Error) -> StoreError {
    if error.kind() == ErrorKind::AlreadyExists {
        StoreError::LockContention(lock_path.to_path_buf())
    } else {
        StoreError::Io {
            path: lock_path.to_path_buf(),
            source: error,
        }
    }
}
