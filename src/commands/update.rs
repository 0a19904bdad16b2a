//! One-shot baseline update.
//!
//! Lists the immediate entries of each configured scan path (no recursion),
//! fingerprints every regular file and upserts it into the [`HashStore`].
//! This is the only operation that writes the baseline.

use std::path::Path;

use crate::logging::LogSink;
use crate::scanner::{list_immediate, path_key, Discovered, HashError, Hasher, ScanError};
use crate::signal::ShutdownHandler;
use crate::store::{HashStore, StoreResult, UpsertOutcome};

/// Counters for one update run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Paths recorded for the first time
    pub inserted: usize,
    /// Paths whose recorded hash changed
    pub replaced: usize,
    /// Paths already recorded with the same hash
    pub unchanged: usize,
    /// Empty files and non-regular entries
    pub skipped: usize,
    /// Entries that could not be read or hashed
    pub failed: usize,
    /// Configured scan paths that could not be listed
    pub unreadable_roots: usize,
    /// Stopped early by a termination request
    pub interrupted: bool,
}

impl UpdateSummary {
    /// Whether the persisted baseline was written during this run.
    #[must_use]
    pub fn wrote_baseline(&self) -> bool {
        self.inserted + self.replaced > 0
    }
}

/// Refresh the baseline from the immediate entries of `scan_paths`.
///
/// The store is loaded first so existing entries are kept. Per-entry failures
/// are logged and skipped.
///
/// # Errors
///
/// A store error (load failure, lock contention, write failure) aborts the
/// run and is returned; entries upserted before it remain persisted.
pub fn run_update<P: AsRef<Path>>(
    store: &mut HashStore,
    scan_paths: &[P],
    hasher: &Hasher,
    sink: &dyn LogSink,
) -> StoreResult<UpdateSummary> {
    run_update_until(store, scan_paths, hasher, sink, &ShutdownHandler::new())
}

/// [`run_update`], stopping between entries once `shutdown` is requested.
///
/// A persist in progress always completes, so the lock file is released
/// before the run returns.
///
/// # Errors
///
/// See [`run_update`].
pub fn run_update_until<P: AsRef<Path>>(
    store: &mut HashStore,
    scan_paths: &[P],
    hasher: &Hasher,
    sink: &dyn LogSink,
    shutdown: &ShutdownHandler,
) -> StoreResult<UpdateSummary> {
    store.load()?;
    let mut summary = UpdateSummary::default();

    'paths: for scan_path in scan_paths {
        let scan_path = scan_path.as_ref();
        let items = match list_immediate(scan_path) {
            Ok(items) => items,
            Err(ScanError::NotFound(_)) => {
                summary.unreadable_roots += 1;
                sink.warn(&format!("Scan path {} does not exist", scan_path.display()));
                continue;
            }
            Err(e) => {
                summary.unreadable_roots += 1;
                sink.error(&format!(
                    "Error reading scan path {}: {}",
                    scan_path.display(),
                    e
                ));
                continue;
            }
        };

        for item in items {
            if shutdown.is_shutdown_requested() {
                summary.interrupted = true;
                sink.warn("Termination requested, stopping update");
                break 'paths;
            }
            match item {
                Ok(Discovered::File(path)) => {
                    update_one(store, &path, hasher, sink, &mut summary)?;
                }
                Ok(Discovered::Skipped(path)) => {
                    summary.skipped += 1;
                    sink.debug(&format!("Skipping non-regular entry: {}", path.display()));
                }
                Err(e) => {
                    summary.failed += 1;
                    sink.warn(&format!("Error accessing path {}: {}", e.path().display(), e));
                }
            }
        }
    }

    sink.info(&format!(
        "Update complete: {} new, {} changed, {} unchanged, {} skipped, {} failed; {} files recorded",
        summary.inserted,
        summary.replaced,
        summary.unchanged,
        summary.skipped,
        summary.failed,
        store.total_files()
    ));
    Ok(summary)
}

fn update_one(
    store: &mut HashStore,
    path: &Path,
    hasher: &Hasher,
    sink: &dyn LogSink,
    summary: &mut UpdateSummary,
) -> StoreResult<()> {
    let Some(key) = path_key(path) else {
        summary.failed += 1;
        sink.warn(&format!(
            "Skipping file with non-UTF-8 path: {}",
            path.display()
        ));
        return Ok(());
    };

    let hash = match hasher.hash_file(path) {
        Ok(hash) => hash,
        Err(HashError::Empty(_)) => {
            summary.skipped += 1;
            sink.info(&format!("Skipping empty file: {}", path.display()));
            return Ok(());
        }
        Err(e) => {
            summary.failed += 1;
            sink.warn(&format!(
                "Error calculating hash for {}: {}",
                path.display(),
                e
            ));
            return Ok(());
        }
    };

    match store.upsert(&key, hash) {
        Ok(UpsertOutcome::Inserted) => {
            summary.inserted += 1;
            sink.debug(&format!("Recorded new file: {key}"));
        }
        Ok(UpsertOutcome::Replaced) => {
            summary.replaced += 1;
            sink.info(&format!("Updated hash for: {key}"));
        }
        Ok(UpsertOutcome::Unchanged) => summary.unchanged += 1,
        Err(e) => {
            sink.error(&format!("Error updating hash for {key}: {e}"));
            return Err(e);
        }
    }
    Ok(())
}
