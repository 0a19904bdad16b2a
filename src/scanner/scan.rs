//! The scanning pass: walk every root, hash every regular file.

use std::path::Path;

use super::walker::{Discovered, Walker};
use super::{path_key, HashError, Hasher};
use crate::logging::LogSink;
use crate::store::Snapshot;

/// Counters collected during a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files fingerprinted and recorded
    pub files_hashed: usize,
    /// Zero-length files left out
    pub empty_files: usize,
    /// Files that could not be opened or read
    pub hash_failures: usize,
    /// Files whose path cannot be stored as a key (not valid UTF-8)
    pub unencodable_paths: usize,
    /// Entries that are not regular files
    pub non_regular: usize,
    /// Paths the traversal could not access
    pub traversal_errors: usize,
}

impl ScanStats {
    /// Files found but not recorded, for whatever reason.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.empty_files + self.hash_failures + self.unencodable_paths
    }

    /// Whether anything went wrong, as opposed to being merely skipped.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.hash_failures > 0 || self.unencodable_paths > 0 || self.traversal_errors > 0
    }
}

/// Builds a [`Snapshot`] of the files under a list of roots.
///
/// Each call to [`Scanner::scan`] starts from scratch; nothing is carried
/// over between scans.
pub struct Scanner<'a> {
    hasher: Hasher,
    sink: &'a dyn LogSink,
}

impl<'a> Scanner<'a> {
    /// Create a scanner reporting to `sink`.
    #[must_use]
    pub fn new(sink: &'a dyn LogSink) -> Self {
        Self {
            hasher: Hasher::new(),
            sink,
        }
    }

    /// Use a specific hasher configuration.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Scan `roots` in order and fingerprint every regular file beneath them.
    ///
    /// Failures never abort the scan. A missing root or unreadable
    /// sub-directory is logged and skipped; a file that cannot be hashed
    /// (including an empty one) is logged and left out of the snapshot.
    pub fn scan<P: AsRef<Path>>(&self, roots: &[P]) -> (Snapshot, ScanStats) {
        let mut snapshot = Snapshot::new();
        let mut stats = ScanStats::default();

        for root in roots {
            let root = root.as_ref();
            for item in Walker::new(root).walk() {
                match item {
                    Ok(Discovered::File(path)) => {
                        self.hash_into(&path, &mut snapshot, &mut stats);
                    }
                    Ok(Discovered::Skipped(path)) => {
                        stats.non_regular += 1;
                        self.sink.debug(&format!(
                            "Skipping non-regular file: {}",
                            path.display()
                        ));
                    }
                    Err(e) => {
                        stats.traversal_errors += 1;
                        self.sink.warn(&format!(
                            "Error accessing path {}: {}",
                            e.path().display(),
                            e
                        ));
                    }
                }
            }
        }

        self.sink.debug(&format!(
            "Scan finished: {} files hashed, {} skipped, {} traversal errors",
            stats.files_hashed,
            stats.skipped(),
            stats.traversal_errors
        ));
        (snapshot, stats)
    }

    fn hash_into(&self, path: &Path, snapshot: &mut Snapshot, stats: &mut ScanStats) {
        let Some(key) = path_key(path) else {
            stats.unencodable_paths += 1;
            self.sink.warn(&format!(
                "Skipping file with non-UTF-8 path: {}",
                path.display()
            ));
            return;
        };

        match self.hasher.hash_file(path) {
            Ok(hash) => {
                snapshot.insert(key, hash);
                stats.files_hashed += 1;
            }
            Err(HashError::Empty(_)) => {
                stats.empty_files += 1;
                self.sink
                    .info(&format!("Skipping empty file: {}", path.display()));
            }
            Err(e) => {
                stats.hash_failures += 1;
                self.sink
                    .warn(&format!("Failed to hash file {}: {}", path.display(), e));
            }
        }
    }
}
