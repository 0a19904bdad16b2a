//! JSON-backed hash database.
//!
//! The file layout is
//!
//! ```json
//! {
//!   "files": { "<path>": { "path": "<path>", "hash": "<sha256 hex>" } },
//!   "total_files": 1,
//!   "db_path": "/var/lib/fic/db.json"
//! }
//! ```
//!
//! `db_path` is informational; the location a store was opened from is
//! authoritative. `total_files` is recomputed on load and before every write.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::entry::{Entry, Fingerprint, Snapshot};
use super::lock::with_exclusive_lock;
use super::{StoreError, StoreResult};

/// Suffix of the scratch file a write goes to before being renamed in place.
const TEMP_SUFFIX: &str = ".tmp";

/// On-disk representation, used for the database and scan snapshots alike.
#[derive(Serialize)]
struct DocumentRef<'a> {
    files: &'a Snapshot,
    total_files: usize,
    db_path: String,
}

// `total_files` and `db_path` are not read back: the count is recomputed and
// the opened location is authoritative.
#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    files: Option<Snapshot>,
}

/// What an [`HashStore::upsert`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Entry already present with the same hash; nothing written.
    Unchanged,
    /// New path recorded.
    Inserted,
    /// Existing path recorded with a different hash.
    Replaced,
}

/// Durable mapping from file path to fingerprint.
///
/// # Example
///
/// ```no_run
/// use fic::store::{Fingerprint, HashStore};
/// use std::path::Path;
///
/// let db = Path::new("/var/lib/fic/db.json");
/// HashStore::create_if_absent(db)?;
///
/// let mut store = HashStore::open(db)?;
/// store.upsert("/etc/hosts", Fingerprint::new("ab12..."))?;
/// println!("{} files recorded", store.total_files());
/// # Ok::<(), fic::store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HashStore {
    entries: Snapshot,
    total_files: usize,
    path: PathBuf,
}

impl HashStore {
    /// Create an empty, not yet loaded store bound to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            entries: Snapshot::new(),
            total_files: 0,
            path: path.into(),
        }
    }

    /// Create a store bound to `path` and load it.
    ///
    /// # Errors
    ///
    /// See [`HashStore::load`].
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Create an empty database at `path` unless one already exists.
    ///
    /// Parent directories are created as needed. Returns `true` if a new
    /// database was written, `false` if one was already there.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if a directory or the file cannot be
    /// created, and [`StoreError::LockContention`] if another process is
    /// writing the same location.
    pub fn create_if_absent(path: &Path) -> StoreResult<bool> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = non_empty_parent(path) {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        Self::new(path).persist()?;
        Ok(true)
    }

    /// Replace the in-memory state with the persisted one.
    ///
    /// A missing database file loads as an empty store. `total_files` is
    /// recomputed from the loaded entries regardless of the stored value.
    ///
    /// # Errors
    ///
    /// - [`StoreError::LockContention`] if another process holds the lock
    /// - [`StoreError::Io`] if the file cannot be read
    /// - [`StoreError::Parse`] if the file is not a valid database
    pub fn load(&mut self) -> StoreResult<()> {
        // Without a parent directory there is neither a database nor
        // anywhere to put the lock file.
        if non_empty_parent(&self.path).is_some_and(|p| !p.is_dir()) {
            self.reset();
            return Ok(());
        }

        let path = self.path.clone();
        let loaded = with_exclusive_lock(&path, || read_document(&path))?;

        match loaded {
            Some(mut files) => {
                files.normalize();
                self.entries = files;
                self.total_files = self.entries.len();
            }
            None => self.reset(),
        }

        log::debug!(
            "Loaded {} entries from {}",
            self.total_files,
            self.path.display()
        );
        Ok(())
    }

    /// Record `hash` for `path` and persist if anything changed.
    ///
    /// # Errors
    ///
    /// Fails with whatever [`HashStore::persist`] fails with. The in-memory
    /// entry is kept even when persisting fails.
    pub fn upsert(&mut self, path: &str, hash: Fingerprint) -> StoreResult<UpsertOutcome> {
        let outcome = match self.entries.get(path) {
            Some(entry) if entry.hash == hash => return Ok(UpsertOutcome::Unchanged),
            Some(_) => UpsertOutcome::Replaced,
            None => UpsertOutcome::Inserted,
        };

        self.entries.insert(path, hash);
        self.total_files = self.entries.len();
        self.persist()?;
        Ok(outcome)
    }

    /// Write the whole store to its location under the exclusive lock.
    ///
    /// The write goes to a sibling scratch file which is then renamed over
    /// the database, so readers never observe a partial document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockContention`] if the lock is held elsewhere
    /// and [`StoreError::Io`] if locking or writing fails. There is no retry.
    pub fn persist(&self) -> StoreResult<()> {
        debug_assert_eq!(self.total_files, self.entries.len());

        let data = serialize(&self.entries, &self.path)?;
        with_exclusive_lock(&self.path, || write_atomic(&self.path, &data))
    }

    /// The loaded entries.
    #[must_use]
    pub fn entries(&self) -> &Snapshot {
        &self.entries
    }

    /// Look up one entry.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    /// Number of entries. Always equals `entries().len()`.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reset(&mut self) {
        self.entries = Snapshot::new();
        self.total_files = 0;
    }
}

/// Write a scan snapshot to `path` using the database file layout.
///
/// Used for the per-cycle scratch copy of the latest scan. No lock is taken:
/// nothing reads the file back.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the directory or file cannot be written.
pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> StoreResult<()> {
    if let Some(parent) = non_empty_parent(path) {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let data = serialize(snapshot, path)?;
    write_atomic(path, &data)
}

/// Read the database at `path`; `None` if it does not exist.
fn read_document(path: &Path) -> StoreResult<Option<Snapshot>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let document: Document = serde_json::from_slice(&data).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(document.files.unwrap_or_default()))
}

fn serialize(files: &Snapshot, path: &Path) -> StoreResult<Vec<u8>> {
    let document = DocumentRef {
        files,
        total_files: files.len(),
        db_path: path.to_string_lossy().into_owned(),
    };
    serde_json::to_vec_pretty(&document).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn write_atomic(path: &Path, data: &[u8]) -> StoreResult<()> {
    let mut temp_name = OsString::from(path.as_os_str());
    temp_name.push(TEMP_SUFFIX);
    let temp_path = PathBuf::from(temp_name);

    let result = fs::write(&temp_path, data).and_then(|()| fs::rename(&temp_path, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
