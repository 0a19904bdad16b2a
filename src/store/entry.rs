//! Fingerprint, entry and snapshot definitions.
//!
//! These types are shared by the scanner (which produces a fresh
//! [`Snapshot`]), the hash database (which persists one) and the differ
//! (which compares two).

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Lowercase hex SHA-256 digest of a file's full content.
///
/// Fingerprints are opaque: they are only ever compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already-encoded digest.
    #[must_use]
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Fingerprint {
    fn from(hex: String) -> Self {
        Self(hex)
    }
}

impl From<&str> for Fingerprint {
    fn from(hex: &str) -> Self {
        Self(hex.to_string())
    }
}

/// One recorded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Path as discovered from the configured scan root
    pub path: String,
    /// Content fingerprint
    pub hash: Fingerprint,
}

impl Entry {
    #[must_use]
    pub fn new(path: impl Into<String>, hash: Fingerprint) -> Self {
        Self {
            path: path.into(),
            hash,
        }
    }
}

/// Mapping from path to [`Entry`] captured at one point in time.
///
/// Keys are unique; the key of every entry equals its `path` field. Iteration
/// is in path order so that reports and serialized files are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, Entry>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `path`, returning the previous one.
    pub fn insert(&mut self, path: impl Into<String>, hash: Fingerprint) -> Option<Entry> {
        let path = path.into();
        self.entries.insert(path.clone(), Entry::new(path, hash))
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in path order.
    pub fn iter(&self) -> btree_map::Values<'_, String, Entry> {
        self.entries.values()
    }

    /// Iterate over paths in order.
    pub fn paths(&self) -> btree_map::Keys<'_, String, Entry> {
        self.entries.keys()
    }

    /// Re-key every entry by its map key.
    ///
    /// A hand-edited database may carry an entry whose `path` field disagrees
    /// with its key; the key wins.
    pub(crate) fn normalize(&mut self) {
        for (key, entry) in &mut self.entries {
            if entry.path != *key {
                entry.path.clone_from(key);
            }
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Entry;
    type IntoIter = btree_map::Values<'a, String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<P: Into<String>> FromIterator<(P, Fingerprint)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (P, Fingerprint)>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for (path, hash) in iter {
            snapshot.insert(path, hash);
        }
        snapshot
    }
}
