//! Snapshot comparison.
//!
//! [`compare`] classifies every path present in a freshly scanned
//! *reference* snapshot or the persisted *baseline* into exactly one
//! [`Classification`]. The result is a [`DiffReport`], in deterministic order:
//! reference paths first (matched, modified or new, in path order), then the
//! baseline-only paths (deleted, in path order).
//!
//! # Example
//!
//! ```
//! use fic::diff::{compare, Classification};
//! use fic::store::{Fingerprint, Snapshot};
//!
//! let baseline: Snapshot = vec![("a", Fingerprint::new("h1")), ("b", Fingerprint::new("h2"))]
//!     .into_iter()
//!     .collect();
//! let reference: Snapshot = vec![("a", Fingerprint::new("h1")), ("c", Fingerprint::new("h3"))]
//!     .into_iter()
//!     .collect();
//!
//! let report = compare(&reference, &baseline);
//! assert_eq!(report.paths(Classification::Matched), vec!["a"]);
//! assert_eq!(report.paths(Classification::New), vec!["c"]);
//! assert_eq!(report.paths(Classification::Deleted), vec!["b"]);
//! ```

pub mod report;

pub use report::{Change, DiffCounts, DiffReport};

use serde::Serialize;
use std::fmt;

use crate::store::Snapshot;

/// Outcome for a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Present in both snapshots with equal fingerprints.
    Matched,
    /// Present in both snapshots with different fingerprints.
    Modified,
    /// Present only in the reference.
    New,
    /// Present only in the baseline.
    Deleted,
}

impl Classification {
    /// All classes, in report order.
    pub const ALL: [Classification; 4] = [
        Classification::Matched,
        Classification::Modified,
        Classification::New,
        Classification::Deleted,
    ];

    /// Whether this outcome is a change to the baseline.
    #[must_use]
    pub fn is_change(self) -> bool {
        self != Self::Matched
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::Modified => write!(f, "modified"),
            Self::New => write!(f, "new"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Classify every path in `reference ∪ baseline`.
#[must_use]
pub fn compare(reference: &Snapshot, baseline: &Snapshot) -> DiffReport {
    let mut changes = Vec::with_capacity(reference.len().max(baseline.len()));

    for entry in reference {
        let class = match baseline.get(&entry.path) {
            Some(base) if base.hash == entry.hash => Classification::Matched,
            Some(_) => Classification::Modified,
            None => Classification::New,
        };
        changes.push(Change::new(&entry.path, class));
    }

    for entry in baseline {
        if !reference.contains(&entry.path) {
            changes.push(Change::new(&entry.path, Classification::Deleted));
        }
    }

    DiffReport::new(changes)
}
