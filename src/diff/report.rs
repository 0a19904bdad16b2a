//! Diff results and how they are reported.

use serde::Serialize;

use super::Classification;
use crate::logging::LogSink;

/// Classification of one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub path: String,
    pub class: Classification,
}

impl Change {
    #[must_use]
    pub fn new(path: &str, class: Classification) -> Self {
        Self {
            path: path.to_string(),
            class,
        }
    }

    /// The log line for this classification.
    #[must_use]
    pub fn message(&self) -> String {
        match self.class {
            Classification::Matched => format!("Hash matched for: {}", self.path),
            Classification::Modified => format!("Hash mismatch for: {}", self.path),
            Classification::New => format!("New file detected: {}", self.path),
            Classification::Deleted => format!("File deleted: {}", self.path),
        }
    }
}

/// Number of paths per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffCounts {
    pub matched: usize,
    pub modified: usize,
    pub new: usize,
    pub deleted: usize,
}

impl DiffCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.matched + self.modified + self.new + self.deleted
    }

    /// Paths whose state differs from the baseline.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.modified + self.new + self.deleted
    }
}

/// Ordered classification of every path in the union of two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    changes: Vec<Change>,
}

impl DiffReport {
    #[must_use]
    pub fn new(changes: Vec<Change>) -> Self {
        Self { changes }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Paths with the given classification, in report order.
    #[must_use]
    pub fn paths(&self, class: Classification) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|c| c.class == class)
            .map(|c| c.path.as_str())
            .collect()
    }

    #[must_use]
    pub fn counts(&self) -> DiffCounts {
        let mut counts = DiffCounts::default();
        for change in &self.changes {
            match change.class {
                Classification::Matched => counts.matched += 1,
                Classification::Modified => counts.modified += 1,
                Classification::New => counts.new += 1,
                Classification::Deleted => counts.deleted += 1,
            }
        }
        counts
    }

    /// Whether any path is modified, new or deleted.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.changes.iter().any(|c| c.class.is_change())
    }

    /// Emit one line per classification, then a summary line.
    ///
    /// Matches and new files are informational; modifications and deletions
    /// are warnings.
    pub fn log_to(&self, sink: &dyn LogSink) {
        for change in &self.changes {
            let message = change.message();
            match change.class {
                Classification::Matched | Classification::New => sink.info(&message),
                Classification::Modified | Classification::Deleted => sink.warn(&message),
            }
        }

        let counts = self.counts();
        sink.info(&format!(
            "Comparison complete: {} matched, {} modified, {} new, {} deleted",
            counts.matched, counts.modified, counts.new, counts.deleted
        ));
    }
}

impl<'a> IntoIterator for &'a DiffReport {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
