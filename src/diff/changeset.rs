// src/diff/changeset.rs

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::diff::FileDiff;

/// Totals over a multi-file comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSetStats {
    pub additions: usize,
    pub deletions: usize,
    pub files_changed: usize,
}

/// The file diffs of a multi-file comparison, in insertion order.
///
/// `files_changed` is the number of file diffs held, not a precomputed
/// field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<FileDiff>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diff: FileDiff) {
        self.changes.push(diff);
    }

    pub fn changes(&self) -> &[FileDiff] {
        &self.changes
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileDiff> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn stats(&self) -> ChangeSetStats {
        self.changes.iter().fold(
            ChangeSetStats {
                files_changed: self.changes.len(),
                ..ChangeSetStats::default()
            },
            |mut acc, diff| {
                acc.additions += diff.stats.additions;
                acc.deletions += diff.stats.deletions;
                acc
            },
        )
    }
}

impl FromIterator<FileDiff> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = FileDiff>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl Extend<FileDiff> for ChangeSet {
    fn extend<I: IntoIterator<Item = FileDiff>>(&mut self, iter: I) {
        self.changes.extend(iter);
    }
}

impl IntoIterator for ChangeSet {
    type Item = FileDiff;
    type IntoIter = std::vec::IntoIter<FileDiff>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Serialized as `{ "changes": [...], "stats": { ... } }`.
impl Serialize for ChangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ChangeSet", 2)?;
        state.serialize_field("changes", &self.changes)?;
        state.serialize_field("stats", &self.stats())?;
        state.end()
    }
}
