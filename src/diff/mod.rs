// src/diff/mod.rs

//! Line-level text comparison rendered as unified-diff text.
//!
//! The engine is handed already-read content; it does no I/O. Every
//! rendering produces exactly one hunk spanning the whole file, and
//! [`DiffStats`] always equals the number of `+` / `-` lines emitted.

pub mod changeset;
pub mod engine;
pub mod patch;

use serde::Serialize;

pub use changeset::{ChangeSet, ChangeSetStats};
pub use engine::{render_diff, DiffEngine};
pub use patch::HunkHeader;

/// Added / deleted line counts for one rendered diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
}

/// How a file differs between the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// No previous revision.
    Added,
    /// No current content.
    Deleted,
    /// Both sides present.
    Modified,
}

/// One file's rendered diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    pub path: String,
    pub change_type: ChangeKind,
    #[serde(flatten)]
    pub stats: DiffStats,
    pub patch: String,
}

impl FileDiff {
    pub fn additions(&self) -> usize {
        self.stats.additions
    }

    pub fn deletions(&self) -> usize {
        self.stats.deletions
    }

    /// True if at least one line was added or removed.
    pub fn has_changes(&self) -> bool {
        self.stats.additions > 0 || self.stats.deletions > 0
    }
}
