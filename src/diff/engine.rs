// src/diff/engine.rs

use similar::{capture_diff_slices, Algorithm, DiffTag};
use tracing::debug;

use crate::diff::patch::{split_lines, HunkHeader, Line, PatchWriter};
use crate::diff::{ChangeKind, FileDiff};
use crate::errors::{RepowatchError, Result};
use crate::types::DiffAlgorithm;

/// Renders single-file diffs with a configured line alignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    algorithm: DiffAlgorithm,
}

impl DiffEngine {
    pub fn new(algorithm: DiffAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> DiffAlgorithm {
        self.algorithm
    }

    /// Render `path` from `old` to `new`.
    ///
    /// `None` on the old side renders an added file, `None` on the new side
    /// a deleted file. When both are `None` the result is an empty
    /// modification.
    pub fn render(&self, path: &str, old: Option<&str>, new: Option<&str>) -> FileDiff {
        let diff = match (old, new) {
            (None, Some(new)) => render_added(path, new),
            (Some(old), None) => render_deleted(path, old),
            (old, new) => {
                let old = split_lines(old.unwrap_or_default());
                let new = split_lines(new.unwrap_or_default());
                match self.algorithm {
                    DiffAlgorithm::Positional => render_positional(path, &old, &new),
                    DiffAlgorithm::Myers => render_myers(path, &old, &new),
                }
            }
        };

        debug!(
            path = %diff.path,
            change = ?diff.change_type,
            additions = diff.stats.additions,
            deletions = diff.stats.deletions,
            "rendered diff"
        );
        diff
    }

    /// Like [`DiffEngine::render`] for raw bytes.
    ///
    /// Fails with [`RepowatchError::BinaryContent`] if either side is not
    /// UTF-8.
    pub fn render_bytes(
        &self,
        path: &str,
        old: Option<&[u8]>,
        new: Option<&[u8]>,
    ) -> Result<FileDiff> {
        let old = old.map(|bytes| decode(path, bytes)).transpose()?;
        let new = new.map(|bytes| decode(path, bytes)).transpose()?;
        Ok(self.render(path, old, new))
    }
}

/// Positional diff of a file present on both sides.
pub fn render_diff(path: &str, old: &str, new: &str) -> FileDiff {
    DiffEngine::new(DiffAlgorithm::Positional).render(path, Some(old), Some(new))
}

fn decode<'a>(path: &str, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|_| RepowatchError::BinaryContent(path.to_string()))
}

fn render_added(path: &str, new: &str) -> FileDiff {
    let lines = split_lines(new);
    let mut writer = PatchWriter::new(
        path,
        ChangeKind::Added,
        HunkHeader::whole_file(0, lines.len()),
    );
    for line in lines {
        writer.addition(line);
    }
    finish(path, ChangeKind::Added, writer)
}

fn render_deleted(path: &str, old: &str) -> FileDiff {
    let lines = split_lines(old);
    let mut writer = PatchWriter::new(
        path,
        ChangeKind::Deleted,
        HunkHeader::whole_file(lines.len(), 0),
    );
    for line in lines {
        writer.deletion(line);
    }
    finish(path, ChangeKind::Deleted, writer)
}

/// Index-aligned comparison: line `i` of the old side is compared with line
/// `i` of the new side. A changed line is emitted as its deletion followed
/// by its addition.
fn render_positional(path: &str, old: &[Line<'_>], new: &[Line<'_>]) -> FileDiff {
    let mut writer = PatchWriter::new(
        path,
        ChangeKind::Modified,
        HunkHeader::modified(old.len(), new.len()),
    );

    for i in 0..old.len().max(new.len()) {
        match (old.get(i), new.get(i)) {
            (Some(&o), Some(&n)) if o == n => writer.context(o),
            (Some(&o), Some(&n)) => {
                writer.deletion(o);
                writer.addition(n);
            }
            (Some(&o), None) => writer.deletion(o),
            (None, Some(&n)) => writer.addition(n),
            (None, None) => {}
        }
    }

    finish(path, ChangeKind::Modified, writer)
}

fn render_myers(path: &str, old: &[Line<'_>], new: &[Line<'_>]) -> FileDiff {
    let mut writer = PatchWriter::new(
        path,
        ChangeKind::Modified,
        HunkHeader::modified(old.len(), new.len()),
    );

    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => old[old_range].iter().for_each(|&l| writer.context(l)),
            DiffTag::Delete => old[old_range].iter().for_each(|&l| writer.deletion(l)),
            DiffTag::Insert => new[new_range].iter().for_each(|&l| writer.addition(l)),
            DiffTag::Replace => {
                old[old_range].iter().for_each(|&l| writer.deletion(l));
                new[new_range].iter().for_each(|&l| writer.addition(l));
            }
        }
    }

    finish(path, ChangeKind::Modified, writer)
}

fn finish(path: &str, change_type: ChangeKind, writer: PatchWriter) -> FileDiff {
    let (patch, stats) = writer.finish();
    FileDiff {
        path: path.to_string(),
        change_type,
        stats,
        patch,
    }
}
