// src/diff/patch.rs

//! Text assembly for a single-file unified diff.

use std::fmt;

use crate::diff::{ChangeKind, DiffStats};

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// One line of content, split on `\n` only.
///
/// A `\r` before the newline stays part of `text`. Only the last line of a
/// file can be unterminated, and it never equals its terminated twin, so
/// adding or removing a final newline shows up as a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Line<'a> {
    pub(crate) text: &'a str,
    pub(crate) terminated: bool,
}

/// Split `content` into [`Line`]s. Empty content has no lines.
pub(crate) fn split_lines(content: &str) -> Vec<Line<'_>> {
    let mut lines: Vec<Line<'_>> = content
        .split_terminator('\n')
        .map(|text| Line {
            text,
            terminated: true,
        })
        .collect();

    if !content.ends_with('\n') {
        if let Some(last) = lines.last_mut() {
            last.terminated = false;
        }
    }
    lines
}

/// The `@@ -a,b +c,d @@` line of a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
}

impl HunkHeader {
    /// Header for an added or deleted file: the absent side starts at 0.
    pub fn whole_file(old_count: usize, new_count: usize) -> Self {
        Self {
            old_start: start_for(old_count),
            old_count,
            new_start: start_for(new_count),
            new_count,
        }
    }

    /// Header for a modified file: both ranges start at line 1, even when a
    /// side is empty.
    pub fn modified(old_count: usize, new_count: usize) -> Self {
        Self {
            old_start: 1,
            old_count,
            new_start: 1,
            new_count,
        }
    }
}

fn start_for(count: usize) -> usize {
    if count == 0 { 0 } else { 1 }
}

impl fmt::Display for HunkHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }
}

/// Accumulates patch text and counts as lines are emitted.
#[derive(Debug, Default)]
pub(crate) struct PatchWriter {
    out: String,
    stats: DiffStats,
}

impl PatchWriter {
    /// Start a patch with the file header lines.
    ///
    /// The `index` line is a fixed placeholder; no object hashes are
    /// computed.
    pub(crate) fn new(path: &str, kind: ChangeKind, hunk: HunkHeader) -> Self {
        let mut writer = Self::default();

        writer.line(&format!("diff --git a/{path} b/{path}"));
        match kind {
            ChangeKind::Added => writer.line("new file mode 100644"),
            ChangeKind::Deleted => writer.line("deleted file mode 100644"),
            ChangeKind::Modified => {}
        }
        writer.line("index 0000000..0000000");

        match kind {
            ChangeKind::Added => writer.line("--- /dev/null"),
            _ => writer.line(&format!("--- a/{path}")),
        }
        match kind {
            ChangeKind::Deleted => writer.line("+++ /dev/null"),
            _ => writer.line(&format!("+++ b/{path}")),
        }

        writer.line(&hunk.to_string());
        writer
    }

    pub(crate) fn context(&mut self, line: Line<'_>) {
        self.body(' ', line);
    }

    pub(crate) fn addition(&mut self, line: Line<'_>) {
        self.stats.additions += 1;
        self.body('+', line);
    }

    pub(crate) fn deletion(&mut self, line: Line<'_>) {
        self.stats.deletions += 1;
        self.body('-', line);
    }

    pub(crate) fn finish(self) -> (String, DiffStats) {
        (self.out, self.stats)
    }

    fn body(&mut self, prefix: char, line: Line<'_>) {
        self.out.push(prefix);
        self.line(line.text);
        if !line.terminated {
            self.line(NO_NEWLINE_MARKER);
        }
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}
