// src/listing.rs

//! Ignore-aware repository tree listing.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, trace};

use crate::fs::FileSystem;
use crate::ignore::IgnoreMatcher;

/// One listed file or directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    /// `/`-separated path relative to the repository root.
    pub path: String,
    pub name: String,
    pub is_dir: bool,
}

/// Walk `root` and return every entry that is not ignored, sorted by path.
///
/// The `metadata_dir` directory at any depth is skipped, and ignored
/// directories are not descended into.
pub fn list_tree(
    fs: &dyn FileSystem,
    root: &Path,
    matcher: &IgnoreMatcher,
    metadata_dir: &str,
) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            let is_dir = fs.is_dir(&path);

            if is_dir && name == metadata_dir {
                continue;
            }
            if matcher.is_ignored(&rel_str, is_dir) {
                trace!(path = %rel_str, "ignored");
                continue;
            }

            if is_dir {
                stack.push(path.clone());
            }
            entries.push(TreeEntry {
                path: rel_str,
                name,
                is_dir,
            });
        }
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(root = ?root, entries = entries.len(), "listed repository tree");
    Ok(entries)
}
