// src/watch/path_utils.rs

//! Utility functions for path handling in the notifier.

use std::path::{Path, PathBuf};

/// Canonicalize a repository root so different spellings of one directory
/// share a registration.
///
/// Falls back to the path as given when it cannot be resolved (e.g. it does
/// not exist); the subsequent watch call then reports the error.
pub fn canonical_root(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// True if `path` is `root` or lies inside it.
///
/// Comparison is component-wise, so `/repo2/file` is not under `/repo`.
pub fn is_under_path(path: &Path, root: &Path) -> bool {
    path.strip_prefix(root).is_ok()
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if `path` is not under `root`; `Some("")` when they are
/// equal.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}
