// src/fs/mod.rs

//! Read-only filesystem access used for ignore files, tree listings and
//! working-tree content.
//!
//! Nothing in the crate writes through this trait; the notifier talks to the
//! OS watcher directly and never reads file contents.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// The directory-listing and text-read capability the crate consumes.
pub trait FileSystem: Send + Sync + Debug {
    /// Whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Whole file as raw bytes.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Full paths of the direct children of `path`, in no particular order.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading text from {}", path.display()))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("reading bytes from {}", path.display()))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let dir = fs::read_dir(path)
            .with_context(|| format!("listing directory {}", path.display()))?;

        dir.map(|entry| {
            entry
                .map(|e| e.path())
                .with_context(|| format!("reading an entry of {}", path.display()))
        })
        .collect()
    }
}
