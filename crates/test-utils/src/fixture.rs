use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// A throwaway repository directory with a `.git` metadata subdirectory.
///
/// The directory is removed when the fixture is dropped.
pub struct RepoFixture {
    dir: TempDir,
}

impl RepoFixture {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("creating temp repository")?;
        fs::create_dir(dir.path().join(".git")).context("creating .git")?;
        Ok(Self { dir })
    }

    /// A directory without any metadata subdirectory.
    pub fn bare() -> Result<Self> {
        let dir = tempfile::tempdir().context("creating temp directory")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }
        fs::write(&path, contents).with_context(|| format!("writing {:?}", path))?;
        Ok(path)
    }

    pub fn mkdir(&self, rel: &str) -> Result<PathBuf> {
        let path = self.join(rel);
        fs::create_dir_all(&path).with_context(|| format!("creating dir {:?}", path))?;
        Ok(path)
    }

    pub fn remove(&self, rel: &str) -> Result<()> {
        let path = self.join(rel);
        fs::remove_file(&path).with_context(|| format!("removing {:?}", path))
    }
}
