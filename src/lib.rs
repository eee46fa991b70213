// src/lib.rs

//! Repository observation and comparison.
//!
//! - [`watch`]: long-poll change notification per repository root.
//! - [`ignore`]: ignore-file rule compilation and matching.
//! - [`diff`]: unified-diff rendering with add/delete statistics.
//!
//! [`RepoObserver`] wires these together with a loaded [`ConfigFile`] and a
//! [`FileSystem`].

pub mod config;
pub mod diff;
pub mod errors;
pub mod fs;
pub mod ignore;
pub mod listing;
pub mod logging;
pub mod types;
pub mod watch;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::{load_and_validate, ConfigFile};
use crate::diff::{DiffEngine, FileDiff};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::ignore::IgnoreMatcher;
use crate::listing::TreeEntry;
use crate::watch::ChangeNotifier;

/// High-level entry point for the surrounding service.
///
/// Owns one [`ChangeNotifier`] shared by every repository, plus the diff
/// engine and ignore settings from the config.
pub struct RepoObserver {
    config: ConfigFile,
    fs: Arc<dyn FileSystem>,
    notifier: ChangeNotifier,
    diff: DiffEngine,
}

impl fmt::Debug for RepoObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoObserver")
            .field("notifier", &self.notifier)
            .field("diff", &self.diff)
            .finish_non_exhaustive()
    }
}

impl RepoObserver {
    /// Build an observer over the real filesystem.
    ///
    /// Call from within a Tokio runtime so the notifier can spawn its
    /// dispatch task.
    pub fn new(config: ConfigFile) -> Result<Self> {
        Self::with_file_system(config, Arc::new(RealFileSystem))
    }

    pub fn with_file_system(config: ConfigFile, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let notifier = ChangeNotifier::new(config.notifier_options())?;
        let diff = DiffEngine::new(config.diff.algorithm);
        Ok(Self {
            config,
            fs,
            notifier,
            diff,
        })
    }

    /// Load and validate a TOML config, then build an observer.
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = load_and_validate(path)?;
        Self::new(config)
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn diff_engine(&self) -> &DiffEngine {
        &self.diff
    }

    /// Rules from the repository's ignore file (empty if there is none).
    pub fn load_ignore(&self, repository: &Path) -> IgnoreMatcher {
        IgnoreMatcher::load(self.fs.as_ref(), repository, &self.config.ignore.file_name)
    }

    /// Every non-ignored entry of the repository, metadata directory excluded.
    pub fn list_tree(&self, repository: &Path) -> anyhow::Result<Vec<TreeEntry>> {
        let matcher = self.load_ignore(repository);
        listing::list_tree(
            self.fs.as_ref(),
            repository,
            &matcher,
            &self.config.notifier.metadata_dir,
        )
    }

    /// Diff the working-tree copy of `rel_path` against `previous`.
    ///
    /// `previous` is the last tracked revision supplied by the version
    /// control layer (`None` for an untracked file). A missing working-tree
    /// file renders as a deletion.
    pub fn diff_file(
        &self,
        repository: &Path,
        rel_path: &str,
        previous: Option<&[u8]>,
    ) -> Result<FileDiff> {
        let full_path = repository.join(rel_path);
        let current = if self.fs.is_file(&full_path) {
            Some(self.fs.read(&full_path)?)
        } else {
            debug!(path = %rel_path, "working-tree file missing; rendering deletion");
            None
        };

        self.diff.render_bytes(rel_path, previous, current.as_deref())
    }

    /// Long-poll `repository` for up to `[notifier].default_timeout`.
    pub async fn wait_for_change(&self, repository: &Path) -> bool {
        self.notifier.wait_with_default_timeout(repository).await
    }

    /// Close the notifier; in-flight waits return `false` promptly.
    pub fn shutdown(&self) {
        self.notifier.close();
    }
}
