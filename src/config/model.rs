// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::{DiffAlgorithm, LogLevel};
use crate::watch::NotifierOptions;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [notifier]
/// metadata_dir = ".git"
/// recursive = true
/// default_timeout = "30s"
/// exclude = [".git/index.lock"]
///
/// [ignore]
/// file_name = ".gitignore"
///
/// [diff]
/// algorithm = "positional"
///
/// [logging]
/// level = "debug"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub notifier: NotifierSection,

    #[serde(default)]
    pub ignore: IgnoreSection,

    #[serde(default)]
    pub diff: DiffSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// Validated configuration.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)` (see
/// `config::validate`) or [`ConfigFile::default`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub notifier: NotifierSection,
    pub ignore: IgnoreSection,
    pub diff: DiffSection,
    pub logging: LoggingSection,
    default_timeout: Duration,
}

impl ConfigFile {
    /// Construct a `ConfigFile` without running validation.
    ///
    /// `default_timeout` must be the parsed form of
    /// `notifier.default_timeout`.
    pub(crate) fn new_unchecked(
        raw: RawConfigFile,
        default_timeout: Duration,
    ) -> Self {
        Self {
            notifier: raw.notifier,
            ignore: raw.ignore,
            diff: raw.diff,
            logging: raw.logging,
            default_timeout,
        }
    }

    /// Parsed `[notifier].default_timeout`.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Options for constructing a `ChangeNotifier`.
    pub fn notifier_options(&self) -> NotifierOptions {
        NotifierOptions {
            metadata_dir: self.notifier.metadata_dir.clone(),
            recursive: self.notifier.recursive,
            default_timeout: self.default_timeout,
            exclude: self.notifier.exclude.clone(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            RawConfigFile::default(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// `[notifier]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierSection {
    /// Metadata subdirectory of a repository root (watched best-effort).
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: String,

    /// Watch repository roots recursively.
    ///
    /// When `false`, only the root directory itself and the metadata
    /// subdirectory are watched.
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Long-poll bound used when callers do not supply their own timeout.
    #[serde(default = "default_timeout_str")]
    pub default_timeout: String,

    /// Glob patterns (relative to the repository root) whose events never
    /// wake subscribers.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_metadata_dir() -> String {
    ".git".to_string()
}

fn default_recursive() -> bool {
    true
}

fn default_timeout_str() -> String {
    format!("{DEFAULT_TIMEOUT_SECS}s")
}

impl Default for NotifierSection {
    fn default() -> Self {
        Self {
            metadata_dir: default_metadata_dir(),
            recursive: default_recursive(),
            default_timeout: default_timeout_str(),
            exclude: Vec::new(),
        }
    }
}

/// `[ignore]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct IgnoreSection {
    /// Name of the ignore file read from each repository root.
    #[serde(default = "default_ignore_file_name")]
    pub file_name: String,
}

fn default_ignore_file_name() -> String {
    ".gitignore".to_string()
}

impl Default for IgnoreSection {
    fn default() -> Self {
        Self {
            file_name: default_ignore_file_name(),
        }
    }
}

/// `[diff]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DiffSection {
    #[serde(default)]
    pub algorithm: DiffAlgorithm,
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingSection {
    /// If `None`, `REPOWATCH_LOG` or `info` is used.
    #[serde(default)]
    pub level: Option<LogLevel>,
}
