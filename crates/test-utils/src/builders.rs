#![allow(dead_code)]

use repowatch::config::{ConfigFile, RawConfigFile};
use repowatch::types::{DiffAlgorithm, LogLevel};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn metadata_dir(mut self, name: &str) -> Self {
        self.config.notifier.metadata_dir = name.to_string();
        self
    }

    pub fn recursive(mut self, val: bool) -> Self {
        self.config.notifier.recursive = val;
        self
    }

    pub fn default_timeout(mut self, duration: &str) -> Self {
        self.config.notifier.default_timeout = duration.to_string();
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.notifier.exclude.push(pattern.to_string());
        self
    }

    pub fn ignore_file(mut self, name: &str) -> Self {
        self.config.ignore.file_name = name.to_string();
        self
    }

    pub fn diff_algorithm(mut self, algorithm: DiffAlgorithm) -> Self {
        self.config.diff.algorithm = algorithm;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = Some(level);
        self
    }

    /// The unvalidated config, for tests that exercise validation.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
