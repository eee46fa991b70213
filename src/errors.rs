// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepowatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to watch {path:?}: {source}")]
    WatchPath {
        path: PathBuf,
        source: notify::Error,
    },

    #[error("Change notifier is closed")]
    NotifierClosed,

    #[error("Content of '{0}' is not valid UTF-8 text")]
    BinaryContent(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RepowatchError>;
