// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - [`model`] holds the serde structs mirroring `Repowatch.toml`.
//! - [`loader`] reads TOML from disk.
//! - [`validate`] turns a `RawConfigFile` into a checked `ConfigFile`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, DiffSection, IgnoreSection, LoggingSection, NotifierSection, RawConfigFile,
};
