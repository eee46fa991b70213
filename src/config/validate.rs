// src/config/validate.rs

use std::path::{Component, Path};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{RepowatchError, Result};
use crate::types::parse_duration;
use crate::watch::event_filter::build_globset;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = RepowatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let default_timeout = parse_duration(&raw.notifier.default_timeout)
            .map_err(|e| config_error(format!("[notifier].default_timeout: {e}")))?;
        Ok(ConfigFile::new_unchecked(raw, default_timeout))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_notifier(cfg)?;
    validate_ignore(cfg)?;
    Ok(())
}

fn validate_notifier(cfg: &RawConfigFile) -> Result<()> {
    let notifier = &cfg.notifier;

    if !is_single_component(&notifier.metadata_dir) {
        return Err(config_error(format!(
            "[notifier].metadata_dir must be a single directory name (got {:?})",
            notifier.metadata_dir
        )));
    }

    let timeout = parse_duration(&notifier.default_timeout)
        .map_err(|e| config_error(format!("[notifier].default_timeout: {e}")))?;
    if timeout.is_zero() {
        return Err(config_error(
            "[notifier].default_timeout must be greater than zero".to_string(),
        ));
    }

    build_globset(&notifier.exclude)
        .map_err(|e| config_error(format!("[notifier].exclude: {e:#}")))?;

    Ok(())
}

fn validate_ignore(cfg: &RawConfigFile) -> Result<()> {
    if !is_single_component(&cfg.ignore.file_name) {
        return Err(config_error(format!(
            "[ignore].file_name must be a single file name (got {:?})",
            cfg.ignore.file_name
        )));
    }
    Ok(())
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn config_error(msg: String) -> RepowatchError {
    RepowatchError::ConfigError(msg)
}
