// src/core/paths.rs

use crate::constants::{CONFIG_DIR_NAME, SETTINGS_FILENAME};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not expand settings path '{path}': {reason}")]
    Expansion { path: String, reason: String },
}

/// Returns the default settings file (`~/.config/vtmenu/menu.toml` on Linux).
/// The file is not created; a missing file is reported when it is read.
pub fn default_settings_path() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILENAME))
        .ok_or(PathError::ConfigDirNotFound)
}

/// Resolves the settings file to read: the explicit path with `~` and environment
/// variables expanded, or the default location.
pub fn resolve_settings_path(explicit: Option<&str>) -> Result<PathBuf, PathError> {
    let Some(template) = explicit else {
        return default_settings_path();
    };

    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        path: template.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}
