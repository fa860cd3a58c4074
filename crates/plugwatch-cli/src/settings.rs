//! Settings file loading.
//!
//! Settings live in a single JSON file under the platform config dir (or a
//! path given with `--settings`). A missing default file means defaults; a
//! missing explicit file is an error.

use std::path::{Path, PathBuf};

use plugwatch_core::DiscoverySettings;

use crate::error::CliError;

/// Settings file name under the config dir
pub const SETTINGS_FILE: &str = "settings.json";

/// Default settings path for this platform, if one can be determined.
pub fn default_settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "plugwatch", "plugwatch")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

/// Load settings from `path`, or from the default location.
pub fn load_settings(path: Option<&Path>) -> Result<DiscoverySettings, CliError> {
    match path {
        Some(path) => read_settings(path),
        None => match default_settings_path() {
            Some(path) if path.exists() => read_settings(&path),
            _ => Ok(DiscoverySettings::default()),
        },
    }
}

fn read_settings(path: &Path) -> Result<DiscoverySettings, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CliError::Settings(format!("cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&contents)
        .map_err(|e| CliError::Settings(format!("cannot parse {}: {}", path.display(), e)))
}
