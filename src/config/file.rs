//! Settings file loading and saving.

use std::fs;
use std::path::Path;

use crate::error::{Result, SwitchError};
use crate::utils::write_atomic;

use super::types::Settings;

/// Parse settings from the file at `path`.
fn load_settings_from_path(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| SwitchError::read(path, e))?;

    toml::from_str(&content).map_err(|e| SwitchError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load user settings.
///
/// A missing file yields defaults. When `explicit` is set (the path came
/// from `--config`) an unparsable file is an error; otherwise it is logged
/// and defaults are used.
///
/// # Errors
///
/// Returns `InvalidConfig` for a broken explicit file, or `Read` if the file
/// exists but cannot be read.
pub fn load_settings(path: &Path, explicit: bool) -> Result<Settings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }

    match load_settings_from_path(path) {
        Ok(settings) => Ok(settings),
        Err(e) if !explicit && matches!(e, SwitchError::InvalidConfig { .. }) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid settings file");
            Ok(Settings::default())
        }
        Err(e) => Err(e),
    }
}

/// Write user settings to `path`.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    let content = toml::to_string_pretty(settings).map_err(|e| SwitchError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_atomic(path, content.as_bytes())?;
    tracing::debug!(path = %path.display(), "settings saved");
    Ok(())
}

/// Generate an example settings file with all options documented.
pub fn generate_example_settings() -> String {
    r#"# dd-switch settings
# Place this file at ~/.config/dd-switch/config.toml

[general]
# Directory holding one JSON file per configuration.
# Defaults to ~/.factory/configs
# root = "/path/to/configs"

# Settings file the tool reads. Defaults to ~/.factory/settings.json,
# or ~/.factory/config.json when only that one exists.
# target = "/path/to/settings.json"

# How 'dds apply' writes the active file:
#   "copy"         - replace it with the configuration, byte for byte
#   "merge-models" - only replace its customModels list
apply_mode = "copy"

[list]
# Fuzzy matching for 'dds list --filter'
fuzzy = true
"#
    .to_string()
}
