//! Path utilities.

use std::path::{Path, PathBuf};

/// Directory name of the tool whose settings are switched (`~/.factory`).
pub const FACTORY_DIR_NAME: &str = ".factory";

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "dd-switch";

/// Get the config directory for dd-switch.
///
/// Returns `~/.config/dd-switch` on Linux.
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR_NAME))
}

/// Get the user settings file path.
///
/// Returns `~/.config/dd-switch/config.toml`.
pub fn settings_file() -> Option<PathBuf> {
    app_config_dir().map(|p| p.join("config.toml"))
}

/// State file kept next to a settings file.
pub fn state_file_beside(settings_file: &Path) -> PathBuf {
    settings_file.with_file_name("state.json")
}

/// Default configuration root under a home directory: `<home>/.factory/configs`.
pub fn default_root(home: &Path) -> PathBuf {
    home.join(FACTORY_DIR_NAME).join("configs")
}

/// Default active settings file under a home directory.
///
/// Prefers `<home>/.factory/settings.json`, falling back to
/// `<home>/.factory/config.json` when only the latter exists.
pub fn default_target(home: &Path) -> PathBuf {
    let dir = home.join(FACTORY_DIR_NAME);
    let settings = dir.join("settings.json");
    let legacy = dir.join("config.json");
    if !settings.exists() && legacy.exists() {
        legacy
    } else {
        settings
    }
}

/// `path` joined onto `base` when it is relative, unchanged otherwise.
pub fn absolute_from(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
