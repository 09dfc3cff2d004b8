//! Settings type definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How an entry is written to the active settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyMode {
    /// Copy the entry byte-for-byte over the active file.
    #[default]
    Copy,
    /// Normalise the entry's `customModels` and write only that key into
    /// the active file, keeping the rest of it.
    MergeModels,
}

/// General settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Override for the configuration root directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Override for the active settings file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    /// Apply strategy.
    #[serde(default)]
    pub apply_mode: ApplyMode,
}

/// Settings for `dds list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSettings {
    /// Use fuzzy matching for `--filter`.
    #[serde(default = "default_true")]
    pub fuzzy: bool,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self { fuzzy: true }
    }
}

/// User settings, stored as TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// General settings.
    #[serde(default)]
    pub general: GeneralSettings,
    /// List settings.
    #[serde(default)]
    pub list: ListSettings,
}

/// Snapshot of user-facing settings returned to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    /// Root override, `None` when the default is in use.
    pub root: Option<PathBuf>,
}

impl Settings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// The root override, if set and non-blank.
    pub fn root_override(&self) -> Option<&PathBuf> {
        self.general
            .root
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Set or clear the root override. Blank input clears it.
    pub fn set_root(&mut self, root: &str) {
        let trimmed = root.trim();
        self.general.root = if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        };
    }

    /// User-facing view of the settings.
    pub fn view(&self) -> SettingsView {
        SettingsView {
            root: self.root_override().cloned(),
        }
    }
}

fn default_true() -> bool {
    true
}
