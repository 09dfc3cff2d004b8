//! Resolution of the configuration root and active settings file.

use std::path::{Path, PathBuf};

use crate::error::{Result, SwitchError};
use crate::utils::{default_root, default_target};

/// Resolves effective locations from user overrides and platform defaults.
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    home: Option<PathBuf>,
}

impl SettingsResolver {
    /// Resolver rooted at the current user's home directory.
    pub fn from_env() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    /// Resolver rooted at an explicit home directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
        }
    }

    fn home(&self) -> Result<&Path> {
        self.home.as_deref().ok_or(SwitchError::NoHomeDir)
    }

    /// Effective configuration root.
    ///
    /// Returns the trimmed override when it is non-empty, otherwise
    /// `~/.factory/configs`. Touches nothing on disk.
    pub fn resolve(&self, user_override: Option<&str>) -> Result<PathBuf> {
        match user_override.map(str::trim).filter(|s| !s.is_empty()) {
            Some(root) => Ok(PathBuf::from(root)),
            None => Ok(default_root(self.home()?)),
        }
    }

    /// Effective active settings file.
    pub fn resolve_target(&self, user_override: Option<&Path>) -> Result<PathBuf> {
        match user_override.filter(|p| !p.as_os_str().is_empty()) {
            Some(target) => Ok(target.to_path_buf()),
            None => Ok(default_target(self.home()?)),
        }
    }

    /// Whether a root directory exists. Never fails.
    pub fn exists(root: &Path) -> bool {
        root.is_dir()
    }
}
