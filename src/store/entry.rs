//! Configuration entry type and file name derivation.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, SwitchError};

/// Extension of managed configuration files.
pub const ENTRY_EXTENSION: &str = "json";

/// Characters that cannot appear in a derived file name.
const RESERVED_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// One named, file-backed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    name: String,
    path: PathBuf,
}

impl ConfigEntry {
    /// Build an entry from its file path. The name is the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = entry_name(&path).unwrap_or_default();
        Self { name, path }
    }

    /// Display name and lookup key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the entry, returning its path.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Derive a filesystem-safe file name (`<name>.json`) from a user supplied name.
///
/// Surrounding whitespace is trimmed and reserved or control characters are
/// replaced with `-`.
///
/// # Errors
///
/// Returns `InvalidName` if nothing usable is left after trimming.
pub fn file_name_for(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SwitchError::InvalidName {
            name: name.to_string(),
            reason: "name is empty",
        });
    }

    let safe: String = trimmed
        .chars()
        .map(|c| {
            if c.is_control() || RESERVED_CHARS.contains(&c) {
                '-'
            } else {
                c
            }
        })
        .collect();

    if safe == "." || safe == ".." {
        return Err(SwitchError::InvalidName {
            name: name.to_string(),
            reason: "name refers to a directory",
        });
    }
    if safe.starts_with('.') {
        return Err(SwitchError::InvalidName {
            name: name.to_string(),
            reason: "name cannot start with '.'",
        });
    }

    Ok(format!("{safe}.{ENTRY_EXTENSION}"))
}

/// Entry name for a file path, if the path looks like a managed entry.
pub fn entry_name(path: &Path) -> Option<String> {
    if !is_entry_file_name(path) {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(String::from)
}

/// Whether the file name has the entry extension and is not hidden.
pub fn is_entry_file_name(path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(|f| f.to_str()) else {
        return false;
    };
    !file_name.starts_with('.')
        && path
            .extension()
            .map(|e| e == ENTRY_EXTENSION)
            .unwrap_or(false)
}
