//! Importing the tool's current settings as a managed configuration.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::active::models::extract_models;
use crate::active::ActiveConfigTracker;
use crate::config::ApplyMode;
use crate::error::{Result, SwitchError};

/// Prefix of generated import names.
pub const IMPORT_PREFIX: &str = "imported_";

/// Name for an import made at `now`, e.g. `imported_20260114_093005`.
pub fn import_name_at(now: DateTime<Local>) -> String {
    format!("{IMPORT_PREFIX}{}", now.format("%Y%m%d_%H%M%S"))
}

/// Snapshot the active settings file into a new entry and mark it active.
///
/// In copy mode the entry holds the file verbatim; in merge mode only its
/// `customModels` list is kept. Name clashes get a numeric suffix.
///
/// # Errors
///
/// Returns `NotFound` if the active settings file does not exist yet,
/// `InvalidContent` if merge mode cannot parse it, and
/// `StorageUnavailable` if the configuration root is missing.
pub fn import_current(tracker: &ActiveConfigTracker<'_>) -> Result<PathBuf> {
    let target = tracker.target();
    let raw = fs::read(target).map_err(|e| SwitchError::read(target, e))?;

    let content = match tracker.mode() {
        ApplyMode::Copy => raw,
        ApplyMode::MergeModels => {
            let settings: Value =
                serde_json::from_slice(&raw).map_err(|e| SwitchError::InvalidContent {
                    path: target.to_path_buf(),
                    message: e.to_string(),
                })?;
            serde_json::to_string_pretty(&extract_models(&settings))?.into_bytes()
        }
    };

    let store = tracker.store();
    let path = store.create_unique(&import_name_at(Local::now()), &content)?;
    store.mark_active(&path)?;

    tracing::info!(
        source = %target.display(),
        entry = %path.display(),
        "current settings imported"
    );
    Ok(path)
}
