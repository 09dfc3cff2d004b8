//! Tracking and applying the active configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::ApplyMode;
use crate::error::{Result, SwitchError};
use crate::store::ConfigStore;
use crate::utils::write_atomic;

use super::models::{merge_models, normalize_models, MODELS_KEY};

/// The active entry and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEntry {
    /// Path of the entry.
    pub path: PathBuf,
    /// `true` when found by matching content rather than a recorded marker.
    pub detected: bool,
}

/// Copies configurations into the active settings file read by the tool
/// and remembers which entry was applied last.
///
/// The tool always reads one fixed file, so activation writes the full
/// content there rather than pointing a link at the entry.
#[derive(Debug, Clone)]
pub struct ActiveConfigTracker<'a> {
    store: &'a ConfigStore,
    target: PathBuf,
    mode: ApplyMode,
}

impl<'a> ActiveConfigTracker<'a> {
    /// Tracker writing to `target` in copy mode.
    pub fn new(store: &'a ConfigStore, target: impl Into<PathBuf>) -> Self {
        Self {
            store,
            target: target.into(),
            mode: ApplyMode::default(),
        }
    }

    /// Set the apply mode.
    pub fn with_mode(mut self, mode: ApplyMode) -> Self {
        self.mode = mode;
        self
    }

    /// The store whose entries are applied.
    pub fn store(&self) -> &'a ConfigStore {
        self.store
    }

    /// The active settings file.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// The apply mode.
    pub fn mode(&self) -> ApplyMode {
        self.mode
    }

    /// Path of the active entry.
    ///
    /// A marker pointing at an entry that no longer exists reads as `None`.
    pub fn get_active(&self) -> Result<Option<PathBuf>> {
        self.store.active_path()
    }

    /// Write the entry at `path` into the active settings file and mark it
    /// active.
    ///
    /// In copy mode the active file ends up byte-for-byte equal to the entry.
    /// Later edits to the entry are not propagated until it is applied again.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `path` is not a current entry, `InvalidContent`
    /// if merge mode cannot parse the entry or the active file, and
    /// `Write` if the active file cannot be replaced.
    pub fn apply(&self, path: &Path) -> Result<()> {
        self.store.file_of(path)?;
        let content = fs::read(path).map_err(|e| SwitchError::read(path, e))?;

        let rendered = match self.mode {
            ApplyMode::Copy => content,
            ApplyMode::MergeModels => self.render_merged(path, &content)?,
        };

        write_atomic(&self.target, &rendered)?;
        self.store.mark_active(path)?;

        tracing::info!(
            entry = %path.display(),
            target = %self.target.display(),
            mode = ?self.mode,
            "configuration applied"
        );
        Ok(())
    }

    /// The active entry, falling back to content detection only for a root
    /// that has never had a marker.
    ///
    /// Once an entry was applied here, a cleared marker stays cleared: the
    /// result is `None` even if some entry happens to match the target.
    pub fn resolve_active(&self) -> Result<Option<ActiveEntry>> {
        if let Some(path) = self.get_active()? {
            return Ok(Some(ActiveEntry {
                path,
                detected: false,
            }));
        }
        if self.store.has_tracked_active()? {
            return Ok(None);
        }
        Ok(self
            .detect_active()?
            .map(|path| ActiveEntry { path, detected: true }))
    }

    /// Content of the active settings file, `None` if it does not exist.
    pub fn read_target(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.target) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SwitchError::read(&self.target, e)),
        }
    }

    /// Find the entry whose content matches the active settings file.
    ///
    /// An entry matches when its text is identical to the file, or when its
    /// normalised model list equals the file's non-empty `customModels`.
    /// Entries that
    /// cannot be read are skipped. Used when no marker has been recorded,
    /// e.g. after the file was written by something else.
    pub fn detect_active(&self) -> Result<Option<PathBuf>> {
        let Some(current) = self.read_target()? else {
            return Ok(None);
        };
        let current_models = serde_json::from_str::<Value>(&current)
            .ok()
            .and_then(|v| v.get(MODELS_KEY).and_then(Value::as_array).cloned())
            .filter(|models| !models.is_empty());

        for entry in self.store.list()? {
            let content = match fs::read_to_string(entry.path()) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if content == current {
                return Ok(Some(entry.into_path()));
            }

            if let Some(models) = &current_models {
                if let Ok(config) = serde_json::from_str::<Value>(&content) {
                    if &normalize_models(&config) == models {
                        return Ok(Some(entry.into_path()));
                    }
                }
            }
        }

        Ok(None)
    }

    fn render_merged(&self, path: &Path, content: &[u8]) -> Result<Vec<u8>> {
        let config: Value =
            serde_json::from_slice(content).map_err(|e| SwitchError::InvalidContent {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let existing = match self.read_target()? {
            Some(text) => Some(serde_json::from_str::<Value>(&text).map_err(|e| {
                SwitchError::InvalidContent {
                    path: self.target.clone(),
                    message: e.to_string(),
                }
            })?),
            None => None,
        };

        let merged = merge_models(existing, normalize_models(&config));
        Ok(serde_json::to_string_pretty(&merged)?.into_bytes())
    }
}
