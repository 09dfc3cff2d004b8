//! Order list and active marker persistence.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SwitchError};
use crate::utils::write_atomic;

/// One managed file, keyed by an id that survives renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Stable identifier.
    pub id: Uuid,
    /// File name relative to the root (e.g. `claude.json`).
    pub file: String,
}

impl EntryRecord {
    /// Create a record with a fresh id.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file: file.into(),
        }
    }
}

/// Side tables for a single configuration root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RootState {
    /// Entries in display order.
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
    /// Id of the applied entry.
    #[serde(default)]
    pub active: Option<Uuid>,
    /// When the active entry was last applied.
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
    /// Set once any entry of this root has been marked active. Stays set
    /// after the marker is cleared.
    #[serde(default)]
    pub ever_applied: bool,
}

impl RootState {
    /// Bring the records in line with the files actually present.
    ///
    /// Records whose file is gone are dropped (and so is the active marker
    /// if it pointed at one). Files without a record are appended in the
    /// order given, which callers keep sorted by name.
    ///
    /// Returns `true` if anything changed.
    pub fn reconcile(&mut self, files: &[String]) -> bool {
        let present: HashSet<&str> = files.iter().map(String::as_str).collect();
        let before = self.entries.len();

        let mut seen: HashSet<String> = HashSet::new();
        self.entries
            .retain(|r| present.contains(r.file.as_str()) && seen.insert(r.file.clone()));
        let mut changed = self.entries.len() != before;

        for file in files {
            if !seen.contains(file) {
                self.entries.push(EntryRecord::new(file.clone()));
                changed = true;
            }
        }

        if let Some(active) = self.active {
            if !self.entries.iter().any(|r| r.id == active) {
                self.active = None;
                self.applied_at = None;
                changed = true;
            }
        }

        changed
    }

    /// Find the record for a file name.
    pub fn record_for(&self, file: &str) -> Option<&EntryRecord> {
        self.entries.iter().find(|r| r.file == file)
    }

    /// Find the record for a file name, mutably.
    pub fn record_for_mut(&mut self, file: &str) -> Option<&mut EntryRecord> {
        self.entries.iter_mut().find(|r| r.file == file)
    }

    /// Append a record for a newly created file, replacing any stale one.
    pub fn push_file(&mut self, file: &str) -> Uuid {
        self.entries.retain(|r| r.file != file);
        let record = EntryRecord::new(file);
        let id = record.id;
        self.entries.push(record);
        id
    }

    /// Remove the record for a file. Clears the active marker if it matched.
    ///
    /// Returns `true` if the removed entry was active.
    pub fn remove_file(&mut self, file: &str) -> bool {
        let Some(pos) = self.entries.iter().position(|r| r.file == file) else {
            return false;
        };
        let record = self.entries.remove(pos);
        if self.active == Some(record.id) {
            self.active = None;
            self.applied_at = None;
            true
        } else {
            false
        }
    }

    /// File name of the active entry, if it is still recorded.
    pub fn active_file(&self) -> Option<&str> {
        let active = self.active?;
        self.entries
            .iter()
            .find(|r| r.id == active)
            .map(|r| r.file.as_str())
    }

    /// Mark the entry stored in `file` as active.
    pub fn set_active_file(&mut self, file: &str) -> bool {
        match self.record_for(file).map(|r| r.id) {
            Some(id) => {
                self.active = Some(id);
                self.applied_at = Some(Utc::now());
                self.ever_applied = true;
                true
            }
            None => false,
        }
    }

    /// File names in display order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|r| r.file.as_str())
    }
}

/// Persisted state for every root the user has managed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// Version of the state format.
    pub version: u32,
    /// Side tables per root directory.
    #[serde(default)]
    pub roots: HashMap<PathBuf, RootState>,
}

impl State {
    /// Current state format version.
    pub const VERSION: u32 = 1;

    /// Create an empty state.
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            roots: HashMap::new(),
        }
    }

    /// Load state from `path`.
    ///
    /// A missing file yields an empty state. A corrupt file is moved aside
    /// to `<path>.bak` and an empty state is returned.
    ///
    /// # Errors
    ///
    /// Returns `Read` if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(SwitchError::read(path, e)),
        };

        match serde_json::from_str::<State>(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "state file is corrupt, backing up and starting fresh"
                );
                let backup = backup_path(path);
                if let Err(backup_err) = fs::rename(path, &backup) {
                    tracing::warn!(error = %backup_err, "failed to back up corrupt state file");
                } else {
                    tracing::info!(backup = %backup.display(), "corrupt state backed up");
                }
                Ok(Self::new())
            }
        }
    }

    /// Save state to `path`, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        write_atomic(path, content.as_bytes())
    }

    /// Side tables for a root, if any were recorded.
    pub fn root(&self, root: &Path) -> Option<&RootState> {
        self.roots.get(root)
    }

    /// Side tables for a root, created on first use.
    pub fn root_mut(&mut self, root: &Path) -> &mut RootState {
        self.roots.entry(root.to_path_buf()).or_default()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}
