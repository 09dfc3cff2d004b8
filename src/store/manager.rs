//! Configuration store: the managed set of entries under one root.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::{Result, SwitchError};
use crate::state::{RootState, State};
use crate::utils::write_atomic;

use super::entry::{entry_name, file_name_for, is_entry_file_name, ConfigEntry};

/// Suffix appended to the name of a duplicated entry.
pub const COPY_SUFFIX: &str = "-copy";

/// Payload written into newly created entries.
pub fn template_content() -> String {
    let template = json!({ "customModels": [] });
    serde_json::to_string_pretty(&template).unwrap_or_else(|_| "{}".to_string())
}

/// Owns the entry files under a root directory together with their
/// persisted display order and active marker.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: PathBuf,
    state_file: PathBuf,
}

impl ConfigStore {
    /// Create a store for `root`, keeping side tables in `state_file`.
    pub fn new(root: impl Into<PathBuf>, state_file: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state_file: state_file.into(),
        }
    }

    /// The configuration root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file holding order and active marker.
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Whether the root directory exists.
    pub fn root_exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Create the root directory if it is missing.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| SwitchError::write(&self.root, e))?;
        tracing::info!(root = %self.root.display(), "configuration root ready");
        Ok(())
    }

    /// List entries in display order.
    ///
    /// Entries without a recorded position come last, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the root does not exist.
    pub fn list(&self) -> Result<Vec<ConfigEntry>> {
        let state = self.snapshot()?;
        Ok(state
            .files()
            .map(|file| ConfigEntry::from_path(self.root.join(file)))
            .collect())
    }

    /// Look an entry up by name.
    ///
    /// # Errors
    ///
    /// Returns an entry-not-found error with suggestions if no entry has
    /// that name.
    pub fn find(&self, name: &str) -> Result<ConfigEntry> {
        let entries = self.list()?;
        if let Some(entry) = entries.iter().find(|e| e.name() == name) {
            return Ok(entry.clone());
        }
        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        Err(SwitchError::entry_not_found_with_suggestions(name, &names))
    }

    /// Raw content of a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is absent, `Read` on other failures.
    pub fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| SwitchError::read(path, e))
    }

    /// Create a new entry holding the template payload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` for blank names and `AlreadyExists` if the
    /// derived file is taken.
    pub fn create(&self, name: &str) -> Result<PathBuf> {
        let file = file_name_for(name)?;
        let path = self.root.join(&file);

        self.update(|state| {
            write_new_file(&path, template_content().as_bytes()).map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    SwitchError::AlreadyExists {
                        name: name.trim().to_string(),
                        path: path.clone(),
                    }
                } else {
                    SwitchError::write(&path, e)
                }
            })?;
            state.push_file(&file);
            Ok(())
        })?;

        tracing::info!(name = name.trim(), path = %path.display(), "configuration created");
        Ok(path)
    }

    /// Overwrite the content of an existing entry. Content is not validated.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry no longer exists.
    pub fn save(&self, path: &Path, content: &str) -> Result<()> {
        self.ensure_root()?;
        self.file_of(path)?;
        write_atomic(path, content.as_bytes())?;
        tracing::info!(path = %path.display(), bytes = content.len(), "configuration saved");
        Ok(())
    }

    /// Rename an entry, returning its new path.
    ///
    /// Display position and active status follow the entry. Renaming to the
    /// current name is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName`, `AlreadyExists` on collision, or `NotFound`
    /// if `old_path` is not an entry.
    pub fn rename(&self, old_path: &Path, new_name: &str) -> Result<PathBuf> {
        let new_file = file_name_for(new_name)?;
        let new_path = self.root.join(&new_file);

        self.update(|state| {
            let old_file = self.file_of(old_path)?;
            if old_file == new_file {
                return Ok(());
            }

            // On case-insensitive filesystems a case-only rename finds itself.
            let taken = if old_file.eq_ignore_ascii_case(&new_file) {
                self.scan()?.contains(&new_file)
            } else {
                new_path.exists()
            };
            if taken {
                return Err(SwitchError::AlreadyExists {
                    name: new_name.trim().to_string(),
                    path: new_path.clone(),
                });
            }

            fs::rename(self.root.join(&old_file), &new_path)
                .map_err(|e| SwitchError::write(&new_path, e))?;

            match state.record_for_mut(&old_file) {
                Some(record) => record.file = new_file.clone(),
                None => {
                    state.push_file(&new_file);
                }
            }
            Ok(())
        })?;

        tracing::info!(
            from = %old_path.display(),
            to = %new_path.display(),
            "configuration renamed"
        );
        Ok(new_path)
    }

    /// Delete an entry. Clears the active marker if it pointed here.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry is already gone.
    pub fn delete(&self, path: &Path) -> Result<()> {
        let was_active = self.update(|state| {
            let file = self.file_of(path)?;
            fs::remove_file(self.root.join(&file)).map_err(|e| SwitchError::write(path, e))?;
            Ok(state.remove_file(&file))
        })?;

        tracing::info!(path = %path.display(), was_active, "configuration deleted");
        Ok(())
    }

    /// Copy an entry into `<name>-copy` (or `<name>-copy-N` if taken).
    ///
    /// # Errors
    ///
    /// Returns `NotFound`/`Read` if the source cannot be read, and
    /// `DuplicateFailed` if writing the copy fails. No partial copy is left
    /// behind in that case.
    pub fn duplicate(&self, path: &Path) -> Result<PathBuf> {
        let source_name = entry_name(path).ok_or_else(|| SwitchError::NotFound {
            path: path.to_path_buf(),
        })?;
        let content = fs::read(path).map_err(|e| SwitchError::read(path, e))?;
        let base = format!("{source_name}{COPY_SUFFIX}");

        let new_path = self.update(|state| {
            self.file_of(path)?;
            let file = self.unique_file_name(&base)?;
            let new_path = self.root.join(&file);
            write_new_file(&new_path, &content).map_err(|source| SwitchError::DuplicateFailed {
                name: entry_name(&new_path).unwrap_or_else(|| base.clone()),
                source,
            })?;
            state.push_file(&file);
            Ok(new_path)
        })?;

        tracing::info!(
            from = %path.display(),
            to = %new_path.display(),
            "configuration duplicated"
        );
        Ok(new_path)
    }

    /// Persist a new display order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOrder` unless `names` is a permutation of the current
    /// entry names. The previous order is left untouched in that case.
    pub fn reorder<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        self.update(|state| {
            let current: Vec<String> = state
                .files()
                .filter_map(|f| entry_name(Path::new(f)))
                .collect();

            validate_permutation(&current, names)?;

            let mut reordered = Vec::with_capacity(state.entries.len());
            for name in names {
                let name = name.as_ref();
                if let Some(pos) = state
                    .entries
                    .iter()
                    .position(|r| entry_name(Path::new(&r.file)).as_deref() == Some(name))
                {
                    reordered.push(state.entries.remove(pos));
                }
            }
            state.entries = reordered;
            Ok(())
        })?;

        tracing::info!(count = names.len(), "configuration order saved");
        Ok(())
    }

    /// Path of the active entry, if there is one and it still exists.
    pub fn active_path(&self) -> Result<Option<PathBuf>> {
        if !self.root_exists() {
            return Ok(None);
        }
        let state = self.snapshot()?;
        Ok(state.active_file().map(|f| self.root.join(f)))
    }

    /// Whether an entry of this root has ever been marked active.
    ///
    /// Once true, a missing marker means "nothing active" rather than
    /// "never tracked".
    pub fn has_tracked_active(&self) -> Result<bool> {
        if !self.root_exists() {
            return Ok(false);
        }
        Ok(self.snapshot()?.ever_applied)
    }

    /// Record the entry at `path` as active.
    pub(crate) fn mark_active(&self, path: &Path) -> Result<()> {
        self.update(|state| {
            let file = self.file_of(path)?;
            state.set_active_file(&file);
            Ok(())
        })
    }

    /// Create a new entry named `base` (or `base-N`) holding `content`.
    pub(crate) fn create_unique(&self, base: &str, content: &[u8]) -> Result<PathBuf> {
        file_name_for(base)?;
        self.update(|state| {
            let file = self.unique_file_name(base)?;
            let path = self.root.join(&file);
            write_new_file(&path, content).map_err(|e| SwitchError::write(&path, e))?;
            state.push_file(&file);
            Ok(path)
        })
    }

    /// Entry file name for `path`, which must be an existing entry directly
    /// under the root.
    pub(crate) fn file_of(&self, path: &Path) -> Result<String> {
        let not_found = || SwitchError::NotFound {
            path: path.to_path_buf(),
        };

        if !is_entry_file_name(path) {
            return Err(not_found());
        }
        let file = path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(not_found)?;
        let parent = path.parent().ok_or_else(not_found)?;
        if !self.same_dir(parent) {
            return Err(not_found());
        }
        if !self.root.join(file).is_file() {
            return Err(not_found());
        }
        Ok(file.to_string())
    }

    fn same_dir(&self, dir: &Path) -> bool {
        if dir == self.root {
            return true;
        }
        match (fs::canonicalize(dir), fs::canonicalize(&self.root)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// First free file name among `base`, `base-1`, `base-2`, ...
    fn unique_file_name(&self, base: &str) -> Result<String> {
        let first = file_name_for(base)?;
        if !self.root.join(&first).exists() {
            return Ok(first);
        }
        let mut n = 1u32;
        loop {
            let candidate = file_name_for(&format!("{base}-{n}"))?;
            if !self.root.join(&candidate).exists() {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    fn ensure_root(&self) -> Result<()> {
        if self.root_exists() {
            Ok(())
        } else {
            Err(SwitchError::StorageUnavailable {
                path: self.root.clone(),
            })
        }
    }

    fn state_key(&self) -> PathBuf {
        fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone())
    }

    /// Entry file names on disk, sorted.
    fn scan(&self) -> Result<Vec<String>> {
        let unavailable = || SwitchError::StorageUnavailable {
            path: self.root.clone(),
        };
        let dir = fs::read_dir(&self.root).map_err(|_| unavailable())?;

        let mut files: Vec<String> = dir
            .flatten()
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_entry_file_name(p))
            .filter_map(|p| p.file_name().and_then(|f| f.to_str()).map(String::from))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Current side tables reconciled against disk, without persisting.
    fn snapshot(&self) -> Result<RootState> {
        self.ensure_root()?;
        let files = self.scan()?;
        let state = State::load(&self.state_file)?;
        let mut root = state.root(&self.state_key()).cloned().unwrap_or_default();
        root.reconcile(&files);
        Ok(root)
    }

    /// Load, reconcile, mutate and persist the side tables as one unit.
    ///
    /// Nothing is written if `f` fails.
    fn update<T>(&self, f: impl FnOnce(&mut RootState) -> Result<T>) -> Result<T> {
        self.ensure_root()?;
        let files = self.scan()?;
        let mut state = State::load(&self.state_file)?;
        let root = state.root_mut(&self.state_key());
        root.reconcile(&files);
        let value = f(root)?;
        state.save(&self.state_file)?;
        Ok(value)
    }
}

/// Check that `names` lists every current entry exactly once.
fn validate_permutation<S: AsRef<str>>(current: &[String], names: &[S]) -> Result<()> {
    let invalid = |reason: String| Err(SwitchError::InvalidOrder { reason });

    let known: HashSet<&str> = current.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        if !known.contains(name) {
            return invalid(format!("unknown configuration '{name}'"));
        }
        if !seen.insert(name) {
            return invalid(format!("'{name}' appears more than once"));
        }
    }

    if seen.len() != known.len() {
        let mut missing: Vec<&str> = known.difference(&seen).copied().collect();
        missing.sort_unstable();
        return invalid(format!("missing {}", missing.join(", ")));
    }

    Ok(())
}

/// Create `path` (failing if it exists) and write `content` into it.
///
/// If the write fails the new file is removed again.
fn write_new_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = file.write_all(content).and_then(|_| file.sync_all()) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %cleanup, "failed to remove partial file");
        }
        return Err(e);
    }
    Ok(())
}
