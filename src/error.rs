//! Custom error types for dd-switch.
//!
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::filter::match_score;

/// Exit codes for dds.
pub mod exit_code {
    /// Success.
    pub const SUCCESS: i32 = 0;
    /// General error.
    pub const GENERAL_ERROR: i32 = 1;
    /// Entry or file not found.
    pub const NOT_FOUND: i32 = 2;
    /// Invalid name, order or content.
    pub const INVALID_INPUT: i32 = 3;
    /// Configuration root missing or unreadable.
    pub const STORAGE_UNAVAILABLE: i32 = 4;
    /// Name collision.
    pub const CONFLICT: i32 = 5;
    /// Invalid settings file.
    pub const INVALID_CONFIG: i32 = 6;
}

/// Main error type for dd-switch.
#[derive(Error, Debug)]
pub enum SwitchError {
    /// A path that should hold a configuration does not exist.
    #[error("No configuration at '{path}'")]
    NotFound { path: PathBuf },

    /// An entry looked up by name does not exist.
    #[error("Configuration '{name}' not found\n\nRun 'dds list' to see all configurations.")]
    EntryNotFound { name: String },

    /// Entry lookup miss with close matches.
    #[error("Configuration '{name}' not found\n\nDid you mean: {suggestions}?")]
    EntryNotFoundWithSuggestions { name: String, suggestions: String },

    /// Name is empty or cannot be turned into a file name.
    #[error("Invalid configuration name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Derived file already exists.
    #[error("Configuration '{name}' already exists at '{path}'")]
    AlreadyExists { name: String, path: PathBuf },

    /// Root directory missing or unreadable.
    #[error("Configuration directory '{path}' is not available\n\nTip: Create it with 'dds init' or point to another one with 'dds root <PATH>'.")]
    StorageUnavailable { path: PathBuf },

    /// I/O failure while reading.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while writing.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reorder payload is not a permutation of the current entries.
    #[error("Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// Duplicating an entry failed after the copy was created.
    #[error("Failed to duplicate into '{name}': {source}")]
    DuplicateFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Entry content could not be interpreted for a structured apply or import.
    #[error("Invalid content in '{path}': {message}")]
    InvalidContent { path: PathBuf, message: String },

    /// Settings file could not be parsed or written.
    #[error("Invalid settings at {path}:\n  {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// No home directory to derive default locations from.
    #[error("Could not determine the home directory")]
    NoHomeDir,

    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SwitchError {
    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SwitchError::NotFound { .. }
            | SwitchError::EntryNotFound { .. }
            | SwitchError::EntryNotFoundWithSuggestions { .. } => exit_code::NOT_FOUND,
            SwitchError::InvalidName { .. }
            | SwitchError::InvalidOrder { .. }
            | SwitchError::InvalidContent { .. } => exit_code::INVALID_INPUT,
            SwitchError::StorageUnavailable { .. } => exit_code::STORAGE_UNAVAILABLE,
            SwitchError::AlreadyExists { .. } => exit_code::CONFLICT,
            SwitchError::InvalidConfig { .. } => exit_code::INVALID_CONFIG,
            SwitchError::Read { .. }
            | SwitchError::Write { .. }
            | SwitchError::DuplicateFailed { .. }
            | SwitchError::NoHomeDir
            | SwitchError::Json(_)
            | SwitchError::Io(_) => exit_code::GENERAL_ERROR,
        }
    }

    /// Whether this error means the requested entry is missing.
    pub fn is_not_found(&self) -> bool {
        self.exit_code() == exit_code::NOT_FOUND
    }

    /// Create an entry-not-found error, suggesting close names when there are any.
    pub fn entry_not_found_with_suggestions(name: &str, names: &[&str]) -> Self {
        let suggestions = find_similar_names(name, names);
        if suggestions.is_empty() {
            SwitchError::EntryNotFound {
                name: name.to_string(),
            }
        } else {
            SwitchError::EntryNotFoundWithSuggestions {
                name: name.to_string(),
                suggestions: suggestions.join(", "),
            }
        }
    }

    /// Map a read failure, turning a missing file into `NotFound`.
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            SwitchError::NotFound { path }
        } else {
            SwitchError::Read { path, source }
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SwitchError::Write {
            path: path.into(),
            source,
        }
    }
}

/// Rank entry names by fuzzy score against the missing name, best three first.
fn find_similar_names(name: &str, names: &[&str]) -> Vec<String> {
    let mut matches: Vec<(&str, i64)> = names
        .iter()
        .filter_map(|&candidate| {
            let forward = match_score(name, candidate);
            let backward = match_score(candidate, name);
            forward.max(backward).map(|score| (candidate, score))
        })
        .collect();

    matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    matches
        .into_iter()
        .take(3)
        .map(|(s, _)| format!("'{}'", s))
        .collect()
}

/// Result type alias for dd-switch operations.
pub type Result<T> = std::result::Result<T, SwitchError>;
