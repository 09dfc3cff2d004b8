//! dd-switch - named configuration switcher
//!
//! Keeps a set of named configuration files for an AI coding tool under one
//! directory and switches between them by copying the chosen one into the
//! settings file the tool reads.
//!
//! # Modules
//!
//! - [`store`] - Entry files, display order and active marker
//! - [`active`] - Applying entries to the active settings file
//! - [`importer`] - Snapshotting the active settings file as an entry
//! - [`config`] - User settings and location resolution
//! - [`state`] - Persisted order and active marker
//! - [`filter`] - Fuzzy filtering of entry names
//! - [`cli`] - Command-line interface argument parsing
//! - [`error`] - Error types and result helpers
//! - [`logging`] - Tracing subscriber setup
//! - [`utils`] - Default paths and file helpers
//!
//! # Example
//!
//! ```no_run
//! use dd_switch::{ActiveConfigTracker, ConfigStore, SettingsResolver};
//!
//! let root = SettingsResolver::from_env().resolve(None)?;
//! let store = ConfigStore::new(root, "/tmp/dd-switch-state.json");
//! let target = SettingsResolver::from_env().resolve_target(None)?;
//!
//! let entry = store.find("claude")?;
//! ActiveConfigTracker::new(&store, target).apply(entry.path())?;
//! # Ok::<(), dd_switch::SwitchError>(())
//! ```

/// Applying entries to the active settings file.
pub mod active;

/// CLI argument definitions.
pub mod cli;

/// User settings and location resolution.
pub mod config;

/// Error types and result helpers.
pub mod error;

/// Fuzzy filtering of entry names.
pub mod filter;

/// Importing the active settings file.
pub mod importer;

/// Tracing subscriber setup.
pub mod logging;

/// Persisted order and active marker.
pub mod state;

/// Entry files under the configuration root.
pub mod store;

/// Default paths and file helpers.
pub mod utils;

// Re-export commonly used types
pub use active::ActiveConfigTracker;
pub use cli::Cli;
pub use config::{ApplyMode, Settings, SettingsResolver};
pub use error::{Result, SwitchError};
pub use importer::import_current;
pub use store::{ConfigEntry, ConfigStore};
