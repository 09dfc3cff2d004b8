//! Configuration module for dd-switch.
//!
//! Handles the user settings file and resolution of the configuration root:
//! - CLI arguments (highest priority)
//! - `~/.config/dd-switch/config.toml`
//! - Platform defaults under `~/.factory`

pub mod file;
mod resolver;
mod types;

pub use file::{generate_example_settings, load_settings, save_settings};
pub use resolver::SettingsResolver;
pub use types::{ApplyMode, GeneralSettings, ListSettings, Settings, SettingsView};
