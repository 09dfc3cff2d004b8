//! Utility module for dd-switch.
//!
//! Default file locations and file writing helpers.

mod fs;
mod paths;

pub use fs::write_atomic;
pub use paths::{
    absolute_from, app_config_dir, default_root, default_target, settings_file, state_file_beside,
    APP_DIR_NAME, FACTORY_DIR_NAME,
};
