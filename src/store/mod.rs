//! Store module for dd-switch.
//!
//! The set of named configuration files under the configuration root, with
//! their display order.

mod entry;
mod manager;

pub use entry::{entry_name, file_name_for, is_entry_file_name, ConfigEntry, ENTRY_EXTENSION};
pub use manager::{template_content, ConfigStore, COPY_SUFFIX};
