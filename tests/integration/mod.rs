//! Integration tests for dd-switch.
//!
//! Organized by feature:
//!
//! - `fixtures` - Temporary workspaces with a root, target and settings file
//! - `store_tests` - Library-level store, tracker and importer behavior
//! - `cli_tests` - CLI interface tests
//! - `config_tests` - Settings file and location resolution tests
//! - `snapshot_tests` - Output snapshot tests using insta

pub mod fixtures;
pub mod snapshot_tests;
pub mod store_tests;
