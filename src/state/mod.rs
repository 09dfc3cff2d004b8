//! State module for dd-switch.
//!
//! Persists the display order and the active marker for each configuration
//! root, referencing entries by stable ids.

mod storage;

pub use storage::{EntryRecord, RootState, State};
