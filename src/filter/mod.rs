//! Filter module for dd-switch.
//!
//! Provides fuzzy matching of configuration names for `dds list --filter`
//! and for "did you mean" suggestions.

mod fuzzy;

pub use fuzzy::{filter_entries, match_score, matches};
