//! Active configuration module for dd-switch.
//!
//! Applies entries to the settings file read by the configured tool and
//! tracks which entry is active.

pub mod models;
mod tracker;

pub use tracker::{ActiveConfigTracker, ActiveEntry};
