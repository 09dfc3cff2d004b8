//! Logging system initialization.
//!
//! Events go to stderr so command output on stdout stays clean. The level
//! defaults to WARN (DEBUG with `--debug`) and can be overridden with
//! `RUST_LOG`.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter directive.
pub const DEFAULT_LEVEL: &str = "warn";

/// Filter directive used with `--debug`.
pub const DEBUG_LEVEL: &str = "dd_switch=debug,dds=debug";

/// Build the filter, preferring `RUST_LOG` when it is set and valid.
pub fn env_filter(debug: bool) -> EnvFilter {
    let fallback = if debug { DEBUG_LEVEL } else { DEFAULT_LEVEL };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(debug: bool) -> Result<()> {
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(debug))
        .with_target(debug)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    tracing::debug!("dds v{} started", env!("CARGO_PKG_VERSION"));
    Ok(())
}
