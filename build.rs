//! Build script for dds.
//!
//! Generates the man page using clap_mangen.

use std::env;
use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

/// Minimal CLI struct for man page generation.
///
/// Mirrors the argument surface of `src/cli.rs` without depending on the crate.
#[derive(Parser)]
#[command(name = "dds")]
#[command(
    author,
    version,
    about = "Switch between named configuration files for AI coding tools"
)]
#[command(
    long_about = "dds keeps named configuration files for an AI coding tool in one directory \
    (~/.factory/configs by default) and makes one of them active by copying it into the \
    settings file the tool reads (~/.factory/settings.json).\n\n\
    Run without a subcommand to list configurations. The active one is marked with '*'."
)]
struct Cli {
    /// Directory holding the configurations (overrides settings)
    #[arg(long, global = true, value_name = "PATH")]
    root: Option<String>,

    /// Settings file the tool reads (overrides settings)
    #[arg(long, global = true, value_name = "PATH")]
    target: Option<PathBuf>,

    /// How configurations are written to the target
    #[arg(long, global = true, value_name = "MODE", value_enum)]
    mode: Option<ApplyMode>,

    /// Path to settings file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore the settings file
    #[arg(long, global = true)]
    no_config: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List configurations in display order (default)
    List {
        /// Only show names matching this query
        #[arg(short, long, value_name = "QUERY")]
        filter: Option<String>,
        /// Also print file paths
        #[arg(short, long)]
        paths: bool,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the content of a configuration
    Show { name: String },
    /// Create a configuration from the template
    Create { name: String },
    /// Replace the content of a configuration (from --file or stdin)
    Save {
        name: String,
        /// Read content from this file instead of stdin
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
        /// Do not re-apply when the configuration is active
        #[arg(long)]
        no_apply: bool,
    },
    /// Rename a configuration
    Rename { name: String, new_name: String },
    /// Delete a configuration
    Delete { name: String },
    /// Copy a configuration into <NAME>-copy
    Duplicate { name: String },
    /// Set the display order (every configuration, once)
    Reorder { names: Vec<String> },
    /// Make a configuration active by writing it to the target
    Apply { name: String },
    /// Print the active configuration
    Current,
    /// Import the target's current content as a new active configuration
    Import,
    /// Show, set or clear the configuration directory override
    Root {
        path: Option<String>,
        /// Go back to the default directory
        #[arg(long)]
        unset: bool,
    },
    /// Check that the configuration directory exists
    Check,
    /// Create the configuration directory
    Init,
    /// Print the locations in use
    Paths,
}

#[derive(Clone, Copy, ValueEnum)]
enum ApplyMode {
    Copy,
    MergeModels,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
    Elvish,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=DDS_GEN_MANPAGE");

    // Only generate man pages for release builds or when explicitly requested
    let profile = env::var("PROFILE").unwrap_or_default();
    if profile != "release" && env::var("DDS_GEN_MANPAGE").is_err() {
        return;
    }

    let out_dir = match env::var_os("OUT_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => return,
    };

    let man = clap_mangen::Man::new(Cli::command());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=failed to render man page: {e}");
        return;
    }

    let man_path = out_dir.join("dds.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=failed to write man page: {e}");
        return;
    }

    // Also copy to docs directory for distribution
    if let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR") {
        let docs_dir = PathBuf::from(manifest_dir).join("docs");
        if docs_dir.exists() {
            let _ = fs::copy(&man_path, docs_dir.join("dds.1"));
        }
    }
}
