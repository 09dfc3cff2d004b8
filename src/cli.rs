//! CLI argument definitions for dds.
//!
//! Uses clap with derive macros for argument parsing.
//!
//! # Example
//!
//! ```no_run
//! use dd_switch::cli::Cli;
//!
//! let cli = Cli::parse_args();
//! println!("Settings file: {:?}", cli.settings_path());
//! ```

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};

use crate::config::ApplyMode;
use crate::utils::settings_file;

/// Switch between named configuration files for AI coding tools.
#[derive(Parser, Debug)]
#[command(name = "dds")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the configurations (overrides settings)
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<String>,

    /// Settings file the tool reads (overrides settings)
    #[arg(long, global = true, value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// How configurations are written to the target
    #[arg(long, global = true, value_name = "MODE", value_enum)]
    pub mode: Option<CliApplyMode>,

    /// Path to settings file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ignore the settings file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completions: Option<CliShell>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands. Configurations are addressed by name.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List configurations in display order (default)
    #[command(visible_alias = "ls")]
    List {
        /// Only show names matching this query
        #[arg(short, long, value_name = "QUERY")]
        filter: Option<String>,
        /// Also print file paths
        #[arg(short, long)]
        paths: bool,
        /// Print JSON
        #[arg(long, conflicts_with = "paths")]
        json: bool,
    },
    /// Print the content of a configuration
    Show { name: String },
    /// Create a configuration from the template
    #[command(visible_alias = "new")]
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
    #[command(visible_alias = "mv")]
    Rename { name: String, new_name: String },
    /// Delete a configuration
    #[command(visible_alias = "rm")]
    Delete { name: String },
    /// Copy a configuration into <NAME>-copy
    #[command(visible_alias = "cp")]
    Duplicate { name: String },
    /// Set the display order (every configuration, once)
    Reorder {
        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
    },
    /// Make a configuration active by writing it to the target
    #[command(visible_alias = "use")]
    Apply { name: String },
    /// Print the active configuration
    Current,
    /// Import the target's current content as a new active configuration
    Import,
    /// Show, set or clear the configuration directory override
    Root {
        /// New directory
        #[arg(value_name = "PATH", conflicts_with = "unset")]
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

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliShell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    Powershell,
    /// Elvish shell
    Elvish,
}

/// Apply mode for CLI parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliApplyMode {
    /// Copy the configuration verbatim.
    Copy,
    /// Only replace the target's customModels list.
    MergeModels,
}

impl From<CliApplyMode> for ApplyMode {
    fn from(mode: CliApplyMode) -> Self {
        match mode {
            CliApplyMode::Copy => ApplyMode::Copy,
            CliApplyMode::MergeModels => ApplyMode::MergeModels,
        }
    }
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The command to run, `list` when none was given.
    pub fn effective_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::List {
            filter: None,
            paths: false,
            json: false,
        })
    }

    /// Settings file location: `--config` or the platform default.
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(settings_file)
    }

    /// Get the apply mode override.
    pub fn mode_override(&self) -> Option<ApplyMode> {
        self.mode.map(Into::into)
    }

    /// Generate shell completions and write to stdout.
    pub fn generate_completions(shell: CliShell) {
        let mut cmd = Cli::command();
        let shell = match shell {
            CliShell::Bash => Shell::Bash,
            CliShell::Zsh => Shell::Zsh,
            CliShell::Fish => Shell::Fish,
            CliShell::Powershell => Shell::PowerShell,
            CliShell::Elvish => Shell::Elvish,
        };
        generate(shell, &mut cmd, "dds", &mut std::io::stdout());
    }
}
