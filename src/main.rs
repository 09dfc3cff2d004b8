//! dds - dd-switch
//!
//! Entry point for the dds CLI application.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde::Serialize;

use dd_switch::active::ActiveConfigTracker;
use dd_switch::cli::{Cli, Command};
use dd_switch::config::{load_settings, save_settings, ApplyMode, Settings, SettingsResolver};
use dd_switch::error::{exit_code, SwitchError};
use dd_switch::filter::filter_entries;
use dd_switch::importer::import_current;
use dd_switch::logging::init_logging;
use dd_switch::store::{ConfigEntry, ConfigStore};
use dd_switch::utils::{absolute_from, state_file_beside};

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            if let Some(switch_err) = err.downcast_ref::<SwitchError>() {
                eprintln!("Error: {switch_err}");
                return ExitCode::from(switch_err.exit_code() as u8);
            }
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code::GENERAL_ERROR as u8)
        }
    }
}

/// Everything a command needs, resolved once from flags and settings.
struct Session {
    settings_path: PathBuf,
    settings: Settings,
    store: ConfigStore,
    target: PathBuf,
    mode: ApplyMode,
    fuzzy: bool,
}

impl Session {
    fn tracker(&self) -> ActiveConfigTracker<'_> {
        ActiveConfigTracker::new(&self.store, &self.target).with_mode(self.mode)
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse_args();

    // Handle shell completions early
    if let Some(shell) = cli.completions {
        Cli::generate_completions(shell);
        return Ok(exit_code::SUCCESS);
    }

    init_logging(cli.debug)?;
    tracing::debug!(?cli, "parsed arguments");

    let ctx = build_session(&cli)?;
    tracing::debug!(
        settings = %ctx.settings_path.display(),
        root = %ctx.store.root().display(),
        target = %ctx.target.display(),
        mode = ?ctx.mode,
        "resolved locations"
    );

    match cli.effective_command() {
        Command::List {
            filter,
            paths,
            json,
        } => list_configs(&ctx, filter.as_deref(), paths, json),
        Command::Show { name } => {
            let entry = ctx.store.find(&name)?;
            print!("{}", ctx.store.read(entry.path())?);
            Ok(exit_code::SUCCESS)
        }
        Command::Create { name } => {
            let path = ctx.store.create(&name)?;
            println!("Created '{}' at {}", display_name(&path), path.display());
            Ok(exit_code::SUCCESS)
        }
        Command::Save {
            name,
            file,
            no_apply,
        } => save_config(&ctx, &name, file.as_deref(), no_apply),
        Command::Rename { name, new_name } => {
            let entry = ctx.store.find(&name)?;
            let path = ctx.store.rename(entry.path(), &new_name)?;
            println!("Renamed '{}' to '{}'", name, display_name(&path));
            Ok(exit_code::SUCCESS)
        }
        Command::Delete { name } => {
            let entry = ctx.store.find(&name)?;
            ctx.store.delete(entry.path())?;
            println!("Deleted '{name}'");
            Ok(exit_code::SUCCESS)
        }
        Command::Duplicate { name } => {
            let entry = ctx.store.find(&name)?;
            let path = ctx.store.duplicate(entry.path())?;
            println!("Duplicated '{}' as '{}'", name, display_name(&path));
            Ok(exit_code::SUCCESS)
        }
        Command::Reorder { names } => {
            ctx.store.reorder(names.as_slice())?;
            println!("Order updated");
            Ok(exit_code::SUCCESS)
        }
        Command::Apply { name } => {
            let entry = ctx.store.find(&name)?;
            ctx.tracker().apply(entry.path())?;
            println!("Applied '{}' to {}", entry.name(), ctx.target.display());
            Ok(exit_code::SUCCESS)
        }
        Command::Current => show_current(&ctx),
        Command::Import => {
            let path = import_current(&ctx.tracker())?;
            println!(
                "Imported {} as '{}' (active)",
                ctx.target.display(),
                display_name(&path)
            );
            Ok(exit_code::SUCCESS)
        }
        Command::Root { path, unset } => update_root(&ctx, path.as_deref(), unset),
        Command::Check => {
            let root = ctx.store.root();
            if SettingsResolver::exists(root) {
                println!("{} exists", root.display());
                Ok(exit_code::SUCCESS)
            } else {
                println!("{} does not exist", root.display());
                Ok(exit_code::STORAGE_UNAVAILABLE)
            }
        }
        Command::Init => {
            ctx.store.init()?;
            println!("Configuration directory ready: {}", ctx.store.root().display());
            Ok(exit_code::SUCCESS)
        }
        Command::Paths => {
            print_paths(&ctx);
            Ok(exit_code::SUCCESS)
        }
    }
}

/// Resolve settings, root, target and state file.
///
/// Precedence is CLI flag, then settings file, then built-in default.
fn build_session(cli: &Cli) -> Result<Session> {
    let settings_path = cli
        .settings_path()
        .context("Could not determine the settings directory")?;

    let settings = if cli.no_config {
        Settings::default()
    } else {
        load_settings(&settings_path, cli.config.is_some())?
    };

    let resolver = SettingsResolver::from_env();

    let root_override = cli.root.clone().or_else(|| {
        settings
            .root_override()
            .map(|p| p.to_string_lossy().into_owned())
    });
    let root = resolver.resolve(root_override.as_deref())?;

    let target = resolver.resolve_target(
        cli.target
            .as_deref()
            .or(settings.general.target.as_deref()),
    )?;

    let mode = cli.mode_override().unwrap_or(settings.general.apply_mode);
    let store = ConfigStore::new(root, state_file_beside(&settings_path));
    let fuzzy = settings.list.fuzzy;

    Ok(Session {
        settings_path,
        settings,
        store,
        target,
        mode,
        fuzzy,
    })
}

#[derive(Serialize)]
struct ListedEntry<'a> {
    name: &'a str,
    path: &'a Path,
    active: bool,
    detected: bool,
}

/// List configurations in display order.
fn list_configs(ctx: &Session, query: Option<&str>, show_paths: bool, json: bool) -> Result<i32> {
    let entries = ctx.store.list()?;
    let current = ctx.tracker().resolve_active()?;
    let status = |entry: &ConfigEntry| match &current {
        Some(c) if c.path.as_path() == entry.path() => (!c.detected, c.detected),
        _ => (false, false),
    };

    let shown: Vec<&ConfigEntry> = match query {
        Some(q) => filter_entries(q, &entries, ctx.fuzzy)
            .into_iter()
            .map(|(idx, _)| &entries[idx])
            .collect(),
        None => entries.iter().collect(),
    };

    if json {
        let listed: Vec<ListedEntry<'_>> = shown
            .iter()
            .map(|e| {
                let (active, detected) = status(*e);
                ListedEntry {
                    name: e.name(),
                    path: e.path(),
                    active,
                    detected,
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(exit_code::SUCCESS);
    }

    if entries.is_empty() {
        eprintln!(
            "No configurations in {}\n\nCreate one with 'dds create <NAME>' or 'dds import'.",
            ctx.store.root().display()
        );
        return Ok(exit_code::SUCCESS);
    }

    let use_colors = io::stdout().is_terminal();

    let max_name_len = shown
        .iter()
        .map(|e| e.name().chars().count())
        .max()
        .unwrap_or(0)
        .min(30);

    for entry in &shown {
        let (is_active, detected) = status(*entry);
        let marker = match (is_active, detected) {
            (true, _) => '*',
            (_, true) => '~',
            _ => '-',
        };

        let name = if show_paths {
            format!("{:width$}", entry.name(), width = max_name_len)
        } else {
            entry.name().to_string()
        };

        if use_colors && is_active {
            print!("{marker} \x1b[1;32m{name}\x1b[0m");
        } else {
            print!("{marker} {name}");
        }

        if show_paths {
            if use_colors {
                print!("  \x1b[2m{}\x1b[0m", entry.path().display());
            } else {
                print!("  {}", entry.path().display());
            }
        }
        println!();
    }

    if use_colors {
        println!();
        println!("\x1b[2m{} of {} configurations\x1b[0m", shown.len(), entries.len());
    }

    Ok(exit_code::SUCCESS)
}

/// Replace an entry's content and re-apply it when it is active.
fn save_config(ctx: &Session, name: &str, file: Option<&Path>, no_apply: bool) -> Result<i32> {
    let entry = ctx.store.find(name)?;

    let content = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read content from stdin")?;
            buf
        }
    };

    ctx.store.save(entry.path(), &content)?;

    let tracker = ctx.tracker();
    let is_active = tracker.get_active()?.as_deref() == Some(entry.path());
    if is_active && !no_apply {
        tracker.apply(entry.path())?;
        println!("Saved '{}' and re-applied it", entry.name());
    } else {
        println!("Saved '{}'", entry.name());
    }

    Ok(exit_code::SUCCESS)
}

fn show_current(ctx: &Session) -> Result<i32> {
    match ctx.tracker().resolve_active()? {
        Some(current) => {
            let name = display_name(&current.path);
            if current.detected {
                println!("{name} (detected)");
            } else {
                println!("{name}");
            }
            Ok(exit_code::SUCCESS)
        }
        None => {
            eprintln!("No active configuration");
            Ok(exit_code::NOT_FOUND)
        }
    }
}

/// Show, set or clear the persisted root override.
fn update_root(ctx: &Session, path: Option<&str>, unset: bool) -> Result<i32> {
    if path.is_none() && !unset {
        let view = ctx.settings.view();
        match view.root {
            Some(root) => println!("{} (from {})", root.display(), ctx.settings_path.display()),
            None => println!("{} (default)", ctx.store.root().display()),
        }
        return Ok(exit_code::SUCCESS);
    }

    // Start from what is on disk so --no-config does not drop other keys.
    let mut settings = load_settings(&ctx.settings_path, true)?;
    let new_root = match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => {
            // Relative paths are stored against the current directory.
            let cwd = std::env::current_dir().context("Failed to read the current directory")?;
            absolute_from(Path::new(p), &cwd)
                .to_string_lossy()
                .into_owned()
        }
        None => String::new(),
    };
    settings.set_root(&new_root);
    save_settings(&ctx.settings_path, &settings)?;

    match settings.root_override() {
        Some(root) => {
            println!("Configuration directory set to {}", root.display());
            if !SettingsResolver::exists(root) {
                eprintln!(
                    "Warning: {} does not exist yet. Run 'dds init' to create it.",
                    root.display()
                );
            }
        }
        None => println!("Configuration directory reset to the default"),
    }

    Ok(exit_code::SUCCESS)
}

fn print_paths(ctx: &Session) {
    let rows = [
        ("Settings", ctx.settings_path.as_path()),
        ("State", ctx.store.state_file()),
        ("Configurations", ctx.store.root()),
        ("Target", ctx.target.as_path()),
    ];
    for (label, path) in rows {
        println!("{label:<15} {} (exists: {})", path.display(), path.exists());
    }
}

fn display_name(path: &Path) -> String {
    ConfigEntry::from_path(path).name().to_string()
}
