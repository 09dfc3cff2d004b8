//! Test fixtures for creating isolated dd-switch workspaces.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use tempfile::TempDir;

use dd_switch::store::ConfigStore;

/// A temporary home holding a configuration root, a target settings file
/// and a dd-switch settings file. Everything is removed on drop.
pub struct Workspace {
    temp: TempDir,
}

impl Workspace {
    /// Workspace with an existing, empty configuration root.
    pub fn new() -> Self {
        let ws = Self::without_root();
        fs::create_dir_all(ws.root()).expect("Failed to create configuration root");
        ws
    }

    /// Workspace whose configuration root does not exist yet.
    pub fn without_root() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        Self { temp }
    }

    /// Workspace pre-populated with entries, written in the given order.
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let ws = Self::new();
        for (name, content) in entries {
            ws.add(name, content);
        }
        ws
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }

    pub fn root(&self) -> PathBuf {
        self.path().join("configs")
    }

    pub fn target(&self) -> PathBuf {
        self.path().join("factory").join("settings.json")
    }

    pub fn settings(&self) -> PathBuf {
        self.path().join("dd-switch").join("config.toml")
    }

    pub fn state(&self) -> PathBuf {
        self.path().join("dd-switch").join("state.json")
    }

    /// Write an entry file directly, bypassing the store.
    pub fn add(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(format!("{name}.json"));
        fs::write(&path, content).expect("Failed to write entry");
        path
    }

    pub fn entry(&self, name: &str) -> PathBuf {
        self.root().join(format!("{name}.json"))
    }

    pub fn write_target(&self, content: &str) {
        let target = self.target();
        fs::create_dir_all(target.parent().expect("target has a parent"))
            .expect("Failed to create target dir");
        fs::write(target, content).expect("Failed to write target");
    }

    pub fn read_target(&self) -> String {
        fs::read_to_string(self.target()).expect("Failed to read target")
    }

    pub fn write_settings(&self, content: &str) {
        let settings = self.settings();
        fs::create_dir_all(settings.parent().expect("settings has a parent"))
            .expect("Failed to create settings dir");
        fs::write(settings, content).expect("Failed to write settings");
    }

    /// Store sharing the state file the CLI uses for this workspace.
    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(self.root(), self.state())
    }

    /// The dds binary with HOME, settings, root and target isolated here.
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--root")
            .arg(self.root())
            .arg("--target")
            .arg(self.target());
        cmd
    }

    /// Like [`Workspace::cmd`] but leaves root and target to settings and
    /// defaults.
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("dds");
        cmd.env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.settings());
        cmd
    }
}
