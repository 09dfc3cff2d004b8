//! Snapshot tests using insta.
//!
//! These tests capture and verify the output format of various commands.

use crate::integration::fixtures::Workspace;

fn stdout_of(cmd: &mut assert_cmd::Command) -> String {
    let output = cmd.output().expect("Failed to run dds");
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

fn stderr_of(cmd: &mut assert_cmd::Command) -> String {
    let output = cmd.output().expect("Failed to run dds");
    String::from_utf8_lossy(&output.stderr).trim_end().to_string()
}

// ==================== List Output Snapshots ====================

#[test]
fn test_snapshot_list_ordered_with_active() {
    let ws = Workspace::with_entries(&[("a", "{}"), ("b", "{}"), ("c", "{}")]);
    ws.cmd().args(["reorder", "c", "a", "b"]).assert().success();
    ws.cmd().args(["apply", "a"]).assert().success();

    let stdout = stdout_of(ws.cmd().arg("list"));

    insta::assert_snapshot!(stdout, @r"
    - c
    * a
    - b
    ");
}

#[test]
fn test_snapshot_list_after_duplicate_and_rename() {
    let ws = Workspace::with_entries(&[("claude", "{}")]);
    ws.cmd().args(["duplicate", "claude"]).assert().success();
    ws.cmd().args(["duplicate", "claude"]).assert().success();
    ws.cmd()
        .args(["rename", "claude-copy", "claude-staging"])
        .assert()
        .success();

    let stdout = stdout_of(ws.cmd().arg("list"));

    insta::assert_snapshot!(stdout, @r"
    - claude
    - claude-staging
    - claude-copy-1
    ");
}

// ==================== Content Snapshots ====================

#[test]
fn test_snapshot_new_entry_template() {
    let ws = Workspace::new();
    ws.cmd().args(["create", "fresh"]).assert().success();

    let stdout = stdout_of(ws.cmd().args(["show", "fresh"]));

    insta::assert_snapshot!(stdout, @r#"
    {
      "customModels": []
    }
    "#);
}

#[test]
fn test_snapshot_merged_target() {
    let ws = Workspace::with_entries(&[(
        "gpt",
        r#"{"custom_models":[{"model":"gpt-5","model_display_name":"GPT 5","provider":"openai"}]}"#,
    )]);
    ws.write_target(r#"{"theme":"dark"}"#);

    ws.cmd()
        .args(["apply", "gpt", "--mode", "merge-models"])
        .assert()
        .success();

    insta::assert_snapshot!(ws.read_target(), @r#"
    {
      "theme": "dark",
      "customModels": [
        {
          "model": "gpt-5",
          "id": "custom:GPT-5-0",
          "index": 0,
          "baseUrl": "",
          "apiKey": "",
          "displayName": "GPT 5",
          "maxOutputTokens": 8192,
          "noImageSupport": false,
          "provider": "openai"
        }
      ]
    }
    "#);
}

// ==================== Error Snapshots ====================

#[test]
fn test_snapshot_unknown_entry_error() {
    let ws = Workspace::with_entries(&[("claude", "{}"), ("gpt", "{}")]);

    let stderr = stderr_of(ws.cmd().args(["apply", "clau"]));

    insta::assert_snapshot!(stderr, @r"
    Error: Configuration 'clau' not found

    Did you mean: 'claude'?
    ");
}

#[test]
fn test_snapshot_invalid_order_error() {
    let ws = Workspace::with_entries(&[("a", "{}"), ("b", "{}")]);

    let stderr = stderr_of(ws.cmd().args(["reorder", "a"]));

    insta::assert_snapshot!(stderr, @"Error: Invalid order: missing b");
}
