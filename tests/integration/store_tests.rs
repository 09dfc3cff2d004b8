//! Store, tracker and importer behavior through the library API.

use std::fs;

use dd_switch::active::ActiveConfigTracker;
use dd_switch::error::SwitchError;
use dd_switch::importer::import_current;

use crate::integration::fixtures::Workspace;

fn names(ws: &Workspace) -> Vec<String> {
    ws.store()
        .list()
        .expect("list")
        .iter()
        .map(|e| e.name().to_string())
        .collect()
}

// ==================== Listing ====================

#[test]
fn test_list_missing_root_is_unavailable() {
    let ws = Workspace::without_root();
    let err = ws.store().list().unwrap_err();
    assert!(matches!(err, SwitchError::StorageUnavailable { .. }));
}

#[test]
fn test_list_ignores_non_entries() {
    let ws = Workspace::with_entries(&[("a", "{}")]);
    fs::write(ws.root().join("notes.txt"), "x").unwrap();
    fs::write(ws.root().join(".hidden.json"), "{}").unwrap();
    fs::create_dir_all(ws.root().join("nested.json")).unwrap();

    assert_eq!(names(&ws), vec!["a"]);
}

#[test]
fn test_files_added_outside_are_appended_by_name() {
    let ws = Workspace::with_entries(&[("b", "{}"), ("a", "{}")]);
    let store = ws.store();
    store.reorder(&["b", "a"]).unwrap();

    ws.add("d", "{}");
    ws.add("c", "{}");
    assert_eq!(names(&ws), vec!["b", "a", "c", "d"]);
}

// ==================== Create / save / read ====================

#[test]
fn test_create_lists_name_exactly_once() {
    let ws = Workspace::new();
    let store = ws.store();

    for name in ["claude", "gpt 5", "deep/seek"] {
        store.create(name).unwrap();
    }

    let listed = names(&ws);
    assert_eq!(listed.len(), 3);
    assert_eq!(listed.iter().filter(|n| *n == "claude").count(), 1);
    assert!(listed.contains(&"gpt 5".to_string()));
    assert!(listed.contains(&"deep-seek".to_string()));
}

#[test]
fn test_create_collision_is_rejected() {
    let ws = Workspace::with_entries(&[("claude", "keep")]);
    let err = ws.store().create("claude").unwrap_err();

    assert!(matches!(err, SwitchError::AlreadyExists { .. }));
    assert_eq!(fs::read_to_string(ws.entry("claude")).unwrap(), "keep");
}

#[test]
fn test_save_read_round_trip() {
    let ws = Workspace::new();
    let store = ws.store();
    let path = store.create("a").unwrap();

    store.save(&path, "not even json\n").unwrap();
    assert_eq!(store.read(&path).unwrap(), "not even json\n");
}

#[test]
fn test_save_after_external_delete_is_not_found() {
    let ws = Workspace::new();
    let store = ws.store();
    let path = store.create("a").unwrap();
    fs::remove_file(&path).unwrap();

    assert!(store.save(&path, "x").unwrap_err().is_not_found());
    assert!(!path.exists());
}

// ==================== Rename / delete / duplicate ====================

#[test]
fn test_rename_moves_content() {
    let ws = Workspace::new();
    let store = ws.store();
    let old = store.create("a").unwrap();
    store.save(&old, "payload").unwrap();

    let new = store.rename(&old, "b").unwrap();
    assert_eq!(store.read(&new).unwrap(), "payload");
    assert!(store.read(&old).unwrap_err().is_not_found());
}

#[test]
fn test_rename_keeps_position() {
    let ws = Workspace::with_entries(&[("a", "{}"), ("b", "{}"), ("c", "{}")]);
    let store = ws.store();
    store.reorder(&["c", "a", "b"]).unwrap();

    store.rename(&ws.entry("a"), "z").unwrap();
    assert_eq!(names(&ws), vec!["c", "z", "b"]);
}

#[test]
fn test_delete_twice_is_not_found() {
    let ws = Workspace::with_entries(&[("a", "{}")]);
    let store = ws.store();

    store.delete(&ws.entry("a")).unwrap();
    assert!(names(&ws).is_empty());
    assert!(store.delete(&ws.entry("a")).unwrap_err().is_not_found());
}

#[test]
fn test_duplicate_never_overwrites() {
    let ws = Workspace::with_entries(&[("x", "original"), ("x-copy", "older copy")]);
    let store = ws.store();

    let copy = store.duplicate(&ws.entry("x")).unwrap();
    assert_eq!(copy, ws.entry("x-copy-1"));
    assert_eq!(store.read(&copy).unwrap(), "original");
    assert_eq!(store.read(&ws.entry("x-copy")).unwrap(), "older copy");
}

// ==================== Reorder ====================

#[test]
fn test_reorder_round_trip_and_rejection() {
    let ws = Workspace::with_entries(&[("a", "{}"), ("b", "{}"), ("c", "{}")]);
    let store = ws.store();

    store.reorder(&["b", "c", "a"]).unwrap();
    assert_eq!(names(&ws), vec!["b", "c", "a"]);

    for bad in [
        vec!["b", "c"],
        vec!["b", "c", "a", "a"],
        vec!["b", "c", "zzz"],
    ] {
        let err = store.reorder(bad.as_slice()).unwrap_err();
        assert!(matches!(err, SwitchError::InvalidOrder { .. }));
        assert_eq!(names(&ws), vec!["b", "c", "a"]);
    }
}

// ==================== Activation ====================

#[test]
fn test_full_lifecycle_scenario() {
    let ws = Workspace::new();
    let store = ws.store();
    let target = ws.target();
    let tracker = ActiveConfigTracker::new(&store, &target);

    let claude = store.create("claude").unwrap();
    store.save(&claude, "{\"a\":1}").unwrap();
    tracker.apply(&claude).unwrap();
    assert_eq!(ws.read_target(), "{\"a\":1}");

    let prod = store.rename(&claude, "claude-prod").unwrap();
    assert_eq!(tracker.get_active().unwrap(), Some(prod.clone()));
    assert_eq!(ws.read_target(), "{\"a\":1}");

    store.delete(&prod).unwrap();
    assert_eq!(tracker.get_active().unwrap(), None);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_external_delete_of_active_reads_as_none() {
    let ws = Workspace::with_entries(&[("a", "{}")]);
    let store = ws.store();
    let target = ws.target();
    let tracker = ActiveConfigTracker::new(&store, &target);

    tracker.apply(&ws.entry("a")).unwrap();
    fs::remove_file(ws.entry("a")).unwrap();
    assert_eq!(tracker.get_active().unwrap(), None);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_apply_outside_root_is_not_found() {
    let ws = Workspace::new();
    let outside = ws.path().join("elsewhere.json");
    fs::write(&outside, "{}").unwrap();

    let store = ws.store();
    let target = ws.target();
    let tracker = ActiveConfigTracker::new(&store, &target);
    assert!(tracker.apply(&outside).unwrap_err().is_not_found());
}

// ==================== Import ====================

#[test]
fn test_import_scenarios() {
    let ws = Workspace::new();
    let store = ws.store();
    let target = ws.target();
    let tracker = ActiveConfigTracker::new(&store, &target);

    assert!(import_current(&tracker).unwrap_err().is_not_found());

    ws.write_target("{\"customModels\":[]}");
    let path = import_current(&tracker).unwrap();
    assert_eq!(store.read(&path).unwrap(), "{\"customModels\":[]}");
    assert_eq!(tracker.get_active().unwrap(), Some(path));
}
