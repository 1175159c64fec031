// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::{ConnectionType, MboxConfig};

fn sample_connection(id: Option<i64>, name: &str) -> ConnectionConfig {
    ConnectionConfig {
        id,
        name: name.to_string(),
        enabled: false,
        autostart: false,
        db_user: None,
        db_password: None,
        table_name: None,
        query_template: None,
        kind: ConnectionType::Mbox(MboxConfig::default()),
    }
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));
    let settings = store.load_app_settings().unwrap();
    assert_eq!(settings, AppSettings::default());
}

#[test]
fn empty_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "   \n").unwrap();
    let store = SettingsStore::new(path);
    let settings = store.load_app_settings().unwrap();
    assert_eq!(settings, AppSettings::default());
}

#[test]
fn upsert_assigns_sequential_ids() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));

    let first = store.upsert_connection(sample_connection(None, "a")).unwrap();
    let second = store.upsert_connection(sample_connection(None, "b")).unwrap();
    assert_eq!(first.id, Some(1));
    assert_eq!(second.id, Some(2));
}

#[test]
fn upsert_with_existing_id_replaces_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));

    let first = store.upsert_connection(sample_connection(None, "a")).unwrap();
    let mut updated = first.clone();
    updated.autostart = true;
    store.upsert_connection(updated).unwrap();

    let connections = store.get_connections().unwrap();
    assert_eq!(connections.len(), 1);
    assert!(connections[0].autostart);
}

#[test]
fn upsert_rejects_duplicate_name_with_different_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));

    store.upsert_connection(sample_connection(None, "dup")).unwrap();
    let err = store
        .upsert_connection(sample_connection(None, "dup"))
        .unwrap_err();
    assert!(matches!(err, SettingsError::NameAlreadyExists(name) if name == "dup"));
}

#[test]
fn delete_connection_reports_whether_it_existed() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));

    let created = store.upsert_connection(sample_connection(None, "a")).unwrap();
    assert!(store.delete_connection(created.id.unwrap()).unwrap());
    assert!(!store.delete_connection(created.id.unwrap()).unwrap());
}

#[test]
fn save_db_settings_preserves_connections() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));

    store.upsert_connection(sample_connection(None, "a")).unwrap();
    store
        .save_db_settings(DbSettings {
            host: "db.example".to_string(),
            ..DbSettings::default()
        })
        .unwrap();

    let settings = store.load_app_settings().unwrap();
    assert_eq!(settings.db.host, "db.example");
    assert_eq!(settings.connections.len(), 1);
}
