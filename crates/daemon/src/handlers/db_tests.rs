// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use ulog_storage::SettingsStore;

fn state() -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let store = Arc::new(SettingsStore::new(&path));
    let manager = Arc::new(ulog_engine::ConnectionRuntimeManager::new());
    (AppState::new(manager, store), dir)
}

#[tokio::test]
async fn get_returns_defaults_for_a_fresh_store() {
    let (state, _dir) = state();
    let result = get(State(state)).await.unwrap();
    assert_eq!(result.0.data, DbSettings::default());
}

#[tokio::test]
async fn save_persists_and_returns_the_new_settings() {
    let (state, _dir) = state();
    let mut db = DbSettings::default();
    db.host = "db.example.com".to_string();
    let result = save(State(state.clone()), Json(db.clone())).await.unwrap();
    assert_eq!(result.0.data.host, "db.example.com");

    let fetched = get(State(state)).await.unwrap();
    assert_eq!(fetched.0.data.host, "db.example.com");
}
