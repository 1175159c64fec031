// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use ulog_storage::config::{ConnectionType, EasySerialConfig, EasySerialParserSettings, SerialPortSettings};
use ulog_storage::SettingsStore;

fn easy_serial_connection(id: i64) -> ulog_storage::config::ConnectionConfig {
    ulog_storage::config::ConnectionConfig {
        id: Some(id),
        name: format!("conn-{id}"),
        enabled: true,
        autostart: false,
        db_user: None,
        db_password: None,
        table_name: None,
        query_template: None,
        kind: ConnectionType::EasySerial(EasySerialConfig {
            port: SerialPortSettings {
                port: "/dev/does-not-exist-ulog-test".to_string(),
                autoconnect: false,
                ..SerialPortSettings::default()
            },
            parser: EasySerialParserSettings::default(),
        }),
    }
}

fn state() -> AppState {
    let manager = Arc::new(ulog_engine::ConnectionRuntimeManager::new());
    let store = Arc::new(SettingsStore::new(std::path::Path::new("/tmp/ulog-runtime-tests-unused.json")));
    AppState::new(manager, store)
}

#[tokio::test]
async fn status_fails_for_an_unregistered_connection() {
    let state = state();
    assert!(status(State(state), Path(1)).await.is_err());
}

#[tokio::test]
async fn status_reports_the_registered_state() {
    let state = state();
    state.manager.register_connection(easy_serial_connection(1), None).unwrap();
    let result = status(State(state), Path(1)).await.unwrap();
    assert_eq!(result.0.data.state, WorkerState::Stopped);
}

#[tokio::test]
async fn start_fails_for_an_unregistered_connection() {
    let state = state();
    assert!(start(State(state), Path(1)).await.is_err());
}

#[tokio::test]
async fn logs_fails_for_an_unregistered_connection() {
    let state = state();
    assert!(logs(State(state), Path(1), Query(LogsQuery { messages_limit: None, errors_limit: None }))
        .await
        .is_err());
}

#[tokio::test]
async fn logs_returns_empty_histories_for_a_freshly_registered_connection() {
    let state = state();
    state.manager.register_connection(easy_serial_connection(1), None).unwrap();
    let result = logs(State(state), Path(1), Query(LogsQuery { messages_limit: None, errors_limit: None }))
        .await
        .unwrap();
    assert!(result.0.data.messages.is_empty());
    assert!(result.0.data.errors.is_empty());
}

#[tokio::test]
async fn metrics_fails_for_an_unregistered_connection() {
    let state = state();
    assert!(metrics(State(state), Path(1)).await.is_err());
}

#[tokio::test]
async fn metrics_reports_zeroed_counters_for_a_freshly_registered_connection() {
    let state = state();
    state.manager.register_connection(easy_serial_connection(1), None).unwrap();
    let result = metrics(State(state), Path(1)).await.unwrap();
    assert_eq!(result.0.data.messages_total, 0);
}
