// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use ulog_storage::config::{
    ConnectionType, EasySerialConfig, EasySerialParserSettings, MboxCounterConfig,
    MboxCounterDeviceConfig, SerialPortSettings,
};
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
            port: SerialPortSettings::default(),
            parser: EasySerialParserSettings::default(),
        }),
    }
}

fn mbox_counter_connection(id: i64, device_id: i64, device_name: &str) -> ulog_storage::config::ConnectionConfig {
    ulog_storage::config::ConnectionConfig {
        id: Some(id),
        name: format!("counter-{id}"),
        enabled: true,
        autostart: false,
        db_user: None,
        db_password: None,
        table_name: None,
        query_template: None,
        kind: ConnectionType::MboxCounter(MboxCounterConfig {
            port: SerialPortSettings::default(),
            poll_interval: 1.0,
            devices: vec![MboxCounterDeviceConfig {
                device_id,
                name: device_name.to_string(),
                serial: 1,
                enabled: true,
            }],
        }),
    }
}

fn state() -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let store = Arc::new(SettingsStore::new(&path));
    let manager = Arc::new(ulog_engine::ConnectionRuntimeManager::new());
    (AppState::new(manager, store), dir)
}

#[tokio::test]
async fn start_command_fails_for_an_unregistered_connection() {
    let (state, _dir) = state();
    assert!(start_command(State(state), Path(99)).await.is_err());
}

#[tokio::test]
async fn start_command_fails_for_a_non_mbox_connection() {
    let (state, _dir) = state();
    state
        .manager
        .register_connection(easy_serial_connection(1), None)
        .unwrap();
    assert!(start_command(State(state), Path(1)).await.is_err());
}

#[tokio::test]
async fn available_counters_lists_devices_from_mbox_counter_connections() {
    let (state, _dir) = state();
    state
        .settings
        .upsert_connection(mbox_counter_connection(1, 7, "line-a"))
        .unwrap();
    state
        .settings
        .upsert_connection(easy_serial_connection(2))
        .unwrap();

    let result = available_counters(State(state)).await.unwrap();
    let counters = result.0.data;
    assert_eq!(counters.len(), 1);
    assert_eq!(counters[0].connection_id, 1);
    assert_eq!(counters[0].device_id, 7);
    assert_eq!(counters[0].device_name, "line-a");
}
