// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

use ulog_storage::config::{ConnectionType, EasySerialConfig, EasySerialParserSettings, SerialPortSettings};

fn easy_serial_connection(id: i64) -> ConnectionConfig {
    let es_config = EasySerialConfig {
        port: SerialPortSettings {
            port: "/dev/does-not-exist-ulog-test".to_string(),
            autoconnect: false,
            ..SerialPortSettings::default()
        },
        parser: EasySerialParserSettings {
            preamble: None,
            terminator: "\n".to_string(),
            separator: ";".to_string(),
            encoding: "utf-8".to_string(),
            fields: vec![],
        },
    };
    ConnectionConfig {
        id: Some(id),
        name: format!("conn-{id}"),
        enabled: true,
        autostart: false,
        db_user: None,
        db_password: None,
        table_name: None,
        query_template: None,
        kind: ConnectionType::EasySerial(es_config),
    }
}

fn mbox_counter_connection(id: i64) -> ConnectionConfig {
    ConnectionConfig {
        id: Some(id),
        name: format!("counters-{id}"),
        enabled: true,
        autostart: false,
        db_user: None,
        db_password: None,
        table_name: None,
        query_template: None,
        kind: ConnectionType::MboxCounter(ulog_storage::config::MboxCounterConfig::default()),
    }
}

#[test]
fn register_without_an_id_fails() {
    let manager = ConnectionRuntimeManager::new();
    let mut connection = easy_serial_connection(1);
    connection.id = None;
    assert!(matches!(
        manager.register_connection(connection, None),
        Err(ManagerError::MissingId)
    ));
}

#[test]
fn registered_connection_starts_in_created_state() {
    let manager = ConnectionRuntimeManager::new();
    manager
        .register_connection(easy_serial_connection(1), None)
        .unwrap();
    assert_eq!(manager.get_state(1), Some(WorkerState::Created));
}

#[test]
fn double_register_returns_the_same_worker_without_replacing_it() {
    let manager = ConnectionRuntimeManager::new();
    let first = manager
        .register_connection(easy_serial_connection(1), None)
        .unwrap();
    manager.start_connection(1).unwrap();

    let second = manager
        .register_connection(easy_serial_connection(1), None)
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    // The live worker (and its running state) survives the re-register.
    assert_eq!(manager.get_state(1), Some(WorkerState::Running));
}

#[test]
fn unknown_connection_has_no_state() {
    let manager = ConnectionRuntimeManager::new();
    assert_eq!(manager.get_state(99), None);
}

#[test]
fn stop_on_an_unregistered_connection_errors() {
    let manager = ConnectionRuntimeManager::new();
    assert!(matches!(
        manager.stop_connection(1),
        Err(ManagerError::NotRegistered(1))
    ));
}

#[test]
fn start_on_an_unregistered_connection_errors() {
    let manager = ConnectionRuntimeManager::new();
    assert!(matches!(
        manager.start_connection(1),
        Err(ManagerError::NotRegistered(1))
    ));
}

#[test]
fn unregister_removes_the_worker() {
    let manager = ConnectionRuntimeManager::new();
    manager
        .register_connection(easy_serial_connection(1), None)
        .unwrap();
    manager.unregister_connection(1);
    assert_eq!(manager.get_state(1), None);
}

#[tokio::test]
async fn starting_a_worker_with_an_unopenable_port_ends_in_error_state() {
    let manager = ConnectionRuntimeManager::new();
    manager
        .register_connection(easy_serial_connection(1), None)
        .unwrap();
    manager.start_connection(1).unwrap();
    manager
        .join_connection(1, Some(Duration::from_secs(5)))
        .await
        .unwrap();
    assert_eq!(manager.get_state(1), Some(WorkerState::Error));
}

#[test]
fn counter_total_is_none_for_a_connection_that_is_not_mbox_counter() {
    let manager = ConnectionRuntimeManager::new();
    manager
        .register_connection(easy_serial_connection(1), None)
        .unwrap();
    assert_eq!(manager.counter_total(1, 0), None);
}

#[test]
fn counter_total_is_none_for_an_unregistered_connection() {
    let manager = ConnectionRuntimeManager::new();
    assert_eq!(manager.counter_total(42, 0), None);
}

#[test]
fn send_start_command_fails_for_a_non_mbox_connection() {
    let manager = ConnectionRuntimeManager::new();
    manager
        .register_connection(easy_serial_connection(1), None)
        .unwrap();
    assert!(matches!(
        manager.send_start_command(1),
        Err(ManagerError::Worker(WorkerError::MissingConfig(_)))
    ));
}

#[test]
fn send_start_command_fails_for_an_unregistered_connection() {
    let manager = ConnectionRuntimeManager::new();
    assert!(matches!(
        manager.send_start_command(99),
        Err(ManagerError::NotRegistered(99))
    ));
}

#[test]
fn get_worker_matches_the_registered_variant() {
    let manager = ConnectionRuntimeManager::new();
    manager
        .register_connection(mbox_counter_connection(7), None)
        .unwrap();
    let worker = manager.get_worker(7).expect("worker should be registered");
    assert!(matches!(*worker, Worker::MboxCounter(_)));
    assert_eq!(worker.get_total(1), None);
}
