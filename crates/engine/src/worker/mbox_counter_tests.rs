// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ulog_adapters::serial::FakeSerialPort;
use ulog_storage::config::{ConnectionType, SerialPortSettings};
use ulog_storage::ConnectionConfig;

fn test_config(devices: Vec<MboxCounterDeviceConfig>) -> (ConnectionConfig, MboxCounterConfig) {
    let counter_cfg = MboxCounterConfig {
        port: SerialPortSettings {
            port: "COM3".to_string(),
            timeout: 0.05,
            ..SerialPortSettings::default()
        },
        poll_interval: 0.01,
        devices,
    };
    let connection = ConnectionConfig {
        id: Some(5),
        name: "counters".to_string(),
        enabled: true,
        autostart: true,
        db_user: None,
        db_password: None,
        table_name: None,
        query_template: None,
        kind: ConnectionType::MboxCounter(counter_cfg.clone()),
    };
    (connection, counter_cfg)
}

#[test]
fn get_total_is_none_before_any_successful_poll() {
    let (connection, config) = test_config(vec![MboxCounterDeviceConfig {
        device_id: 1,
        name: "line-1".to_string(),
        serial: 7,
        enabled: true,
    }]);
    let worker: MboxCounterWorker<FakeSerialPort> = MboxCounterWorker::new(connection, config);
    assert_eq!(worker.get_total(1), None);
}

#[test]
fn get_total_reflects_the_most_recent_cached_value() {
    let (connection, config) = test_config(vec![]);
    let worker: MboxCounterWorker<FakeSerialPort> = MboxCounterWorker::new(connection, config);
    worker.totals.lock().insert(3, 120);
    assert_eq!(worker.get_total(3), Some(120));
    worker.totals.lock().insert(3, 121);
    assert_eq!(worker.get_total(3), Some(121));
}

#[tokio::test]
async fn poll_device_times_out_when_no_matching_frame_arrives() {
    let (connection, config) = test_config(vec![MboxCounterDeviceConfig {
        device_id: 1,
        name: "line-1".to_string(),
        serial: 99,
        enabled: true,
    }]);
    let worker: MboxCounterWorker<FakeSerialPort> = MboxCounterWorker::new(connection, config);
    let mut port = FakeSerialPort::new();
    let mut framer = MboxCounterFramer::new();
    let device = MboxCounterDeviceConfig {
        device_id: 1,
        name: "line-1".to_string(),
        serial: 99,
        enabled: true,
    };

    let result = worker
        .poll_device(&mut port, &mut framer, &device, Duration::from_millis(20))
        .await;
    assert!(matches!(result, Err(WorkerError::Timeout)));
    assert_eq!(worker.get_total(1), None);
}

#[tokio::test]
async fn poll_device_caches_total_from_a_matching_response_frame() {
    let (connection, config) = test_config(vec![]);
    let worker: MboxCounterWorker<FakeSerialPort> = MboxCounterWorker::new(connection, config);
    let mut port = FakeSerialPort::new();
    let mut framer = MboxCounterFramer::new();
    let device = MboxCounterDeviceConfig {
        device_id: 4,
        name: "line-4".to_string(),
        serial: 55,
        enabled: true,
    };

    let frame = build_response_frame(55, 250);
    port.push_inbound(&frame);

    worker
        .poll_device(&mut port, &mut framer, &device, Duration::from_millis(200))
        .await
        .expect("matching frame should resolve before timeout");
    assert_eq!(worker.get_total(4), Some(250));
}

#[test]
fn request_stop_transitions_state() {
    let (connection, config) = test_config(vec![]);
    let worker: MboxCounterWorker<FakeSerialPort> = MboxCounterWorker::new(connection, config);
    worker.request_stop();
    assert_eq!(worker.shared.state(), ulog_core::WorkerState::Stopping);
}

fn build_response_frame(serial: u16, total_count: u32) -> Vec<u8> {
    use ulog_protocol::parse::mbox_counter::crc8_e5;

    const C_READ_RESP: u8 = 0x08;
    let mut data = Vec::with_capacity(7);
    data.extend_from_slice(&total_count.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.push(0);
    let data_crc = crc8_e5(&data);

    let l = 3 + data.len() as u8;
    let mut header = vec![l, C_READ_RESP];
    header.extend_from_slice(&serial.to_le_bytes());
    let hdr_crc = crc8_e5(&header);

    let mut frame = vec![0x27];
    frame.extend_from_slice(&header);
    frame.push(hdr_crc);
    frame.extend_from_slice(&data);
    frame.push(data_crc);
    frame
}
