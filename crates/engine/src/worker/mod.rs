// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-protocol connection workers.
//!
//! Each worker owns one connection's device I/O loop and writes parsed
//! records to the database through a shared [`ulog_storage::DbWriter`]. All
//! five share [`base::WorkerShared`] for lifecycle state, log/error buffers,
//! and metrics.

pub mod base;
pub mod easy_serial;
pub mod mbox;
pub mod mbox_counter;
pub mod modbus_common;
pub mod modbus_rtu;
pub mod modbus_tcp;
pub mod stop_signal;

pub use base::{CoreMetrics, WorkerShared};
pub use stop_signal::StopSignal;

use ulog_adapters::serial::{FlowControl, Parity, PortSettings};
use ulog_storage::config::SerialPortSettings;

/// Convert stored serial-port settings into the adapter's connection
/// parameters, mapping string enums the way every protocol's Python
/// original did (unrecognized values fall back to the "off" variant).
pub fn to_port_settings(cfg: &SerialPortSettings) -> PortSettings {
    let parity = match cfg.parity.as_str() {
        "Even" => Parity::Even,
        "Odd" => Parity::Odd,
        "Mark" => Parity::Mark,
        "Space" => Parity::Space,
        _ => Parity::None,
    };
    let flow_control = match cfg.flowcontrol.as_str() {
        "RTSCTS" => FlowControl::RtsCts,
        "XONXOFF" => FlowControl::XonXoff,
        _ => FlowControl::None,
    };
    PortSettings {
        port: cfg.port.clone(),
        baud_rate: cfg.baudrate,
        data_bits: cfg.databits,
        parity,
        stop_bits: cfg.stopbits,
        flow_control,
        autoconnect: cfg.autoconnect,
        timeout_ms: (cfg.timeout * 1000.0).round().max(1.0) as u64,
    }
}

const RECONNECT_INTERVAL_MS: u64 = 2_000;
const IDLE_SLEEP_MS: u64 = 10;
