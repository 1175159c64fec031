// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serial port adapters.

mod real;

pub use real::TokioSerialAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSerialPort;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from serial port operations.
#[derive(Debug, Error)]
pub enum SerialError {
    #[error("failed to open port {port}: {message}")]
    OpenFailed { port: String, message: String },
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("port is not open")]
    NotOpen,
}

/// Parity setting for a serial port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
    Mark,
    Space,
}

/// Flow control setting for a serial port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    None,
    RtsCts,
    XonXoff,
}

/// Port configuration shared across all serial-based protocol workers.
#[derive(Debug, Clone)]
pub struct PortSettings {
    pub port: String,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: f32,
    pub flow_control: FlowControl,
    pub autoconnect: bool,
    pub timeout_ms: u64,
}

/// A serial port discovered on the host, as reported by the platform's
/// enumeration API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SerialPortDescriptor {
    pub port: String,
    pub description: Option<String>,
}

/// List serial ports currently present on the host.
pub fn available_ports() -> Result<Vec<SerialPortDescriptor>, SerialError> {
    let ports = tokio_serial::available_ports().map_err(|e| SerialError::ReadFailed(e.to_string()))?;
    Ok(ports
        .into_iter()
        .map(|p| SerialPortDescriptor {
            port: p.port_name,
            description: match p.port_type {
                tokio_serial::SerialPortType::UsbPort(info) => info.product,
                _ => None,
            },
        })
        .collect())
}

/// Adapter for a physical (or faked) serial port, opened per reconnect cycle.
#[async_trait]
pub trait SerialPortAdapter: Send + Sync + 'static {
    /// Open the port with the given settings.
    async fn open(settings: &PortSettings) -> Result<Self, SerialError>
    where
        Self: Sized;

    /// Read up to `max_len` bytes, bounded by the port's configured timeout.
    /// Returns an empty vec on timeout with no data available.
    async fn read(&mut self, max_len: usize) -> Result<Vec<u8>, SerialError>;

    /// Write raw bytes to the port.
    async fn write(&mut self, data: &[u8]) -> Result<(), SerialError>;

    /// Close the port, releasing the underlying handle.
    async fn close(&mut self);
}
