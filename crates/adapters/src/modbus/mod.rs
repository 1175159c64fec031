// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Modbus transport adapters (RTU over serial, TCP).

mod real;

pub use real::{TokioModbusRtuTransport, TokioModbusTcpTransport};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeModbusTransport;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from Modbus transport operations.
#[derive(Debug, Error)]
pub enum ModbusError {
    #[error("failed to connect: {0}")]
    ConnectFailed(String),
    #[error("modbus exception response: {0}")]
    Exception(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("short read: expected {expected} registers, got {got}")]
    ShortRead { expected: usize, got: usize },
}

/// Adapter over a connected Modbus client (RTU or TCP), reading holding
/// registers for a given slave/unit id.
#[async_trait]
pub trait ModbusTransport: Send + Sync + 'static {
    async fn read_holding_registers(
        &mut self,
        slave_id: u8,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, ModbusError>;

    async fn close(&mut self);
}
