// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real Modbus transports backed by `tokio-modbus`/`tokio-serial`.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio_modbus::client::{rtu, tcp, Context};
use tokio_modbus::prelude::*;
use tokio_serial::SerialPortBuilderExt;

use super::{ModbusError, ModbusTransport};

/// Modbus RTU transport over a serial line.
pub struct TokioModbusRtuTransport {
    ctx: Context,
}

impl TokioModbusRtuTransport {
    pub async fn connect(port: &str, baud_rate: u32) -> Result<Self, ModbusError> {
        let serial = tokio_serial::new(port, baud_rate)
            .open_native_async()
            .map_err(|e| ModbusError::ConnectFailed(e.to_string()))?;
        let ctx = rtu::attach(serial);
        Ok(Self { ctx })
    }
}

#[async_trait]
impl ModbusTransport for TokioModbusRtuTransport {
    async fn read_holding_registers(
        &mut self,
        slave_id: u8,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, ModbusError> {
        self.ctx.set_slave(Slave(slave_id));
        let response = self
            .ctx
            .read_holding_registers(address, count)
            .await
            .map_err(|e| ModbusError::Transport(e.to_string()))?
            .map_err(|e| ModbusError::Exception(format!("{e:?}")))?;
        if response.len() != count as usize {
            return Err(ModbusError::ShortRead {
                expected: count as usize,
                got: response.len(),
            });
        }
        Ok(response)
    }

    async fn close(&mut self) {
        let _ = self.ctx.disconnect().await;
    }
}

/// Modbus TCP transport.
pub struct TokioModbusTcpTransport {
    ctx: Context,
}

impl TokioModbusTcpTransport {
    pub async fn connect(addr: SocketAddr, timeout: Duration) -> Result<Self, ModbusError> {
        let ctx = tokio::time::timeout(timeout, tcp::connect(addr))
            .await
            .map_err(|_| ModbusError::ConnectFailed("connect timed out".to_string()))?
            .map_err(|e| ModbusError::ConnectFailed(e.to_string()))?;
        Ok(Self { ctx })
    }
}

#[async_trait]
impl ModbusTransport for TokioModbusTcpTransport {
    async fn read_holding_registers(
        &mut self,
        slave_id: u8,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, ModbusError> {
        self.ctx.set_slave(Slave(slave_id));
        let response = self
            .ctx
            .read_holding_registers(address, count)
            .await
            .map_err(|e| ModbusError::Transport(e.to_string()))?
            .map_err(|e| ModbusError::Exception(format!("{e:?}")))?;
        if response.len() != count as usize {
            return Err(ModbusError::ShortRead {
                expected: count as usize,
                got: response.len(),
            });
        }
        Ok(response)
    }

    async fn close(&mut self) {
        let _ = self.ctx.disconnect().await;
    }
}
