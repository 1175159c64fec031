// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared polling/decoding/value-cache logic for the RTU and TCP Modbus
//! workers. The two protocols differ only in how a transport is opened; both
//! drive the same slave/variable loop over [`ModbusTransport`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use ulog_adapters::modbus::{ModbusError, ModbusTransport};
use ulog_protocol::parse::modbus::{decode_registers, Decoded};
use ulog_protocol::value::{Value, VarMap};
use ulog_storage::config::{ModbusSlaveConfig, ModbusVariableConfig};

use crate::worker::WorkerShared;

/// Opens (or reopens) a transport for a specific RTU/TCP configuration.
/// Production connectors wrap [`ulog_adapters::modbus::TokioModbusRtuTransport`]
/// / `TokioModbusTcpTransport::connect`; test connectors hand back a shared
/// [`ulog_adapters::modbus::FakeModbusTransport`] clone.
#[async_trait]
pub trait ModbusConnector: Send + Sync + 'static {
    type Transport: ModbusTransport;

    async fn connect(&self) -> Result<Self::Transport, ModbusError>;
}

fn decoded_to_value(decoded: Decoded) -> Value {
    match decoded {
        Decoded::Unsigned(v) => Value::Int(v as i64),
        Decoded::Signed(v) => Value::Int(v as i64),
        Decoded::Float(v) => Value::Float(v),
    }
}

fn default_to_value(default: Option<f64>) -> Value {
    match default {
        Some(v) => Value::Float(v),
        None => Value::Null,
    }
}

/// Per-variable last-known-good value cache, shared across poll cycles.
/// Falls back to the variable's configured default when nothing has been
/// read successfully yet.
#[derive(Default)]
pub struct ValueCache {
    values: Mutex<HashMap<String, Value>>,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, name: &str, value: Value) {
        self.values.lock().insert(name.to_string(), value);
    }

    fn current(&self, var: &ModbusVariableConfig) -> Value {
        self.values
            .lock()
            .get(&var.name)
            .cloned()
            .unwrap_or_else(|| default_to_value(var.default))
    }
}

/// One full pass over every slave and variable, reading registers through
/// `transport`, decoding them, and updating `cache`. Returns the payload to
/// be written to the database, keyed by variable name.
pub async fn poll_slaves<T: ModbusTransport>(
    transport: &mut T,
    slaves: &[ModbusSlaveConfig],
    cache: &ValueCache,
    shared: &WorkerShared,
) -> VarMap {
    let mut payload = VarMap::new();

    for slave in slaves {
        for var in &slave.variables {
            let count = var.encoding.register_count() as u16;
            match transport
                .read_holding_registers(slave.slave_id, var.address, count)
                .await
            {
                Ok(registers) => match decode_registers(&registers, &to_protocol_var(var)) {
                    Ok(decoded) => cache.update(&var.name, decoded_to_value(decoded)),
                    Err(e) => shared.set_error(format!(
                        "modbus decode error (slave={}, var={}): {e}",
                        slave.slave_id, var.name
                    )),
                },
                Err(e) => shared.set_error(format!(
                    "modbus read error (slave={}, var={}): {e}",
                    slave.slave_id, var.name
                )),
            }
        }
        for var in &slave.variables {
            payload.insert(var.name.clone(), cache.current(var));
        }
    }

    payload
}

fn to_protocol_var(cfg: &ModbusVariableConfig) -> ulog_protocol::parse::modbus::ModbusVariableConfig {
    ulog_protocol::parse::modbus::ModbusVariableConfig {
        name: cfg.name.clone(),
        address: cfg.address,
        encoding: cfg.encoding,
        k: cfg.k,
        b: cfg.b,
    }
}

/// Records a DB write attempt's latency/outcome the same way every worker
/// does, returning once the write (or the decision to skip it) is complete.
pub async fn write_payload(
    shared: &WorkerShared,
    writer: &Arc<dyn ulog_storage::db::DbWriter>,
    template: &str,
    payload: &VarMap,
) {
    let (sql, params) = match ulog_protocol::build_query(template, payload) {
        Ok(built) => built,
        Err(e) => {
            shared.set_error(format!("query template error: {e}"));
            return;
        }
    };
    shared.log_message(format!("DB write: {params:?}"));

    let start = Instant::now();
    match writer.write(&sql, &params).await {
        Ok(()) => {
            shared.record_db_write_ok(start.elapsed().as_secs_f64() * 1000.0);
        }
        Err(e) => {
            shared.record_db_write_fail();
            shared.set_error(format!("db write error: {e}"));
        }
    }
}

#[cfg(test)]
#[path = "modbus_common_tests.rs"]
mod tests;
