// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Modbus TCP connection worker: polls configured slaves/variables over a
//! TCP connection and writes the combined payload to the database.

use std::net::ToSocketAddrs;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ulog_adapters::modbus::{ModbusError, ModbusTransport, TokioModbusTcpTransport};
use ulog_storage::config::{ConnectionConfig, ModbusTcpConfig};
use ulog_storage::db::DbWriter;

use super::modbus_common::{poll_slaves, write_payload, ModbusConnector, ValueCache};
use super::{StopSignal, WorkerShared};
use crate::error::WorkerError;

/// Opens a [`TokioModbusTcpTransport`] against the configured host/port.
pub struct TcpConnector {
    address: String,
    port: u16,
    timeout: Duration,
}

#[async_trait]
impl ModbusConnector for TcpConnector {
    type Transport = TokioModbusTcpTransport;

    async fn connect(&self) -> Result<TokioModbusTcpTransport, ModbusError> {
        let addr = (self.address.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ModbusError::ConnectFailed(e.to_string()))?
            .next()
            .ok_or_else(|| ModbusError::ConnectFailed("host resolved to no addresses".to_string()))?;
        TokioModbusTcpTransport::connect(addr, self.timeout).await
    }
}

pub struct ModbusTcpWorker<C: ModbusConnector = TcpConnector> {
    pub shared: Arc<WorkerShared>,
    connection: ConnectionConfig,
    config: ModbusTcpConfig,
    db_writer: Option<Arc<dyn DbWriter>>,
    connector: C,
    stop: StopSignal,
    cache: ValueCache,
}

impl ModbusTcpWorker<TcpConnector> {
    pub fn new(
        connection: ConnectionConfig,
        config: ModbusTcpConfig,
        db_writer: Option<Arc<dyn DbWriter>>,
    ) -> Self {
        let connector = TcpConnector {
            address: config.host.address.clone(),
            port: config.host.port,
            timeout: Duration::from_secs_f64(config.host.timeout.max(0.001)),
        };
        Self::with_connector(connection, config, db_writer, connector)
    }
}

impl<C: ModbusConnector> ModbusTcpWorker<C> {
    pub fn with_connector(
        connection: ConnectionConfig,
        config: ModbusTcpConfig,
        db_writer: Option<Arc<dyn DbWriter>>,
        connector: C,
    ) -> Self {
        let shared = Arc::new(WorkerShared::new(
            connection.id.unwrap_or_default(),
            connection.name.clone(),
        ));
        Self {
            shared,
            connection,
            config,
            db_writer,
            connector,
            stop: StopSignal::new(),
            cache: ValueCache::new(),
        }
    }

    pub fn request_stop(&self) {
        self.shared.set_state(ulog_core::WorkerState::Stopping);
        self.stop.request_stop();
    }

    async fn handle_payload(&self, payload: ulog_protocol::value::VarMap) {
        if !self.connection.enabled {
            self.shared
                .log_message(format!("modbus TCP slave response: {payload:?}"));
            return;
        }
        let (Some(template), Some(writer)) =
            (self.connection.query_template.as_ref(), &self.db_writer)
        else {
            return;
        };
        write_payload(&self.shared, writer, template, &payload).await;
    }

    pub async fn run(&self) -> Result<(), WorkerError> {
        self.shared.record_run_started();

        let autoconnect = self.config.host.autoconnect;
        let poll_interval = Duration::from_secs_f64(if self.config.poll_interval > 0.0 {
            self.config.poll_interval
        } else {
            0.1
        });
        let mut transport: Option<C::Transport> = None;

        let result = loop {
            if self.stop.is_stopped() {
                break Ok(());
            }

            if transport.is_none() {
                match self.connector.connect().await {
                    Ok(opened) => {
                        self.shared.log_message(format!(
                            "Modbus TCP connected to {}:{}",
                            self.config.host.address, self.config.host.port
                        ));
                        transport = Some(opened);
                    }
                    Err(e) => {
                        if !autoconnect {
                            self.shared.set_error(format!("failed to open Modbus TCP client: {e}"));
                            break Err(WorkerError::OpenFailed(e.to_string()));
                        }
                        self.shared
                            .set_error(format!("failed to open Modbus TCP client, will retry: {e}"));
                        if self
                            .stop
                            .wait(Duration::from_millis(super::RECONNECT_INTERVAL_MS))
                            .await
                        {
                            break Ok(());
                        }
                        continue;
                    }
                }
            }

            let client = match transport.as_mut() {
                Some(client) => client,
                None => continue,
            };
            let payload = poll_slaves(client, &self.config.slaves, &self.cache, &self.shared).await;
            self.handle_payload(payload).await;

            if self.stop.wait(poll_interval).await {
                break Ok(());
            }
        };

        if let Some(mut t) = transport.take() {
            t.close().await;
        }
        if let Some(writer) = &self.db_writer {
            writer.close().await;
        }
        self.shared.record_stopped();
        self.shared.set_state(match &result {
            Ok(()) => ulog_core::WorkerState::Stopped,
            Err(_) => ulog_core::WorkerState::Error,
        });
        result
    }
}

#[cfg(test)]
#[path = "modbus_tcp_tests.rs"]
mod tests;
