// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Easy-serial connection worker: reads framed text payloads off a serial
//! port, parses them into typed fields, and writes them to the database.

use std::sync::Arc;
use std::time::Duration;

use ulog_adapters::serial::{SerialError, SerialPortAdapter, TokioSerialAdapter};
use ulog_protocol::build_query;
use ulog_protocol::framer::EasySerialFramer;
use ulog_protocol::parse::easy_serial::{parse_payload_text, EasySerialFieldConfig};
use ulog_storage::config::{ConnectionConfig, EasySerialConfig};
use ulog_storage::db::DbWriter;

use super::{to_port_settings, StopSignal, WorkerShared};
use crate::error::WorkerError;

const READ_CHUNK_SIZE: usize = 1024;

/// Connection worker for `easy_serial` devices, generic over the serial
/// adapter so tests can inject [`ulog_adapters::serial::FakeSerialPort`].
pub struct EasySerialWorker<A: SerialPortAdapter = TokioSerialAdapter> {
    pub shared: Arc<WorkerShared>,
    connection: ConnectionConfig,
    config: EasySerialConfig,
    db_writer: Option<Arc<dyn DbWriter>>,
    stop: StopSignal,
    _adapter: std::marker::PhantomData<A>,
}

impl<A: SerialPortAdapter> EasySerialWorker<A> {
    pub fn new(
        connection: ConnectionConfig,
        config: EasySerialConfig,
        db_writer: Option<Arc<dyn DbWriter>>,
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
            stop: StopSignal::new(),
            _adapter: std::marker::PhantomData,
        }
    }

    pub fn request_stop(&self) {
        self.shared.set_state(ulog_core::WorkerState::Stopping);
        self.stop.request_stop();
    }

    fn field_configs(&self) -> Vec<EasySerialFieldConfig> {
        self.config
            .parser
            .fields
            .iter()
            .map(|f| EasySerialFieldConfig {
                index: f.index,
                name: f.name.clone(),
                field_type: map_field_type(&f.field_type),
                format: f.format.clone(),
            })
            .collect()
    }

    /// Run the device loop to completion. Intended to be spawned as its own
    /// task; returns once `request_stop` has been observed or the loop hits
    /// a non-recoverable open failure with autoconnect disabled.
    pub async fn run(&self) -> Result<(), WorkerError> {
        self.shared.record_run_started();

        let mut framer = EasySerialFramer::new(
            self.config.parser.preamble.as_deref(),
            &self.config.parser.terminator,
        )
        .map_err(|e| WorkerError::OpenFailed(e.to_string()))?;
        let fields = self.field_configs();
        let port_settings = to_port_settings(&self.config.port);
        let autoconnect = self.config.port.autoconnect;
        let mut port: Option<A> = None;

        let result = loop {
            if self.stop.is_stopped() {
                break Ok(());
            }

            if port.is_none() {
                match A::open(&port_settings).await {
                    Ok(opened) => {
                        self.shared.log_message(format!(
                            "opened serial port {} ({} {}{}{})",
                            port_settings.port,
                            port_settings.baud_rate,
                            port_settings.data_bits,
                            parity_letter(&self.config.port.parity),
                            self.config.port.stopbits
                        ));
                        port = Some(opened);
                    }
                    Err(e) => {
                        if !autoconnect {
                            self.shared.set_error(format!("failed to open port: {e}"));
                            break Err(WorkerError::OpenFailed(e.to_string()));
                        }
                        self.shared
                            .set_error(format!("failed to open port, will retry: {e}"));
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

            let adapter = match port.as_mut() {
                Some(adapter) => adapter,
                None => continue,
            };
            match adapter.read(READ_CHUNK_SIZE).await {
                Ok(data) if !data.is_empty() => {
                    for payload in framer.feed(&data) {
                        let text = String::from_utf8_lossy(&payload).into_owned();
                        self.shared.log_message(&text);
                        match parse_payload_text(&text, &self.config.parser.separator, &fields) {
                            Ok(parsed) => self.handle_parsed(&parsed).await,
                            Err(e) => self.shared.set_error(format!("parse error: {e}")),
                        }
                    }
                }
                Ok(_) => {
                    tokio::time::sleep(Duration::from_millis(super::IDLE_SLEEP_MS)).await;
                }
                Err(SerialError::NotOpen) => {
                    port = None;
                }
                Err(e) => {
                    self.shared.set_error(format!("read error: {e}"));
                    if let Some(mut p) = port.take() {
                        p.close().await;
                    }
                }
            }
        };

        if let Some(mut p) = port.take() {
            p.close().await;
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

    async fn handle_parsed(&self, parsed: &ulog_protocol::value::VarMap) {
        if !self.connection.enabled {
            return;
        }
        let (Some(template), Some(writer)) =
            (self.connection.query_template.as_ref(), &self.db_writer)
        else {
            return;
        };

        let (sql, params) = match build_query(template, parsed) {
            Ok(built) => built,
            Err(e) => {
                self.shared.set_error(format!("query template error: {e}"));
                return;
            }
        };
        self.shared.log_message(format!("DB write: {params:?}"));

        let start = std::time::Instant::now();
        match writer.write(&sql, &params).await {
            Ok(()) => {
                self.shared
                    .record_db_write_ok(start.elapsed().as_secs_f64() * 1000.0);
            }
            Err(e) => {
                self.shared.record_db_write_fail();
                self.shared.set_error(format!("db write error: {e}"));
            }
        }
    }
}

fn parity_letter(parity: &str) -> char {
    parity.chars().next().unwrap_or('N')
}

fn map_field_type(
    raw: &str,
) -> ulog_protocol::parse::easy_serial::EasySerialFieldType {
    use ulog_protocol::parse::easy_serial::EasySerialFieldType as T;
    match raw {
        "int" => T::Int,
        "float" => T::Float,
        "datetime" => T::DateTime,
        _ => T::String,
    }
}

#[cfg(test)]
#[path = "easy_serial_tests.rs"]
mod tests;
