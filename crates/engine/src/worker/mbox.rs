// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mbox connection worker: frames label messages off a serial port,
//! transforms them, and coordinates with an optional external pack counter
//! to detect and backfill missed packs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use parking_lot::Mutex;
use ulog_adapters::serial::{SerialError, SerialPortAdapter, TokioSerialAdapter};
use ulog_core::format_mbox_timestamp;
use ulog_protocol::build_query;
use ulog_protocol::framer::MboxFramer;
use ulog_protocol::parse::mbox::parse_label_frame;
use ulog_protocol::transform::{MboxTransformConfig, MboxTransformResult, MboxTransformer};
use ulog_protocol::value::{Value, VarMap};
use ulog_storage::config::{ConnectionConfig, MboxConfig, MissStrategy};
use ulog_storage::db::DbWriter;

use super::{to_port_settings, StopSignal, WorkerShared};
use crate::error::WorkerError;

const READ_CHUNK_SIZE: usize = 1024;
const START_COMMAND: &[u8] = b"\x02CHG#LABEL01.LTG\x03";

/// Reads an external counter's running total for `(connection_id, device_id)`.
/// Returns `None` when the counter device has no known total yet.
pub trait CounterTotalProvider: Send + Sync {
    fn total(&self, connection_id: i64, device_id: i64) -> Option<u32>;
}

/// Counter-reconciliation state, ticked once per loop iteration. Mirrors the
/// original's "no expiry on a pending pack" and "lot only set on miss
/// inserts" behavior verbatim; see the module's grounding notes in
/// `DESIGN.md`.
#[derive(Default)]
struct CounterState {
    last_total: Option<u32>,
    /// Set after every clean pack; deliberately never checked for its own
    /// expiry anywhere in this worker.
    pending_pack: bool,
    miss_deadline: Option<Instant>,
    pending_miss: u32,
}

pub struct MboxWorker<A: SerialPortAdapter = TokioSerialAdapter> {
    pub shared: Arc<WorkerShared>,
    connection: ConnectionConfig,
    config: MboxConfig,
    db_writer: Option<Arc<dyn DbWriter>>,
    counter_provider: Option<Arc<dyn CounterTotalProvider>>,
    stop: StopSignal,
    last_good_vars: Mutex<Option<VarMap>>,
    port_open: std::sync::atomic::AtomicBool,
    start_command_pending: std::sync::atomic::AtomicBool,
    _adapter: std::marker::PhantomData<A>,
}

impl<A: SerialPortAdapter> MboxWorker<A> {
    pub fn new(
        connection: ConnectionConfig,
        config: MboxConfig,
        db_writer: Option<Arc<dyn DbWriter>>,
        counter_provider: Option<Arc<dyn CounterTotalProvider>>,
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
            counter_provider,
            stop: StopSignal::new(),
            last_good_vars: Mutex::new(None),
            port_open: std::sync::atomic::AtomicBool::new(false),
            start_command_pending: std::sync::atomic::AtomicBool::new(false),
            _adapter: std::marker::PhantomData,
        }
    }

    pub fn request_stop(&self) {
        self.shared.set_state(ulog_core::WorkerState::Stopping);
        self.stop.request_stop();
    }

    pub fn is_port_open(&self) -> bool {
        self.port_open.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Ask the run loop to write the device's start-label command the next
    /// time it holds an open port. Fails fast if the port is not currently
    /// open rather than queuing a command that may never be sent.
    pub fn request_start_command(&self) -> Result<(), WorkerError> {
        if !self.is_port_open() {
            return Err(WorkerError::DeviceNotOpen);
        }
        self.start_command_pending
            .store(true, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }

    fn read_counter_total(&self) -> Option<u32> {
        if !self.config.ext_counter {
            return None;
        }
        let provider = self.counter_provider.as_ref()?;
        let connection_id = self.config.counter_connection_id?;
        let device_id = self.config.counter_device_id?;
        provider.total(connection_id, device_id)
    }

    fn tick_counter_logic(&self, state: &mut CounterState) {
        let Some(total) = self.read_counter_total() else {
            return;
        };
        let Some(last) = state.last_total else {
            state.last_total = Some(total);
            return;
        };
        if total <= last {
            return;
        }
        let delta = total - last;
        state.last_total = Some(total);

        if state.pending_pack {
            state.pending_pack = false;
            return;
        }

        state.pending_miss += delta;
        state.miss_deadline =
            Some(Instant::now() + Duration::from_secs_f64(self.config.counter_miss_timeout));
    }

    async fn tick_miss_insert(&self, state: &mut CounterState) {
        let Some(deadline) = state.miss_deadline else {
            return;
        };
        if Instant::now() < deadline {
            return;
        }
        state.miss_deadline = None;
        if state.pending_miss == 0 {
            return;
        }

        let limit = self.config.miss_insert_limit.max(1);
        let n = state.pending_miss.min(limit);
        state.pending_miss -= n;

        for _ in 0..n {
            self.insert_miss_pack().await;
        }
    }

    async fn insert_miss_pack(&self) {
        if !self.connection.enabled {
            return;
        }
        let Some(writer) = &self.db_writer else {
            return;
        };

        let mut vars = match self.config.miss_strategy {
            MissStrategy::Last => self.last_good_vars.lock().clone().unwrap_or_default(),
            MissStrategy::Default => json_map_to_varmap(&self.config.miss_default),
        };

        vars.insert("mbox_id".to_string(), Value::Int(self.config.mbox_id));
        vars.insert("tare".to_string(), Value::Float(self.config.tare));
        vars.insert("lot".to_string(), Value::Text(self.config.lot.clone()));
        vars.insert("on_error".to_string(), Value::Bool(true));
        vars.insert(
            "error_info".to_string(),
            Value::Text(self.config.miss_error_label.clone()),
        );
        vars.insert(
            "created_at".to_string(),
            Value::Text(format_mbox_timestamp(Local::now())),
        );

        let Some(template) = &self.connection.query_template else {
            return;
        };
        let (sql, params) = match build_query(template, &vars) {
            Ok(built) => built,
            Err(e) => {
                self.shared.set_error(format!("miss pack query error: {e}"));
                return;
            }
        };
        self.shared.log_message(format!("mbox write to DB: {params:?}"));

        let start = Instant::now();
        match writer.write(&sql, &params).await {
            Ok(()) => {
                self.shared
                    .record_db_write_ok(start.elapsed().as_secs_f64() * 1000.0);
                self.shared.log_message(format!(
                    "mbox miss pack inserted ({:?})",
                    self.config.miss_strategy
                ));
            }
            Err(e) => {
                self.shared.record_db_write_fail();
                self.shared.set_error(format!("db miss write error: {e}"));
            }
        }
    }

    async fn handle_result(&self, result: MboxTransformResult) {
        if self.connection.enabled {
            let should_write = self.connection.query_template.is_some() && self.db_writer.is_some();
            if should_write {
                self.write_clean_pack(&result.variables).await;
            }
        }
        *self.last_good_vars.lock() = Some(result.variables);
    }

    async fn write_clean_pack(&self, variables: &VarMap) {
        let (Some(template), Some(writer)) =
            (self.connection.query_template.as_ref(), &self.db_writer)
        else {
            return;
        };
        let (sql, params) = match build_query(template, variables) {
            Ok(built) => built,
            Err(e) => {
                self.shared.set_error(format!("query template error: {e}"));
                return;
            }
        };
        self.shared.log_message(format!("DB write: {params:?}"));

        let start = Instant::now();
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

    /// Send the device's fixed start-label command; only valid while the
    /// serial port is open.
    pub async fn send_start_command(&self, port: &mut A) -> Result<(), WorkerError> {
        port.write(START_COMMAND)
            .await
            .map_err(|e| WorkerError::Io(e.to_string()))?;
        self.shared.log_message("mbox start_command sent");
        Ok(())
    }

    pub async fn run(&self) -> Result<(), WorkerError> {
        self.shared.record_run_started();

        let mut framer = MboxFramer::new();
        let mut transformer = MboxTransformer::new(MboxTransformConfig {
            tare: self.config.tare,
            treat_zero_as_error: self.config.treat_zero_as_error,
            treat_duplicate_as_error: self.config.treat_duplicate_as_error,
            error_label_zero: self.config.error_label_zero.clone(),
            error_label_duplicate: self.config.error_label_duplicate.clone(),
        });
        let port_settings = to_port_settings(&self.config.port);
        let autoconnect = self.config.port.autoconnect;
        let mut counter_state = CounterState::default();
        let mut port: Option<A> = None;

        let result = loop {
            if self.stop.is_stopped() {
                break Ok(());
            }

            self.tick_counter_logic(&mut counter_state);
            self.tick_miss_insert(&mut counter_state).await;

            if port.is_none() {
                self.port_open.store(false, std::sync::atomic::Ordering::SeqCst);
                match A::open(&port_settings).await {
                    Ok(opened) => {
                        self.shared
                            .log_message(format!("mbox serial opened on {}", port_settings.port));
                        port = Some(opened);
                        self.port_open.store(true, std::sync::atomic::Ordering::SeqCst);
                    }
                    Err(e) => {
                        if !autoconnect {
                            self.shared.set_error(format!("open serial error: {e}"));
                            break Err(WorkerError::OpenFailed(e.to_string()));
                        }
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

            if self
                .start_command_pending
                .swap(false, std::sync::atomic::Ordering::SeqCst)
            {
                if let Err(e) = self.send_start_command(adapter).await {
                    self.shared.set_error(format!("start command failed: {e}"));
                }
            }

            match adapter.read(READ_CHUNK_SIZE).await {
                Ok(data) if !data.is_empty() => {
                    for payload in framer.feed(&data) {
                        match parse_label_frame(&payload, &self.config.encoding) {
                            Ok(rec) => {
                                let result = transformer.transform(self.config.mbox_id, &rec);
                                counter_state.pending_pack = true;
                                self.handle_result(result).await;
                            }
                            Err(e) => {
                                self.shared
                                    .set_error(format!("mbox parse/transform error: {e}"));
                            }
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
                    self.shared.set_error(format!("serial read error: {e}"));
                    if let Some(mut p) = port.take() {
                        p.close().await;
                    }
                    self.port_open.store(false, std::sync::atomic::Ordering::SeqCst);
                }
            }
        };

        if let Some(mut p) = port.take() {
            p.close().await;
        }
        self.port_open.store(false, std::sync::atomic::Ordering::SeqCst);
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

fn json_map_to_varmap(map: &serde_json::Map<String, serde_json::Value>) -> VarMap {
    let mut vars = VarMap::new();
    for (k, v) in map {
        let value = match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) if n.is_i64() => Value::Int(n.as_i64().unwrap_or(0)),
            serde_json::Value::Number(n) => Value::Float(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        };
        vars.insert(k.clone(), value);
    }
    vars
}

#[cfg(test)]
#[path = "mbox_tests.rs"]
mod tests;
