// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mbox-counter connection worker: polls one or more binary counter devices
//! over a shared serial line and caches their running totals in memory for
//! `mbox` workers to read via [`crate::worker::mbox::CounterTotalProvider`].
//!
//! This worker never writes to the database; it is a shared runtime
//! service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use ulog_adapters::serial::{SerialPortAdapter, TokioSerialAdapter};
use ulog_protocol::framer::MboxCounterFramer;
use ulog_protocol::parse::mbox_counter::{build_read_request, parse_response_frame};
use ulog_storage::config::{ConnectionConfig, MboxCounterConfig, MboxCounterDeviceConfig};

use super::mbox::CounterTotalProvider;
use super::{to_port_settings, StopSignal, WorkerShared};
use crate::error::WorkerError;

const READ_CHUNK_SIZE: usize = 1024;

pub struct MboxCounterWorker<A: SerialPortAdapter = TokioSerialAdapter> {
    pub shared: Arc<WorkerShared>,
    connection: ConnectionConfig,
    config: MboxCounterConfig,
    stop: StopSignal,
    totals: Mutex<HashMap<i64, u32>>,
    _adapter: std::marker::PhantomData<A>,
}

impl<A: SerialPortAdapter> MboxCounterWorker<A> {
    pub fn new(connection: ConnectionConfig, config: MboxCounterConfig) -> Self {
        let shared = Arc::new(WorkerShared::new(
            connection.id.unwrap_or_default(),
            connection.name.clone(),
        ));
        Self {
            shared,
            connection,
            config,
            stop: StopSignal::new(),
            totals: Mutex::new(HashMap::new()),
            _adapter: std::marker::PhantomData,
        }
    }

    pub fn request_stop(&self) {
        self.shared.set_state(ulog_core::WorkerState::Stopping);
        self.stop.request_stop();
    }

    pub fn get_total(&self, device_id: i64) -> Option<u32> {
        self.totals.lock().get(&device_id).copied()
    }

    async fn poll_device(
        &self,
        port: &mut A,
        framer: &mut MboxCounterFramer,
        device: &MboxCounterDeviceConfig,
        timeout: Duration,
    ) -> Result<(), WorkerError> {
        let request = build_read_request(device.serial as u32)
            .map_err(|e| WorkerError::Io(e.to_string()))?;
        port.write(&request)
            .await
            .map_err(|e| WorkerError::Io(e.to_string()))?;

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.stop.is_stopped() {
                return Ok(());
            }
            let chunk = port
                .read(READ_CHUNK_SIZE)
                .await
                .map_err(|e| WorkerError::Io(e.to_string()))?;
            if !chunk.is_empty() {
                for frame in framer.feed(&chunk) {
                    match parse_response_frame(&frame) {
                        Ok(parsed) if parsed.serial == device.serial => {
                            self.totals.lock().insert(device.device_id, parsed.total_count);
                            self.shared.log_message(format!(
                                "total count (id: {}, sn: {}): {}",
                                device.device_id, device.serial, parsed.total_count
                            ));
                            return Ok(());
                        }
                        // A frame for a different device, or a CRC/format
                        // failure: neither is fatal, keep searching.
                        _ => continue,
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(super::IDLE_SLEEP_MS)).await;
        }

        Err(WorkerError::Timeout)
    }

    async fn poll_once(&self, port: &mut A, framer: &mut MboxCounterFramer) {
        // Drain and discard any leftover bytes before issuing new requests,
        // so a stale response can't be mistaken for this cycle's answer.
        if let Ok(stale) = port.read(READ_CHUNK_SIZE).await {
            if !stale.is_empty() {
                framer.feed(&stale);
            }
        }

        let timeout = Duration::from_secs_f64(if self.config.port.timeout > 0.0 {
            self.config.port.timeout
        } else {
            1.0
        });

        for device in &self.config.devices {
            if !device.enabled {
                continue;
            }
            if let Err(e) = self.poll_device(port, framer, device, timeout).await {
                self.shared.set_error(format!(
                    "poll device error (id: {}, sn: {}): {e}",
                    device.device_id, device.serial
                ));
            }
        }
    }

    pub async fn run(&self) -> Result<(), WorkerError> {
        self.shared.record_run_started();

        let mut framer = MboxCounterFramer::new();
        let port_settings = to_port_settings(&self.config.port);
        let autoconnect = self.config.port.autoconnect;
        let poll_interval = Duration::from_secs_f64(if self.config.poll_interval > 0.0 {
            self.config.poll_interval
        } else {
            0.2
        });
        let mut port: Option<A> = None;

        let result = loop {
            if self.stop.is_stopped() {
                break Ok(());
            }

            if port.is_none() {
                match A::open(&port_settings).await {
                    Ok(opened) => {
                        self.shared.log_message(format!(
                            "mbox_counter serial opened on {}",
                            port_settings.port
                        ));
                        port = Some(opened);
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
            self.poll_once(adapter, &mut framer).await;

            if self.stop.wait(poll_interval).await {
                break Ok(());
            }
        };

        if let Some(mut p) = port.take() {
            p.close().await;
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
#[path = "mbox_counter_tests.rs"]
mod tests;
