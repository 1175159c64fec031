// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state and bookkeeping common to every connection worker.
//!
//! Every protocol worker (`easy_serial`, `mbox`, `mbox_counter`, `modbus_rtu`,
//! `modbus_tcp`) wraps one of these to track lifecycle state, recent
//! messages/errors, and run/write metrics, instead of re-deriving the
//! bookkeeping in each worker.

use chrono::Local;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use ulog_core::{format_local, EmaLatency, RingBuffer, WorkerState};

const MESSAGE_BUFFER_CAPACITY: usize = 200;
const ERROR_BUFFER_CAPACITY: usize = 50;

/// Point-in-time snapshot of a worker's run/write counters, suitable for
/// serializing into a runtime-status API response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoreMetrics {
    pub runs_total: u64,
    pub started_at: Option<String>,
    pub stopped_at: Option<String>,
    pub errors_total: u64,
    pub consecutive_errors: u64,
    pub last_error_at: Option<String>,
    pub messages_total: u64,
    pub last_message_at: Option<String>,
    pub db_writes_total: u64,
    pub db_write_fail_total: u64,
    pub last_db_write_at: Option<String>,
    pub last_db_error_at: Option<String>,
    pub db_write_latency_ms_last: Option<f64>,
    pub db_write_latency_ms_avg: Option<f64>,
}

/// Shared, thread-safe worker bookkeeping: lifecycle state, recent
/// message/error log, and run/write metrics.
///
/// Each protocol worker holds an `Arc<WorkerShared>`, cloned into its run
/// loop task, so status can be read from the API layer while the loop runs.
pub struct WorkerShared {
    connection_id: i64,
    connection_name: String,
    state: RwLock<WorkerState>,
    last_error: Mutex<Option<String>>,
    messages: Mutex<RingBuffer<String>>,
    errors: Mutex<RingBuffer<String>>,
    runs_total: Mutex<u64>,
    started_at: Mutex<Option<String>>,
    stopped_at: Mutex<Option<String>>,
    errors_total: Mutex<u64>,
    consecutive_errors: Mutex<u64>,
    last_error_at: Mutex<Option<String>>,
    messages_total: Mutex<u64>,
    last_message_at: Mutex<Option<String>>,
    db_writes_total: Mutex<u64>,
    db_write_fail_total: Mutex<u64>,
    last_db_write_at: Mutex<Option<String>>,
    last_db_error_at: Mutex<Option<String>>,
    db_write_latency: Mutex<EmaLatency>,
}

impl WorkerShared {
    pub fn new(connection_id: i64, connection_name: impl Into<String>) -> Self {
        Self {
            connection_id,
            connection_name: connection_name.into(),
            state: RwLock::new(WorkerState::Created),
            last_error: Mutex::new(None),
            messages: Mutex::new(RingBuffer::new(MESSAGE_BUFFER_CAPACITY)),
            errors: Mutex::new(RingBuffer::new(ERROR_BUFFER_CAPACITY)),
            runs_total: Mutex::new(0),
            started_at: Mutex::new(None),
            stopped_at: Mutex::new(None),
            errors_total: Mutex::new(0),
            consecutive_errors: Mutex::new(0),
            last_error_at: Mutex::new(None),
            messages_total: Mutex::new(0),
            last_message_at: Mutex::new(None),
            db_writes_total: Mutex::new(0),
            db_write_fail_total: Mutex::new(0),
            last_db_write_at: Mutex::new(None),
            last_db_error_at: Mutex::new(None),
            db_write_latency: Mutex::new(EmaLatency::new()),
        }
    }

    pub fn connection_id(&self) -> i64 {
        self.connection_id
    }

    pub fn connection_name(&self) -> &str {
        &self.connection_name
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read()
    }

    pub fn set_state(&self, state: WorkerState) {
        *self.state.write() = state;
    }

    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Record a run starting: bumps `runs_total`, stamps `started_at`, and
    /// clears `stopped_at`.
    pub fn record_run_started(&self) {
        *self.runs_total.lock() += 1;
        *self.started_at.lock() = Some(format_local(Local::now()));
        *self.stopped_at.lock() = None;
    }

    /// Record a run stopping: stamps `stopped_at`. Always called from the
    /// run loop's cleanup path, regardless of why the loop exited.
    pub fn record_stopped(&self) {
        *self.stopped_at.lock() = Some(format_local(Local::now()));
    }

    /// Append a message to the rolling log, bump `messages_total`, and emit
    /// a structured tracing event.
    pub fn log_message(&self, message: impl Into<String>) {
        let message = message.into();
        let now = format_local(Local::now());
        self.messages.lock().push(format!("{now} — {message}"));
        *self.messages_total.lock() += 1;
        *self.last_message_at.lock() = Some(now);
        tracing::info!(connection_id = self.connection_id, "{message}");
    }

    /// Record an error: append to the rolling error log, bump error
    /// counters, and emit a structured tracing warning.
    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        let now = format_local(Local::now());
        self.errors.lock().push(format!("{now} — {message}"));
        *self.errors_total.lock() += 1;
        *self.consecutive_errors.lock() += 1;
        *self.last_error_at.lock() = Some(now);
        *self.last_error.lock() = Some(message.clone());
        tracing::warn!(connection_id = self.connection_id, "{message}");
    }

    /// Reset the consecutive-error streak after a clean iteration.
    pub fn clear_consecutive_errors(&self) {
        *self.consecutive_errors.lock() = 0;
    }

    pub fn record_db_write_ok(&self, latency_ms: f64) {
        *self.db_writes_total.lock() += 1;
        let now = format_local(Local::now());
        *self.last_db_write_at.lock() = Some(now);
        self.db_write_latency.lock().observe(latency_ms);
    }

    pub fn record_db_write_fail(&self) {
        *self.db_write_fail_total.lock() += 1;
        *self.last_db_error_at.lock() = Some(format_local(Local::now()));
    }

    pub fn recent_messages(&self, limit: Option<usize>) -> Vec<String> {
        self.messages.lock().recent(limit)
    }

    pub fn recent_errors(&self, limit: Option<usize>) -> Vec<String> {
        self.errors.lock().recent(limit)
    }

    /// Snapshot the current counters for a runtime-status API response.
    pub fn core_metrics(&self) -> CoreMetrics {
        let latency = self.db_write_latency.lock();
        CoreMetrics {
            runs_total: *self.runs_total.lock(),
            started_at: self.started_at.lock().clone(),
            stopped_at: self.stopped_at.lock().clone(),
            errors_total: *self.errors_total.lock(),
            consecutive_errors: *self.consecutive_errors.lock(),
            last_error_at: self.last_error_at.lock().clone(),
            messages_total: *self.messages_total.lock(),
            last_message_at: self.last_message_at.lock().clone(),
            db_writes_total: *self.db_writes_total.lock(),
            db_write_fail_total: *self.db_write_fail_total.lock(),
            last_db_write_at: self.last_db_write_at.lock().clone(),
            last_db_error_at: self.last_db_error_at.lock().clone(),
            db_write_latency_ms_last: latency.last(),
            db_write_latency_ms_avg: latency.avg(),
        }
    }
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
