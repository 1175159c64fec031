// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime manager: owns one worker per registered connection, starts and
//! stops their background tasks, and answers status/metrics queries for the
//! HTTP layer.
//!
//! Workers are held behind a closed-set [`Worker`] enum rather than a
//! `Box<dyn Trait>` — the manager needs to do protocol-specific things (only
//! `mbox_counter` exposes [`get_total`](Worker::get_total)) that a single
//! object-safe interface would otherwise have to fake with downcasting.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use ulog_core::WorkerState;
use ulog_storage::config::ConnectionType;
use ulog_storage::db::DbWriter;
use ulog_storage::ConnectionConfig;

use crate::error::{ManagerError, WorkerError};
use crate::worker::easy_serial::EasySerialWorker;
use crate::worker::mbox::{CounterTotalProvider, MboxWorker};
use crate::worker::mbox_counter::MboxCounterWorker;
use crate::worker::modbus_rtu::ModbusRtuWorker;
use crate::worker::modbus_tcp::ModbusTcpWorker;
use crate::worker::WorkerShared;

/// One worker, tagged by protocol. Each variant is built with its
/// production transport/connector type; tests exercise the protocol workers
/// directly rather than through this enum.
pub enum Worker {
    EasySerial(Arc<EasySerialWorker>),
    Mbox(Arc<MboxWorker>),
    MboxCounter(Arc<MboxCounterWorker>),
    ModbusRtu(Arc<ModbusRtuWorker>),
    ModbusTcp(Arc<ModbusTcpWorker>),
}

impl Worker {
    pub fn shared(&self) -> &Arc<WorkerShared> {
        match self {
            Worker::EasySerial(w) => &w.shared,
            Worker::Mbox(w) => &w.shared,
            Worker::MboxCounter(w) => &w.shared,
            Worker::ModbusRtu(w) => &w.shared,
            Worker::ModbusTcp(w) => &w.shared,
        }
    }

    pub fn request_stop(&self) {
        match self {
            Worker::EasySerial(w) => w.request_stop(),
            Worker::Mbox(w) => w.request_stop(),
            Worker::MboxCounter(w) => w.request_stop(),
            Worker::ModbusRtu(w) => w.request_stop(),
            Worker::ModbusTcp(w) => w.request_stop(),
        }
    }

    /// Only meaningful for `mbox_counter` connections; every other protocol
    /// has nothing to report and returns `None`.
    pub fn get_total(&self, device_id: i64) -> Option<u32> {
        match self {
            Worker::MboxCounter(w) => w.get_total(device_id),
            _ => None,
        }
    }

    /// Only meaningful for `mbox` connections; every other protocol has no
    /// device command to send.
    pub fn send_start_command(&self) -> Result<(), WorkerError> {
        match self {
            Worker::Mbox(w) => w.request_start_command(),
            _ => Err(WorkerError::MissingConfig("mbox")),
        }
    }

    async fn run(&self) -> Result<(), WorkerError> {
        match self {
            Worker::EasySerial(w) => w.run().await,
            Worker::Mbox(w) => w.run().await,
            Worker::MboxCounter(w) => w.run().await,
            Worker::ModbusRtu(w) => w.run().await,
            Worker::ModbusTcp(w) => w.run().await,
        }
    }
}

/// Reaches back into the manager (via a weak reference, to avoid an
/// `Arc` cycle) to read an `mbox_counter` worker's running total on behalf
/// of an `mbox` worker configured with `ext_counter = true`. Replaces the
/// original's `getattr(worker, "get_total", None)` duck typing with a
/// closed-set lookup through [`Worker::get_total`].
struct ManagerCounterProvider(Weak<ConnectionRuntimeManager>);

impl CounterTotalProvider for ManagerCounterProvider {
    fn total(&self, connection_id: i64, device_id: i64) -> Option<u32> {
        self.0.upgrade()?.counter_total(connection_id, device_id)
    }
}

struct RegisteredWorker {
    worker: Arc<Worker>,
    handle: Mutex<Option<JoinHandle<Result<(), WorkerError>>>>,
}

/// Registry of running connection workers, keyed by connection id.
#[derive(Default)]
pub struct ConnectionRuntimeManager {
    workers: Mutex<HashMap<i64, RegisteredWorker>>,
}

impl ConnectionRuntimeManager {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Build and register a worker for `connection`, without starting it.
    /// Idempotent per id: if a worker is already registered for it, this is
    /// a no-op that returns the existing worker rather than replacing it.
    /// Re-registering a running connection must not orphan its live
    /// `JoinHandle` or reset it back to `Created`. Callers that want to
    /// replace a registered connection's worker (e.g. the HTTP `PUT` path)
    /// must stop+join+unregister it first.
    pub fn register_connection(
        self: &Arc<Self>,
        connection: ConnectionConfig,
        db_writer: Option<Arc<dyn DbWriter>>,
    ) -> Result<Arc<Worker>, ManagerError> {
        let id = connection.id.ok_or(ManagerError::MissingId)?;
        let mut workers = self.workers.lock();
        if let Some(existing) = workers.get(&id) {
            return Ok(Arc::clone(&existing.worker));
        }
        let worker = Arc::new(self.build_worker(connection, db_writer));
        workers.insert(
            id,
            RegisteredWorker {
                worker: Arc::clone(&worker),
                handle: Mutex::new(None),
            },
        );
        Ok(worker)
    }

    fn build_worker(
        self: &Arc<Self>,
        connection: ConnectionConfig,
        db_writer: Option<Arc<dyn DbWriter>>,
    ) -> Worker {
        match connection.kind.clone() {
            ConnectionType::EasySerial(cfg) => {
                Worker::EasySerial(Arc::new(EasySerialWorker::new(connection, cfg, db_writer)))
            }
            ConnectionType::Mbox(cfg) => {
                let counter_provider: Option<Arc<dyn CounterTotalProvider>> = if cfg.ext_counter {
                    Some(Arc::new(ManagerCounterProvider(Arc::downgrade(self))))
                } else {
                    None
                };
                Worker::Mbox(Arc::new(MboxWorker::new(
                    connection,
                    cfg,
                    db_writer,
                    counter_provider,
                )))
            }
            ConnectionType::MboxCounter(cfg) => {
                Worker::MboxCounter(Arc::new(MboxCounterWorker::new(connection, cfg)))
            }
            ConnectionType::ModbusRtu(cfg) => {
                Worker::ModbusRtu(Arc::new(ModbusRtuWorker::new(connection, cfg, db_writer)))
            }
            ConnectionType::ModbusTcp(cfg) => {
                Worker::ModbusTcp(Arc::new(ModbusTcpWorker::new(connection, cfg, db_writer)))
            }
        }
    }

    /// Start the registered worker for `id`, spawning its run loop as a
    /// background task. A no-op if it is already running.
    pub fn start_connection(&self, id: i64) -> Result<(), ManagerError> {
        let workers = self.workers.lock();
        let registered = workers.get(&id).ok_or(ManagerError::NotRegistered(id))?;
        if registered.worker.shared().is_running() {
            return Ok(());
        }

        let worker = Arc::clone(&registered.worker);
        worker.shared().set_state(WorkerState::Running);
        let handle = tokio::spawn(async move { worker.run().await });
        *registered.handle.lock() = Some(handle);
        Ok(())
    }

    /// Signal the registered worker for `id` to stop. Does not block for the
    /// run loop to actually exit; call [`join_connection`](Self::join_connection) for that.
    pub fn stop_connection(&self, id: i64) -> Result<(), ManagerError> {
        let workers = self.workers.lock();
        let registered = workers.get(&id).ok_or(ManagerError::NotRegistered(id))?;
        registered.worker.request_stop();
        Ok(())
    }

    /// Wait for the registered worker's background task to finish, up to
    /// `timeout` (or indefinitely if `None`).
    pub async fn join_connection(
        &self,
        id: i64,
        timeout: Option<Duration>,
    ) -> Result<(), ManagerError> {
        let handle = {
            let workers = self.workers.lock();
            let registered = workers.get(&id).ok_or(ManagerError::NotRegistered(id))?;
            registered.handle.lock().take()
        };
        let Some(handle) = handle else {
            return Ok(());
        };

        let joined = match timeout {
            Some(d) => tokio::time::timeout(d, handle).await.ok(),
            None => Some(handle.await),
        };
        match joined {
            Some(Ok(Ok(()))) | None => Ok(()),
            Some(Ok(Err(e))) => Err(ManagerError::Worker(e)),
            Some(Err(_join_err)) => Ok(()),
        }
    }

    pub fn unregister_connection(&self, id: i64) {
        self.workers.lock().remove(&id);
    }

    pub fn get_worker(&self, id: i64) -> Option<Arc<Worker>> {
        self.workers.lock().get(&id).map(|r| Arc::clone(&r.worker))
    }

    pub fn get_state(&self, id: i64) -> Option<WorkerState> {
        self.workers.lock().get(&id).map(|r| r.worker.shared().state())
    }

    /// Send the mbox start-label command to a registered mbox connection's
    /// open device. Fails if the connection is unregistered, not an mbox
    /// connection, or its port is not currently open.
    pub fn send_start_command(&self, id: i64) -> Result<(), ManagerError> {
        let workers = self.workers.lock();
        let registered = workers.get(&id).ok_or(ManagerError::NotRegistered(id))?;
        registered.worker.send_start_command()?;
        Ok(())
    }

    fn counter_total(&self, connection_id: i64, device_id: i64) -> Option<u32> {
        self.workers
            .lock()
            .get(&connection_id)?
            .worker
            .get_total(device_id)
    }

    /// Request every registered worker to stop, then wait for each to
    /// finish (bounded by `timeout` per worker).
    pub async fn shutdown_all(&self, timeout: Option<Duration>) {
        let ids: Vec<i64> = self.workers.lock().keys().copied().collect();
        for id in &ids {
            let _ = self.stop_connection(*id);
        }
        for id in &ids {
            let _ = self.join_connection(*id, timeout).await;
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
