// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for worker execution and runtime management.

use thiserror::Error;

/// Errors surfaced by a single connection worker's run loop or command API.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("{0} config is required for this connection type")]
    MissingConfig(&'static str),
    #[error("device is not open")]
    DeviceNotOpen,
    #[error("device open failed: {0}")]
    OpenFailed(String),
    #[error("device I/O error: {0}")]
    Io(String),
    #[error("poll timed out waiting for a response")]
    Timeout,
    #[error("database write failed: {0}")]
    DbWrite(String),
}

/// Errors surfaced by the runtime manager.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("connection id {0} is not registered")]
    NotRegistered(i64),
    #[error("connection config must have an id to register")]
    MissingId,
    #[error("{0}")]
    Worker(#[from] WorkerError),
}
