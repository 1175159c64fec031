// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime status, start/stop/restart, logs, and metrics for a registered
//! connection.

use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use ulog_core::WorkerState;
use ulog_engine::CoreMetrics;

use crate::error::ApiError;
use crate::response::{ok, Envelope};
use crate::state::AppState;

const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct StatusResponse {
    pub state: WorkerState,
}

pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<StatusResponse>>, ApiError> {
    let worker_state = state.manager.get_state(id).ok_or(ApiError::NotRegistered(id))?;
    Ok(ok(StatusResponse { state: worker_state }))
}

pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.manager.start_connection(id)?;
    Ok(ok(()))
}

pub async fn stop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.manager.stop_connection(id)?;
    Ok(ok(()))
}

pub async fn restart(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.manager.stop_connection(id)?;
    state.manager.join_connection(id, Some(STOP_JOIN_TIMEOUT)).await?;
    state.manager.start_connection(id)?;
    Ok(ok(()))
}

#[derive(Deserialize)]
pub struct LogsQuery {
    messages_limit: Option<usize>,
    errors_limit: Option<usize>,
}

#[derive(Serialize)]
pub struct LogsResponse {
    pub messages: Vec<String>,
    pub errors: Vec<String>,
}

pub async fn logs(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Envelope<LogsResponse>>, ApiError> {
    let worker = state.manager.get_worker(id).ok_or(ApiError::NotRegistered(id))?;
    let shared = worker.shared();
    Ok(ok(LogsResponse {
        messages: shared.recent_messages(query.messages_limit),
        errors: shared.recent_errors(query.errors_limit),
    }))
}

pub async fn metrics(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<CoreMetrics>>, ApiError> {
    let worker = state.manager.get_worker(id).ok_or(ApiError::NotRegistered(id))?;
    Ok(ok(worker.shared().core_metrics()))
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
