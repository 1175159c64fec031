// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CRUD over the connection list, plus the `PUT` restart-in-place semantics
//! described in §6.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::Json;
use ulog_core::WorkerState;
use ulog_storage::ConnectionConfig;

use crate::error::ApiError;
use crate::registry;
use crate::response::{ok, Envelope};
use crate::state::AppState;

/// Bound on how long a `PUT`/`DELETE` waits for the previous worker to
/// actually stop before proceeding.
const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<ConnectionConfig>>>, ApiError> {
    let connections = state.settings.get_connections()?;
    Ok(ok(connections))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<ConnectionConfig>>, ApiError> {
    let connection = state
        .settings
        .get_connection(id)?
        .ok_or(ApiError::ConnectionNotFound(id))?;
    Ok(ok(connection))
}

pub async fn create(
    State(state): State<AppState>,
    Json(connection): Json<ConnectionConfig>,
) -> Result<Json<Envelope<ConnectionConfig>>, ApiError> {
    if !connection.is_valid() {
        return Err(ApiError::BadRequest(
            "connection config is not valid for its type".to_string(),
        ));
    }
    let autostart = connection.autostart;
    let saved = state.settings.upsert_connection(connection)?;
    let id = saved.id.ok_or_else(|| ApiError::BadRequest("store did not assign an id".to_string()))?;

    let db = state.settings.get_db_settings()?;
    registry::register_connection(&state.manager, &db, saved.clone()).await?;
    if autostart {
        state.manager.start_connection(id)?;
    }
    Ok(ok(saved))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut connection): Json<ConnectionConfig>,
) -> Result<Json<Envelope<ConnectionConfig>>, ApiError> {
    state
        .settings
        .get_connection(id)?
        .ok_or(ApiError::ConnectionNotFound(id))?;
    connection.id = Some(id);
    if !connection.is_valid() {
        return Err(ApiError::BadRequest(
            "connection config is not valid for its type".to_string(),
        ));
    }

    let was_running = state
        .manager
        .get_state(id)
        .map(|s| s == WorkerState::Running)
        .unwrap_or(false);

    state.manager.stop_connection(id).ok();
    state.manager.join_connection(id, Some(STOP_JOIN_TIMEOUT)).await.ok();
    state.manager.unregister_connection(id);

    let autostart = connection.autostart;
    let saved = state.settings.upsert_connection(connection)?;

    let db = state.settings.get_db_settings()?;
    registry::register_connection(&state.manager, &db, saved.clone()).await?;
    if was_running || autostart {
        state.manager.start_connection(id)?;
    }
    Ok(ok(saved))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.manager.stop_connection(id).ok();
    state.manager.join_connection(id, Some(STOP_JOIN_TIMEOUT)).await.ok();
    state.manager.unregister_connection(id);

    let deleted = state.settings.delete_connection(id)?;
    if !deleted {
        return Err(ApiError::ConnectionNotFound(id));
    }
    Ok(ok(()))
}

#[cfg(test)]
#[path = "connections_tests.rs"]
mod tests;
