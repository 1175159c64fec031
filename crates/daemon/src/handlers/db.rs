// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Global database connection settings.

use axum::extract::State;
use axum::Json;
use ulog_storage::DbSettings;

use crate::error::ApiError;
use crate::response::{ok, Envelope};
use crate::state::AppState;

pub async fn get(State(state): State<AppState>) -> Result<Json<Envelope<DbSettings>>, ApiError> {
    Ok(ok(state.settings.get_db_settings()?))
}

pub async fn save(
    State(state): State<AppState>,
    Json(db): Json<DbSettings>,
) -> Result<Json<Envelope<DbSettings>>, ApiError> {
    Ok(ok(state.settings.save_db_settings(db)?))
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
