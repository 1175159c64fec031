// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mbox-specific operations: the device start-label command, and listing
//! the counter devices available to bind an `ext_counter` mbox connection
//! to.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use ulog_storage::config::ConnectionType;

use crate::error::ApiError;
use crate::response::{ok, Envelope};
use crate::state::AppState;

pub async fn start_command(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.manager.send_start_command(id)?;
    Ok(ok(()))
}

#[derive(Serialize)]
pub struct AvailableCounter {
    pub connection_id: i64,
    pub connection_name: String,
    pub device_id: i64,
    pub device_name: String,
}

pub async fn available_counters(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<AvailableCounter>>>, ApiError> {
    let connections = state.settings.get_connections()?;
    let mut counters = Vec::new();
    for connection in connections {
        let ConnectionType::MboxCounter(cfg) = &connection.kind else {
            continue;
        };
        let Some(connection_id) = connection.id else { continue };
        for device in &cfg.devices {
            counters.push(AvailableCounter {
                connection_id,
                connection_name: connection.name.clone(),
                device_id: device.device_id,
                device_name: device.name.clone(),
            });
        }
    }
    Ok(ok(counters))
}

#[cfg(test)]
#[path = "mbox_tests.rs"]
mod tests;
