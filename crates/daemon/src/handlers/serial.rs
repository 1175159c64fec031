// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serial port discovery and connectivity probing.

use axum::Json;
use serde::{Deserialize, Serialize};
use ulog_adapters::serial::{available_ports, SerialPortAdapter, SerialPortDescriptor, TokioSerialAdapter};
use ulog_storage::config::SerialPortSettings;

use crate::error::ApiError;
use crate::response::{ok, Envelope};

pub async fn available() -> Result<Json<Envelope<Vec<SerialPortDescriptor>>>, ApiError> {
    let ports = available_ports().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(ok(ports))
}

#[derive(Serialize)]
pub struct SerialTestResult {
    pub opened: bool,
}

pub async fn test(
    Json(settings): Json<SerialPortSettings>,
) -> Result<Json<Envelope<SerialTestResult>>, ApiError> {
    let port_settings = ulog_engine::to_port_settings(&settings);
    match TokioSerialAdapter::open(&port_settings).await {
        Ok(mut opened) => {
            opened.close().await;
            Ok(ok(SerialTestResult { opened: true }))
        }
        Err(e) => Err(ApiError::BadRequest(e.to_string())),
    }
}

#[cfg(test)]
#[path = "serial_tests.rs"]
mod tests;
