// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `{success, data, error}` response envelope shared by every handler.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    pub error: Option<String>,
}

/// Wrap a successful payload in the standard envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
        error: None,
    })
}
