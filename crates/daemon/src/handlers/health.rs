// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness probe. Returns the bare `{"status": "ok"}` body rather than the
//! standard envelope, since callers hitting this endpoint are health-check
//! tooling, not the API client.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
