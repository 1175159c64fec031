// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP-facing error type: every handler returns `Result<T, ApiError>`, and
//! `ApiError` knows how to render itself into the `{success, data, error}`
//! envelope with the right status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use ulog_engine::{ManagerError, WorkerError};
use ulog_protocol::TemplateError;
use ulog_storage::{DbWriterError, SettingsError};

/// Every configuration-or-request-level failure the HTTP layer surfaces.
/// Per-connection runtime failures (device, protocol, DB write errors) never
/// reach here — they are observed through the status/logs/metrics endpoints
/// instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("connection {0} not found")]
    ConnectionNotFound(i64),
    #[error("a connection named '{0}' already exists")]
    NameAlreadyExists(String),
    #[error("connection {0} is not registered")]
    NotRegistered(i64),
    #[error("invalid query template: {0}")]
    Template(#[from] TemplateError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("database error: {0}")]
    Db(#[from] DbWriterError),
    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),
    #[error("{0}")]
    BadRequest(String),
}

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::NotRegistered(id) => ApiError::NotRegistered(id),
            ManagerError::MissingId => ApiError::BadRequest(err.to_string()),
            ManagerError::Worker(e) => ApiError::Worker(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    data: Option<()>,
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::ConnectionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NameAlreadyExists(_) => StatusCode::BAD_REQUEST,
            ApiError::NotRegistered(_) => StatusCode::CONFLICT,
            ApiError::Template(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Settings(SettingsError::NameAlreadyExists(_)) => StatusCode::BAD_REQUEST,
            ApiError::Settings(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorEnvelope {
            success: false,
            data: None,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
