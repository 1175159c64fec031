// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ulog-daemon`: the HTTP API surface over the connection runtime. Wires
//! every endpoint described for the `/logger` API to its handler and serves
//! them behind a shared [`state::AppState`].

pub mod convert;
pub mod env;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod registry;
pub mod response;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

use state::AppState;

/// Build the full router. Split out from `main` so integration tests can
/// drive the API without binding a real socket.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/logger/health", get(handlers::health::health))
        .route(
            "/logger/connections",
            get(handlers::connections::list).post(handlers::connections::create),
        )
        .route(
            "/logger/connections/:id",
            get(handlers::connections::get)
                .put(handlers::connections::update)
                .delete(handlers::connections::delete),
        )
        .route(
            "/logger/connections/runtime/:id/status",
            get(handlers::runtime::status),
        )
        .route(
            "/logger/connections/runtime/:id/start",
            post(handlers::runtime::start),
        )
        .route(
            "/logger/connections/runtime/:id/stop",
            post(handlers::runtime::stop),
        )
        .route(
            "/logger/connections/runtime/:id/restart",
            post(handlers::runtime::restart),
        )
        .route(
            "/logger/connections/runtime/:id/logs",
            get(handlers::runtime::logs),
        )
        .route(
            "/logger/connections/runtime/:id/metrics",
            get(handlers::runtime::metrics),
        )
        .route(
            "/logger/mbox/:id/start-command",
            post(handlers::mbox::start_command),
        )
        .route(
            "/logger/mbox/available-counters",
            get(handlers::mbox::available_counters),
        )
        .route("/logger/serial-ports/available", get(handlers::serial::available))
        .route("/logger/serial-ports/test", post(handlers::serial::test))
        .route(
            "/logger/easy-serial/parser/test",
            post(handlers::easy_serial::test),
        )
        .route(
            "/logger/db/settings",
            get(handlers::db::get).post(handlers::db::save),
        )
        .with_state(state)
}
