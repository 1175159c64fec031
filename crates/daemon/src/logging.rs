// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup: a rolling file appender plus an `EnvFilter`
//! driven by [`crate::env::log_filter`].

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the global `tracing` subscriber. The returned guard must be
/// held for the life of the process — dropping it stops the non-blocking
/// writer from flushing.
pub fn init() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = crate::env::log_dir();
    let _ = std::fs::create_dir_all(&log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, "ulogd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_new(crate::env::log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    guard
}
