// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ulogd — industrial data-logging daemon.
//!
//! Serves the `/logger` HTTP API over the connection runtime: loads the
//! settings document, registers and autostarts connections, then listens
//! until a termination signal drains every worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use ulog_daemon::state::AppState;
use ulog_daemon::{env, logging, registry, router};
use ulog_engine::ConnectionRuntimeManager;
use ulog_storage::SettingsStore;

/// Bound on how long graceful shutdown waits for in-flight worker loops to
/// notice the stop signal and return.
const SHUTDOWN_JOIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("ulogd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("ulogd {}", env!("CARGO_PKG_VERSION"));
                println!("Industrial data-logging daemon, serving the /logger HTTP API.");
                println!();
                println!("USAGE:");
                println!("    ulogd");
                println!();
                println!("ENV:");
                println!("    APP_PORT             HTTP port (default 8000)");
                println!("    ULOG_SETTINGS_PATH   Path to app_settings.json");
                println!("    RUST_LOG / ULOG_LOG  Tracing filter (default info)");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("usage: ulogd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let _log_guard = logging::init();
    info!("starting ulogd");

    let settings = Arc::new(SettingsStore::new(env::settings_path()));
    let manager = Arc::new(ConnectionRuntimeManager::new());

    registry::register_all(&manager, &settings).await;

    let app = router(AppState::new(Arc::clone(&manager), Arc::clone(&settings)));
    let port = env::app_port();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "listening");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = sigint.recv() => {}
            }
            info!("shutdown signal received, draining workers");
        })
        .await?;

    manager.shutdown_all(Some(SHUTDOWN_JOIN_TIMEOUT)).await;
    info!("ulogd stopped");
    Ok(())
}
