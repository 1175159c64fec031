// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

const DEFAULT_APP_PORT: u16 = 8000;
const DEFAULT_SETTINGS_PATH: &str = "backend/config/app_settings.json";
const DEFAULT_LOG_FILTER: &str = "info";

/// HTTP bind port, from `APP_PORT`. Falls back to `8000` if unset or
/// unparsable.
pub fn app_port() -> u16 {
    std::env::var("APP_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_APP_PORT)
}

/// Settings document path, from `ULOG_SETTINGS_PATH`. Falls back to
/// `backend/config/app_settings.json`, relative to the process's working
/// directory.
pub fn settings_path() -> PathBuf {
    std::env::var("ULOG_SETTINGS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH))
}

/// Tracing filter directive, from `RUST_LOG` or (failing that) `ULOG_LOG`.
/// Falls back to `"info"`.
pub fn log_filter() -> String {
    std::env::var("RUST_LOG")
        .or_else(|_| std::env::var("ULOG_LOG"))
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}

/// Directory the rolling log file lives in, derived from the settings path's
/// parent so the daemon doesn't need a separate env var for it.
pub fn log_dir() -> PathBuf {
    settings_path()
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
