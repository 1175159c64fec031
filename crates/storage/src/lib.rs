// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ulog-storage: the settings document and the per-connection DB writer.

pub mod config;
pub mod db;
pub mod settings;

pub use config::{AppSettings, ConnectionConfig, ConnectionType, DbSettings};
pub use db::{DbWriter, DbWriterError, SqlxDbWriter};
pub use settings::{SettingsError, SettingsStore};

#[cfg(any(test, feature = "test-support"))]
pub use db::FakeDbWriter;
