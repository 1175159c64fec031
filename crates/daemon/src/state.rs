// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared application state handed to every axum handler.

use std::sync::Arc;

use ulog_engine::ConnectionRuntimeManager;
use ulog_storage::SettingsStore;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ConnectionRuntimeManager>,
    pub settings: Arc<SettingsStore>,
}

impl AppState {
    pub fn new(manager: Arc<ConnectionRuntimeManager>, settings: Arc<SettingsStore>) -> Self {
        Self { manager, settings }
    }
}
