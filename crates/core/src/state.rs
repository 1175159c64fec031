// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker lifecycle state.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a connection worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Created,
    Running,
    Stopping,
    Stopped,
    Error,
}

impl WorkerState {
    pub fn is_running(&self) -> bool {
        matches!(self, WorkerState::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerState::Stopped | WorkerState::Error)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
