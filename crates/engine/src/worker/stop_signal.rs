// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An interruptible stop flag, mirroring a Python `threading.Event`'s
//! `wait(timeout)` semantics in async form.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

#[derive(Default)]
pub struct StopSignal {
    flag: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleep for `dur` unless stopped first. Returns `true` if a stop was
    /// requested before or during the wait.
    pub async fn wait(&self, dur: Duration) -> bool {
        if self.is_stopped() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(dur) => self.is_stopped(),
            _ = self.notify.notified() => true,
        }
    }
}

#[cfg(test)]
#[path = "stop_signal_tests.rs"]
mod tests;
