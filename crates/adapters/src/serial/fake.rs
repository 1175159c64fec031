// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake serial port adapter for testing.
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{PortSettings, SerialError, SerialPortAdapter};

/// Shared inner state so a test can push bytes in and inspect writes out
/// after the adapter has been handed off to a worker.
#[derive(Default)]
struct Inner {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
    closed: bool,
}

/// A fake serial port whose read/write behavior is controlled by the test.
#[derive(Clone)]
pub struct FakeSerialPort {
    inner: Arc<Mutex<Inner>>,
}

impl Default for FakeSerialPort {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }
}

impl FakeSerialPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes to be returned by subsequent `read` calls.
    pub fn push_inbound(&self, data: &[u8]) {
        self.inner.lock().inbound.extend(data);
    }

    /// Bytes written by the worker so far.
    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().outbound.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

#[async_trait]
impl SerialPortAdapter for FakeSerialPort {
    async fn open(_settings: &PortSettings) -> Result<Self, SerialError> {
        Ok(Self::new())
    }

    async fn read(&mut self, max_len: usize) -> Result<Vec<u8>, SerialError> {
        let mut inner = self.inner.lock();
        let n = inner.inbound.len().min(max_len);
        Ok(inner.inbound.drain(..n).collect())
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), SerialError> {
        self.inner.lock().outbound.extend_from_slice(data);
        Ok(())
    }

    async fn close(&mut self) {
        self.inner.lock().closed = true;
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
