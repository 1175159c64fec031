// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake Modbus transport for testing.
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ModbusError, ModbusTransport};

/// A fake transport backed by an in-memory register map keyed by
/// `(slave_id, address)`.
#[derive(Clone, Default)]
pub struct FakeModbusTransport {
    registers: Arc<Mutex<HashMap<(u8, u16), u16>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl FakeModbusTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_register(&self, slave_id: u8, address: u16, value: u16) {
        self.registers.lock().insert((slave_id, address), value);
    }

    pub fn fail_next_read(&self) {
        *self.fail_next.lock() = true;
    }
}

#[async_trait]
impl ModbusTransport for FakeModbusTransport {
    async fn read_holding_registers(
        &mut self,
        slave_id: u8,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, ModbusError> {
        if std::mem::take(&mut *self.fail_next.lock()) {
            return Err(ModbusError::Exception("forced failure".to_string()));
        }
        let registers = self.registers.lock();
        let mut out = Vec::with_capacity(count as usize);
        for i in 0..count {
            out.push(*registers.get(&(slave_id, address + i)).unwrap_or(&0));
        }
        Ok(out)
    }

    async fn close(&mut self) {}
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
