// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ulog-adapters: device-facing traits plus real and fake implementations.

pub mod modbus;
pub mod serial;

pub use modbus::{ModbusError, ModbusTransport};
pub use serial::{available_ports, PortSettings, SerialError, SerialPortAdapter, SerialPortDescriptor};
