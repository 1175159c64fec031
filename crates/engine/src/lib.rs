// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection worker runtime: one background task per configured
//! connection, each framing/parsing its protocol's wire format and writing
//! records to the database, coordinated by [`manager::ConnectionRuntimeManager`].

pub mod error;
pub mod manager;
pub mod worker;

pub use error::{ManagerError, WorkerError};
pub use manager::{ConnectionRuntimeManager, Worker};
pub use worker::easy_serial::EasySerialWorker;
pub use worker::mbox::{CounterTotalProvider, MboxWorker};
pub use worker::mbox_counter::MboxCounterWorker;
pub use worker::modbus_rtu::ModbusRtuWorker;
pub use worker::modbus_tcp::ModbusTcpWorker;
pub use worker::{to_port_settings, CoreMetrics, StopSignal, WorkerShared};
