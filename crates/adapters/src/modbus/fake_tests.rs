// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn reads_back_configured_registers() {
    let mut transport = FakeModbusTransport::new();
    transport.set_register(1, 100, 0x1234);
    transport.set_register(1, 101, 0x5678);
    let regs = transport.read_holding_registers(1, 100, 2).await.unwrap();
    assert_eq!(regs, vec![0x1234, 0x5678]);
}

#[tokio::test]
async fn unset_registers_default_to_zero() {
    let mut transport = FakeModbusTransport::new();
    let regs = transport.read_holding_registers(2, 0, 3).await.unwrap();
    assert_eq!(regs, vec![0, 0, 0]);
}

#[tokio::test]
async fn fail_next_read_forces_one_error() {
    let mut transport = FakeModbusTransport::new();
    transport.fail_next_read();
    assert!(transport.read_holding_registers(1, 0, 1).await.is_err());
    assert!(transport.read_holding_registers(1, 0, 1).await.is_ok());
}
