// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn read_returns_queued_bytes() {
    let mut port = FakeSerialPort::new();
    port.push_inbound(b"hello");
    let read = port.read(10).await.unwrap();
    assert_eq!(read, b"hello");
}

#[tokio::test]
async fn write_is_recorded() {
    let mut port = FakeSerialPort::new();
    port.write(b"ping").await.unwrap();
    assert_eq!(port.written(), b"ping");
}

#[tokio::test]
async fn close_marks_port_closed() {
    let mut port = FakeSerialPort::new();
    port.close().await;
    assert!(port.is_closed());
}
