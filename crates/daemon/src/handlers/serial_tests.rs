// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn available_ports_lists_without_erroring() {
    let result = available().await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_port_fails_fast_for_a_nonexistent_device() {
    let settings = SerialPortSettings {
        port: "/dev/does-not-exist-ulog-test".to_string(),
        ..SerialPortSettings::default()
    };
    let result = test(Json(settings)).await;
    assert!(result.is_err());
}
