// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn health_reports_ok() {
    let Json(body) = health().await;
    assert_eq!(body.status, "ok");
}
