// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared timestamp formatting.
//!
//! The two formats in this module are intentionally distinct: log/metric
//! buffer entries use `DD-MM-YYYY HH:MM:SS`, while mbox miss-pack records use
//! `%Y-%m-%d %H:%M:%S`. Both come directly from the system being ported and
//! must not be unified.

use chrono::{DateTime, Local};

/// Format a timestamp as `DD-MM-YYYY HH:MM:SS`, used for worker log/error
/// ring buffer entries.
pub fn format_local(ts: DateTime<Local>) -> String {
    ts.format("%d-%m-%Y %H:%M:%S").to_string()
}

/// Format a timestamp as `%Y-%m-%d %H:%M:%S`, used for the `created_at`
/// field of synthetic mbox miss-pack records.
pub fn format_mbox_timestamp(ts: DateTime<Local>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
