// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_worker_starts_in_created_state_with_empty_metrics() {
    let shared = WorkerShared::new(7, "press-1");
    assert_eq!(shared.state(), WorkerState::Created);
    assert!(!shared.is_running());
    assert_eq!(shared.connection_id(), 7);
    assert_eq!(shared.connection_name(), "press-1");
    let metrics = shared.core_metrics();
    assert_eq!(metrics.runs_total, 0);
    assert!(metrics.started_at.is_none());
}

#[test]
fn record_run_started_bumps_runs_total_and_stamps_started_at() {
    let shared = WorkerShared::new(1, "conn");
    shared.record_run_started();
    let metrics = shared.core_metrics();
    assert_eq!(metrics.runs_total, 1);
    assert!(metrics.started_at.is_some());
    assert!(metrics.stopped_at.is_none());

    shared.record_stopped();
    assert!(shared.core_metrics().stopped_at.is_some());

    shared.record_run_started();
    assert_eq!(shared.core_metrics().runs_total, 2);
    assert!(shared.core_metrics().stopped_at.is_none());
}

#[test]
fn log_message_appends_formatted_entry_and_bumps_total() {
    let shared = WorkerShared::new(1, "conn");
    shared.log_message("connected");
    shared.log_message("frame parsed");
    let recent = shared.recent_messages(None);
    assert_eq!(recent.len(), 2);
    assert!(recent[0].ends_with("— connected"));
    assert!(recent[1].ends_with("— frame parsed"));
    assert_eq!(shared.core_metrics().messages_total, 2);
}

#[test]
fn set_error_tracks_consecutive_count_and_last_error() {
    let shared = WorkerShared::new(1, "conn");
    shared.set_error("timeout");
    shared.set_error("timeout again");
    let metrics = shared.core_metrics();
    assert_eq!(metrics.errors_total, 2);
    assert_eq!(metrics.consecutive_errors, 2);
    assert_eq!(shared.last_error().as_deref(), Some("timeout again"));

    shared.clear_consecutive_errors();
    assert_eq!(shared.core_metrics().consecutive_errors, 0);
    assert_eq!(shared.core_metrics().errors_total, 2);
}

#[test]
fn message_buffer_drops_oldest_past_capacity() {
    let shared = WorkerShared::new(1, "conn");
    for i in 0..(MESSAGE_BUFFER_CAPACITY + 10) {
        shared.log_message(format!("msg {i}"));
    }
    let recent = shared.recent_messages(None);
    assert_eq!(recent.len(), MESSAGE_BUFFER_CAPACITY);
    assert!(recent.last().unwrap().ends_with("msg 209"));
}

#[test]
fn error_buffer_drops_oldest_past_capacity() {
    let shared = WorkerShared::new(1, "conn");
    for i in 0..(ERROR_BUFFER_CAPACITY + 5) {
        shared.set_error(format!("err {i}"));
    }
    assert_eq!(shared.recent_errors(None).len(), ERROR_BUFFER_CAPACITY);
}

#[test]
fn db_write_metrics_track_success_and_failure_separately() {
    let shared = WorkerShared::new(1, "conn");
    shared.record_db_write_ok(10.0);
    shared.record_db_write_ok(20.0);
    shared.record_db_write_fail();

    let metrics = shared.core_metrics();
    assert_eq!(metrics.db_writes_total, 2);
    assert_eq!(metrics.db_write_fail_total, 1);
    assert_eq!(metrics.db_write_latency_ms_last, Some(20.0));
    assert!(metrics.db_write_latency_ms_avg.is_some());
    assert!(metrics.last_db_write_at.is_some());
    assert!(metrics.last_db_error_at.is_some());
}

#[test]
fn recent_messages_respects_limit() {
    let shared = WorkerShared::new(1, "conn");
    shared.log_message("a");
    shared.log_message("b");
    shared.log_message("c");
    let recent = shared.recent_messages(Some(2));
    assert_eq!(recent.len(), 2);
    assert!(recent[1].ends_with("— c"));
}
