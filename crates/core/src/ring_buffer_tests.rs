// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn drops_oldest_past_capacity() {
    let mut buf = RingBuffer::new(3);
    buf.push(1);
    buf.push(2);
    buf.push(3);
    buf.push(4);
    assert_eq!(buf.len(), 3);
    assert_eq!(buf.recent(None), vec![2, 3, 4]);
}

#[test]
fn recent_respects_limit() {
    let mut buf = RingBuffer::new(5);
    for v in 1..=5 {
        buf.push(v);
    }
    assert_eq!(buf.recent(Some(2)), vec![4, 5]);
}

#[test]
fn zero_capacity_is_clamped_to_one() {
    let mut buf = RingBuffer::new(0);
    buf.push(1);
    buf.push(2);
    assert_eq!(buf.recent(None), vec![2]);
}
