// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn frame(payload: &[u8]) -> Vec<u8> {
    let mut f = vec![STX, DOLLAR];
    f.extend_from_slice(payload);
    f.push(ETX);
    f
}

#[test]
fn extracts_single_frame() {
    let mut framer = MboxFramer::new();
    let frames = framer.feed(&frame(b"hello"));
    assert_eq!(frames, vec![b"hello".to_vec()]);
}

#[test]
fn drops_garbage_before_stx() {
    let mut framer = MboxFramer::new();
    let mut data = vec![0xFF, 0xFF, 0xFF];
    data.extend(frame(b"ok"));
    let frames = framer.feed(&data);
    assert_eq!(frames, vec![b"ok".to_vec()]);
}

#[test]
fn resyncs_when_byte_after_stx_is_not_dollar() {
    let mut framer = MboxFramer::new();
    let mut data = vec![STX, b'Z'];
    data.extend(frame(b"ok"));
    let frames = framer.feed(&data);
    assert_eq!(frames, vec![b"ok".to_vec()]);
}

#[test]
fn clears_whole_buffer_when_no_stx_present() {
    let mut framer = MboxFramer::new();
    framer.feed(&[0xAA, 0xBB, 0xCC, 0xDD]);
    assert!(framer.buf.is_empty());
}

#[test]
fn buffers_partial_frame_across_calls() {
    let mut framer = MboxFramer::new();
    let full = frame(b"abc");
    let (a, b) = full.split_at(3);
    assert!(framer.feed(a).is_empty());
    let frames = framer.feed(b);
    assert_eq!(frames, vec![b"abc".to_vec()]);
}

#[test]
fn feed_is_pure_over_arbitrary_splits() {
    let mut data = frame(b"one");
    data.extend(frame(b"two"));

    let mut whole = MboxFramer::new();
    let all_at_once = whole.feed(&data);

    for split in 0..data.len() {
        let (a, b) = data.split_at(split);
        let mut framer = MboxFramer::new();
        let mut frames = framer.feed(a);
        frames.extend(framer.feed(b));
        assert_eq!(frames, all_at_once, "split at {split} diverged");
    }
}
