// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    header = { &[0x05, 0x43, 0x78, 0x1a], 0x1F },
    data_addr = { &[0x01, 0x00], 0xF3 },
    resp_header = { &[0x0a, 0x08, 0x78, 0x1a], 0xCD },
    resp_data = { &[0x28, 0x1c, 0x29, 0x00, 0x01, 0x00, 0x05], 0x0D },
)]
fn crc8_matches_reference_vectors(input: &[u8], expected: u8) {
    assert_eq!(crc8_e5(input), expected);
}

#[test]
fn e3_e4_request_round_trips_to_reference_bytes() {
    let frame = build_read_request(0x1A78).unwrap();
    assert_eq!(
        frame,
        vec![0x27, 0x05, 0x43, 0x78, 0x1a, 0x1f, 0x01, 0x00, 0xf3]
    );
}

#[test]
fn e3_response_parses_to_expected_total() {
    let frame = [
        0x27, 0x0a, 0x08, 0x78, 0x1a, 0xcd, 0x28, 0x1c, 0x29, 0x00, 0x01, 0x00, 0x05, 0x0d,
    ];
    let parsed = parse_response_frame(&frame).unwrap();
    assert_eq!(parsed.serial, 0x1A78);
    assert_eq!(parsed.total_count, 2_694_184);
    assert_eq!(parsed.flags, 0x05);
}

#[test]
fn serial_out_of_range_is_rejected() {
    assert_eq!(
        build_read_request(0x1_0000).unwrap_err(),
        CounterProtocolError::SerialOutOfRange
    );
}

#[test]
fn header_crc_mismatch_is_detected() {
    let mut frame = vec![
        0x27, 0x0a, 0x08, 0x78, 0x1a, 0xcd, 0x28, 0x1c, 0x29, 0x00, 0x01, 0x00, 0x05, 0x0d,
    ];
    frame[5] ^= 0xFF;
    assert_eq!(
        parse_response_frame(&frame).unwrap_err(),
        CounterProtocolError::HeaderCrcMismatch
    );
}

#[test]
fn length_byte_below_three_is_rejected_instead_of_underflowing() {
    // A 6-byte frame (L=2) is shorter than any real response can be, but it
    // is well-formed enough to reach the data-length computation: its
    // header CRC is made to match so `parse_response_frame` can't reject it
    // any earlier.
    let header = [0x02, C_READ_RESP, 0x78, 0x1a];
    let hdr_crc = crc8_e5(&header);
    let frame = [PREAMBLE, 0x02, C_READ_RESP, 0x78, 0x1a, hdr_crc];
    assert_eq!(
        parse_response_frame(&frame).unwrap_err(),
        CounterProtocolError::UnexpectedDataLength(0)
    );
}
