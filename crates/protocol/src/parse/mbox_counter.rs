// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mbox-counter binary protocol: CRC8/E5, request builder, response parser.
//!
//! This module handles protocol-level concerns only (framing structure, CRC
//! validation, binary field decoding); serial I/O and byte-stream buffering
//! live in [`crate::framer::mbox_counter`].

use thiserror::Error;

const PREAMBLE: u8 = 0x27;
const C_READ_REQ: u8 = 0x43;
const C_READ_RESP: u8 = 0x08;
const DATA_ADDR: [u8; 2] = [0x01, 0x00];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CounterProtocolError {
    #[error("serial must be uint16 (0..65535)")]
    SerialOutOfRange,
    #[error("bad preamble")]
    BadPreamble,
    #[error("frame too short")]
    FrameTooShort,
    #[error("bad frame length: got {got}, expected {expected}")]
    BadFrameLength { got: usize, expected: usize },
    #[error("unexpected control code: 0x{0:02x}")]
    UnexpectedControlCode(u8),
    #[error("header crc mismatch")]
    HeaderCrcMismatch,
    #[error("data crc mismatch")]
    DataCrcMismatch,
    #[error("unexpected data length: {0} (expected 7)")]
    UnexpectedDataLength(usize),
}

/// CRC8 with the device-specific 0xE5 polynomial.
pub fn crc8_e5(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for &b in data {
        crc ^= b;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc ^= 0xE5;
            }
            crc <<= 1;
        }
    }
    !crc
}

/// Build a binary request frame for reading counter values from the device
/// at `serial_u16`.
pub fn build_read_request(serial_u16: u32) -> Result<Vec<u8>, CounterProtocolError> {
    if serial_u16 > 0xFFFF {
        return Err(CounterProtocolError::SerialOutOfRange);
    }
    let a = (serial_u16 as u16).to_le_bytes();
    const L: u8 = 5;

    let mut header = vec![L, C_READ_REQ];
    header.extend_from_slice(&a);
    let hdr_crc = crc8_e5(&header);
    let data_crc = crc8_e5(&DATA_ADDR);

    let mut frame = vec![PREAMBLE];
    frame.extend_from_slice(&header);
    frame.push(hdr_crc);
    frame.extend_from_slice(&DATA_ADDR);
    frame.push(data_crc);
    Ok(frame)
}

/// Parsed response from a counter device. All numeric fields are already
/// converted from little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCountersResponse {
    pub serial: u16,
    pub total_count: u32,
    pub size_dir: u16,
    pub flags: u8,
}

/// Parse and validate a full response frame produced by the framer.
pub fn parse_response_frame(frame: &[u8]) -> Result<ParsedCountersResponse, CounterProtocolError> {
    if frame.is_empty() || frame[0] != PREAMBLE {
        return Err(CounterProtocolError::BadPreamble);
    }
    if frame.len() < 6 {
        return Err(CounterProtocolError::FrameTooShort);
    }

    let l = frame[1] as usize;
    let expected_len = 4 + l;
    if frame.len() != expected_len {
        return Err(CounterProtocolError::BadFrameLength {
            got: frame.len(),
            expected: expected_len,
        });
    }

    let c = frame[2];
    if c != C_READ_RESP {
        return Err(CounterProtocolError::UnexpectedControlCode(c));
    }

    let serial = u16::from_le_bytes([frame[3], frame[4]]);

    let hdr_crc = frame[5];
    let header = &frame[1..5];
    if crc8_e5(header) != hdr_crc {
        return Err(CounterProtocolError::HeaderCrcMismatch);
    }

    let data_len = l
        .checked_sub(3)
        .ok_or(CounterProtocolError::UnexpectedDataLength(0))?;
    let data_start = 6;
    let data_end = data_start + data_len;
    let data = &frame[data_start..data_end];
    let data_crc = frame[data_end];
    if crc8_e5(data) != data_crc {
        return Err(CounterProtocolError::DataCrcMismatch);
    }
    if data.len() != 7 {
        return Err(CounterProtocolError::UnexpectedDataLength(data.len()));
    }

    let total_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let size_dir = u16::from_le_bytes([data[4], data[5]]);
    let flags = data[6];

    Ok(ParsedCountersResponse {
        serial,
        total_count,
        size_dir,
        flags,
    })
}

#[cfg(test)]
#[path = "mbox_counter_tests.rs"]
mod tests;
