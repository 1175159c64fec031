// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mbox-counter framer: `0x27 L C A(2) hdr_crc DATA(L-3) data_crc`.
//!
//! Unlike the easy-serial and mbox framers, this one clears the *entire*
//! buffer (not just trims it) when no preamble byte is present at all.

const PREAMBLE: u8 = 0x27;

/// Incremental framer for mbox-counter binary messages. Emits raw,
/// CRC-unvalidated frames; CRC and field decoding happen in the parser.
#[derive(Default)]
pub struct MboxCounterFramer {
    buf: Vec<u8>,
}

impl MboxCounterFramer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn feed(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        if data.is_empty() {
            return frames;
        }
        self.buf.extend_from_slice(data);

        loop {
            let stx = match self.buf.iter().position(|&b| b == PREAMBLE) {
                Some(idx) => idx,
                None => {
                    self.buf.clear();
                    return frames;
                }
            };
            if stx > 0 {
                self.buf.drain(..stx);
            }

            if self.buf.len() < 2 {
                return frames;
            }

            let l = self.buf[1] as usize;
            let frame_len = 4 + l;

            if self.buf.len() < frame_len {
                return frames;
            }

            let frame = self.buf[..frame_len].to_vec();
            frames.push(frame);
            self.buf.drain(..frame_len);
        }
    }
}

#[cfg(test)]
#[path = "mbox_counter_tests.rs"]
mod tests;
