// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Easy-serial framer: `[preamble] PAYLOAD [terminator]`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramerError {
    #[error("terminator must be a non-empty string")]
    EmptyTerminator,
}

/// Decode a C-style escaped pattern string (`\n`, `\r`, `\t`, `\xHH`,
/// `\uXXXX`, `\\`, ...) into raw bytes. Unknown escapes fall back to a
/// literal backslash followed by the next character.
pub fn decode_escaped_bytes(pattern: &str) -> Vec<u8> {
    let chars: Vec<char> = pattern.chars().collect();
    let n = chars.len();
    let mut out = Vec::new();
    let mut i = 0;

    while i < n {
        let ch = chars[i];
        if ch != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            i += 1;
            continue;
        }

        if i + 1 >= n {
            out.push(b'\\');
            i += 1;
            continue;
        }

        let nxt = chars[i + 1];
        match nxt {
            'n' => {
                out.push(0x0A);
                i += 2;
            }
            'r' => {
                out.push(0x0D);
                i += 2;
            }
            't' => {
                out.push(0x09);
                i += 2;
            }
            '0' => {
                out.push(0x00);
                i += 2;
            }
            'b' => {
                out.push(0x08);
                i += 2;
            }
            'f' => {
                out.push(0x0C);
                i += 2;
            }
            'v' => {
                out.push(0x0B);
                i += 2;
            }
            'a' => {
                out.push(0x07);
                i += 2;
            }
            '\\' => {
                out.push(b'\\');
                i += 2;
            }
            'x' if i + 3 < n => {
                let hex: String = chars[i + 2..i + 4].iter().collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(value) => {
                        out.push(value);
                        i += 4;
                    }
                    Err(_) => {
                        out.push(b'\\');
                        i += 1;
                    }
                }
            }
            'u' if i + 5 < n => {
                let hex: String = chars[i + 2..i + 6].iter().collect();
                match u32::from_str_radix(&hex, 16) {
                    Ok(code) => {
                        if code <= 255 {
                            out.push(code as u8);
                        } else {
                            out.push((code & 0xFF) as u8);
                        }
                        i += 6;
                    }
                    Err(_) => {
                        out.push(b'\\');
                        i += 1;
                    }
                }
            }
            _ => {
                out.push(b'\\');
                i += 1;
            }
        }
    }

    out
}

/// Incremental framer for easy-serial messages:
/// `[preamble] PAYLOAD [terminator]`.
pub struct EasySerialFramer {
    preamble: Option<Vec<u8>>,
    terminator: Vec<u8>,
    buf: Vec<u8>,
}

impl EasySerialFramer {
    pub fn new(preamble: Option<&str>, terminator: &str) -> Result<Self, FramerError> {
        if terminator.is_empty() {
            return Err(FramerError::EmptyTerminator);
        }
        Ok(Self {
            preamble: preamble.map(decode_escaped_bytes),
            terminator: decode_escaped_bytes(terminator),
            buf: Vec::new(),
        })
    }

    /// Feed raw bytes in; returns all complete payload frames extracted so far.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        if data.is_empty() {
            return frames;
        }
        self.buf.extend_from_slice(data);

        loop {
            let mut start = 0;

            if let Some(preamble) = &self.preamble {
                match find_subslice(&self.buf, preamble) {
                    Some(idx) => {
                        if idx > 0 {
                            self.buf.drain(..idx);
                        }
                        start = preamble.len();
                    }
                    None => {
                        let max_keep = preamble.len().saturating_sub(1);
                        if max_keep > 0 && self.buf.len() > max_keep {
                            let drop = self.buf.len() - max_keep;
                            self.buf.drain(..drop);
                        }
                        return frames;
                    }
                }
            }

            match find_subslice(&self.buf[start..], &self.terminator) {
                Some(rel_idx) => {
                    let term_idx = start + rel_idx;
                    let payload = self.buf[start..term_idx].to_vec();
                    frames.push(payload);
                    self.buf.drain(..term_idx + self.terminator.len());
                }
                None => return frames,
            }
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
#[path = "easy_serial_tests.rs"]
mod tests;
