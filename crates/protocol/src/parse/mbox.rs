// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mbox label CSV parsing.
//!
//! Columns beyond index 10 are discarded even when present; the framer
//! guarantees at least 11 fields but no upper bound.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabelParseError {
    #[error("expected at least 11 columns, got {0}")]
    TooFewColumns(usize),
    #[error("invalid datetime '{0}'")]
    InvalidDateTime(String),
    #[error("invalid weight value '{0}' in column {1}")]
    InvalidWeight(String, usize),
    #[error("payload is not valid text: {0}")]
    InvalidEncoding(String),
}

/// A parsed mbox label record. Deliberately has no `lot`/`sLot` field: the
/// production parser never populates one.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub dt: NaiveDateTime,
    pub fish_type: String,
    pub serial_number: String,
    pub size: String,
    pub n_weight: f64,
    pub r_weight: f64,
}

/// Parse an mbox label payload (the bytes between `$` and `ETX`) into a
/// [`LabelRecord`].
pub fn parse_label_frame(payload: &[u8], encoding: &str) -> Result<LabelRecord, LabelParseError> {
    let text = decode_payload(payload, encoding)?;
    let columns: Vec<&str> = text.split(',').collect();
    if columns.len() < 11 {
        return Err(LabelParseError::TooFewColumns(columns.len()));
    }

    let dt = NaiveDateTime::parse_from_str(columns[0], "%Y%m%d%H%M%S%3f")
        .map_err(|_| LabelParseError::InvalidDateTime(columns[0].to_string()))?;

    let n_weight: f64 = columns[9]
        .parse()
        .map_err(|_| LabelParseError::InvalidWeight(columns[9].to_string(), 9))?;
    let r_weight: f64 = columns[10]
        .parse()
        .map_err(|_| LabelParseError::InvalidWeight(columns[10].to_string(), 10))?;

    Ok(LabelRecord {
        dt,
        fish_type: columns[6].to_string(),
        serial_number: columns[7].to_string(),
        size: columns[8].to_string(),
        n_weight,
        r_weight,
    })
}

fn decode_payload(payload: &[u8], encoding: &str) -> Result<String, LabelParseError> {
    match encoding.to_ascii_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => String::from_utf8(payload.to_vec())
            .map_err(|e| LabelParseError::InvalidEncoding(e.to_string())),
        other => Err(LabelParseError::InvalidEncoding(format!(
            "unsupported encoding '{other}'"
        ))),
    }
}

#[cfg(test)]
#[path = "mbox_tests.rs"]
mod tests;
