// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dry-run the easy-serial framer/parser against a sample payload, without
//! opening a serial port or registering a connection.

use std::collections::BTreeMap;

use axum::Json;
use serde::{Deserialize, Serialize};
use ulog_protocol::framer::EasySerialFramer;
use ulog_protocol::parse::easy_serial::{parse_payload_text, EasySerialFieldConfig, EasySerialFieldType};
use ulog_storage::config::EasySerialParserSettings;

use crate::convert::varmap_to_json;
use crate::error::ApiError;
use crate::response::{ok, Envelope};

#[derive(Deserialize)]
pub struct ParserTestRequest {
    pub parser: EasySerialParserSettings,
    /// Raw sample bytes, as they'd arrive off the wire.
    pub sample: String,
}

#[derive(Serialize)]
pub struct ParserTestResponse {
    pub frames: Vec<BTreeMap<String, serde_json::Value>>,
    pub errors: Vec<String>,
}

fn map_field_type(raw: &str) -> EasySerialFieldType {
    match raw {
        "int" => EasySerialFieldType::Int,
        "float" => EasySerialFieldType::Float,
        "datetime" => EasySerialFieldType::DateTime,
        _ => EasySerialFieldType::String,
    }
}

pub async fn test(
    Json(request): Json<ParserTestRequest>,
) -> Result<Json<Envelope<ParserTestResponse>>, ApiError> {
    let mut framer = EasySerialFramer::new(request.parser.preamble.as_deref(), &request.parser.terminator)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let fields: Vec<EasySerialFieldConfig> = request
        .parser
        .fields
        .iter()
        .map(|f| EasySerialFieldConfig {
            index: f.index,
            name: f.name.clone(),
            field_type: map_field_type(&f.field_type),
            format: f.format.clone(),
        })
        .collect();

    let mut frames = Vec::new();
    let mut errors = Vec::new();
    for payload in framer.feed(request.sample.as_bytes()) {
        let text = String::from_utf8_lossy(&payload).into_owned();
        match parse_payload_text(&text, &request.parser.separator, &fields) {
            Ok(parsed) => frames.push(varmap_to_json(&parsed)),
            Err(e) => errors.push(e.to_string()),
        }
    }

    Ok(ok(ParserTestResponse { frames, errors }))
}

#[cfg(test)]
#[path = "easy_serial_tests.rs"]
mod tests;
