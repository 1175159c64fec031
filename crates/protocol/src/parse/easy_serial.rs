// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Easy-serial payload parsing: split by separator, coerce typed fields.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::value::{Value, VarMap};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("variable '{name}' refers to index {index}, but only {available} fields present")]
    IndexOutOfBounds {
        name: String,
        index: usize,
        available: usize,
    },
    #[error("field {index}: format is required for {type_name}")]
    MissingFormat { index: usize, type_name: String },
    #[error("field {index}: failed to parse '{raw}' as {type_name}")]
    Conversion {
        index: usize,
        raw: String,
        type_name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EasySerialFieldType {
    String,
    Int,
    Float,
    DateTime,
}

#[derive(Debug, Clone)]
pub struct EasySerialFieldConfig {
    pub index: usize,
    pub name: String,
    pub field_type: EasySerialFieldType,
    pub format: Option<String>,
}

fn coerce(raw: &str, cfg: &EasySerialFieldConfig) -> Result<Value, ParseError> {
    match cfg.field_type {
        EasySerialFieldType::String => Ok(Value::Text(raw.to_string())),
        EasySerialFieldType::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ParseError::Conversion {
                index: cfg.index,
                raw: raw.to_string(),
                type_name: "int".to_string(),
            }),
        EasySerialFieldType::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ParseError::Conversion {
                index: cfg.index,
                raw: raw.to_string(),
                type_name: "float".to_string(),
            }),
        EasySerialFieldType::DateTime => {
            let format = cfg.format.as_ref().ok_or_else(|| ParseError::MissingFormat {
                index: cfg.index,
                type_name: "datetime".to_string(),
            })?;
            NaiveDateTime::parse_from_str(raw, format)
                .map(|dt| Value::Timestamp(dt.and_utc().with_timezone(&chrono::Local)))
                .map_err(|_| ParseError::Conversion {
                    index: cfg.index,
                    raw: raw.to_string(),
                    type_name: "datetime".to_string(),
                })
        }
    }
}

/// Split `payload_text` by `separator` and coerce each configured field.
pub fn parse_payload_text(
    payload_text: &str,
    separator: &str,
    fields: &[EasySerialFieldConfig],
) -> Result<VarMap, ParseError> {
    let parts: Vec<&str> = payload_text.split(separator).collect();
    let mut result = VarMap::new();

    for field in fields {
        if field.index >= parts.len() {
            return Err(ParseError::IndexOutOfBounds {
                name: field.name.clone(),
                index: field.index,
                available: parts.len(),
            });
        }
        let raw = parts[field.index].trim();
        let value = coerce(raw, field)?;
        result.insert(field.name.clone(), value);
    }

    Ok(result)
}

#[cfg(test)]
#[path = "easy_serial_tests.rs"]
mod tests;
