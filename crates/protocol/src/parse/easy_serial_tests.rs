// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn string_field(index: usize, name: &str) -> EasySerialFieldConfig {
    EasySerialFieldConfig {
        index,
        name: name.to_string(),
        field_type: EasySerialFieldType::String,
        format: None,
    }
}

#[test]
fn parses_string_field_by_index() {
    let fields = vec![string_field(0, "value")];
    let result = parse_payload_text("123", ";", &fields).unwrap();
    assert_eq!(result.get("value"), Some(&Value::Text("123".to_string())));
}

#[test]
fn parses_int_and_float_fields() {
    let fields = vec![
        EasySerialFieldConfig {
            index: 0,
            name: "n".to_string(),
            field_type: EasySerialFieldType::Int,
            format: None,
        },
        EasySerialFieldConfig {
            index: 1,
            name: "f".to_string(),
            field_type: EasySerialFieldType::Float,
            format: None,
        },
    ];
    let result = parse_payload_text("42;3.5", ";", &fields).unwrap();
    assert_eq!(result.get("n"), Some(&Value::Int(42)));
    assert_eq!(result.get("f"), Some(&Value::Float(3.5)));
}

#[test]
fn out_of_bounds_index_errors() {
    let fields = vec![string_field(5, "value")];
    let err = parse_payload_text("a;b", ";", &fields).unwrap_err();
    assert!(matches!(err, ParseError::IndexOutOfBounds { .. }));
}

#[test]
fn datetime_field_requires_format() {
    let fields = vec![EasySerialFieldConfig {
        index: 0,
        name: "ts".to_string(),
        field_type: EasySerialFieldType::DateTime,
        format: None,
    }];
    let err = parse_payload_text("2026-01-01", ";", &fields).unwrap_err();
    assert!(matches!(err, ParseError::MissingFormat { .. }));
}
