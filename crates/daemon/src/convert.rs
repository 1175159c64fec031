// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ulog_protocol::Value` <-> `serde_json::Value` conversion for API
//! responses that echo parsed record fields.

use std::collections::BTreeMap;

use ulog_protocol::value::VarMap;
use ulog_protocol::Value;

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Timestamp(ts) => serde_json::Value::String(ts.to_rfc3339()),
    }
}

pub fn varmap_to_json(vars: &VarMap) -> BTreeMap<String, serde_json::Value> {
    vars.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect()
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
