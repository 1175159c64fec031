// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain-level transformation of mbox label records: tare adjustment and
//! zero/duplicate error detection.
//!
//! `lot` is always emitted as the empty string here regardless of the
//! configured `lot`; the miss-insert path (in `ulog-engine`) is the only
//! place that overrides it with the configured value. This asymmetry comes
//! from the system being ported and is preserved intentionally.

use crate::parse::mbox::LabelRecord;
use crate::value::{Value, VarMap};

/// Per-connection configuration consumed by the transformer.
#[derive(Debug, Clone)]
pub struct MboxTransformConfig {
    pub tare: f64,
    pub treat_zero_as_error: bool,
    pub treat_duplicate_as_error: bool,
    pub error_label_zero: String,
    pub error_label_duplicate: String,
}

/// Result of transforming a single label record.
#[derive(Debug, Clone)]
pub struct MboxTransformResult {
    pub variables: VarMap,
    pub on_error: bool,
    pub error_info: String,
    pub adj_r_weight: f64,
}

/// Stateful transformer: remembers the last adjusted weight to detect
/// duplicates.
pub struct MboxTransformer {
    cfg: MboxTransformConfig,
    last_adj_r_weight: Option<f64>,
}

impl MboxTransformer {
    pub fn new(cfg: MboxTransformConfig) -> Self {
        Self {
            cfg,
            last_adj_r_weight: None,
        }
    }

    /// Reset internal state, e.g. on device reconnect.
    pub fn reset_state(&mut self) {
        self.last_adj_r_weight = None;
    }

    pub fn transform(&mut self, mbox_id: i64, rec: &LabelRecord) -> MboxTransformResult {
        let cfg = &self.cfg;

        let mut adj_r = rec.r_weight - cfg.tare;
        if adj_r < 0.0 {
            adj_r = 0.0;
        }

        let mut on_error = false;
        let mut error_info = String::new();

        if cfg.treat_zero_as_error && adj_r == 0.0 {
            adj_r = rec.n_weight;
            on_error = true;
            error_info = cfg.error_label_zero.clone();
        }

        if !on_error && cfg.treat_duplicate_as_error {
            if let Some(prev) = self.last_adj_r_weight {
                if adj_r == prev {
                    on_error = true;
                    error_info = cfg.error_label_duplicate.clone();
                }
            }
        }

        self.last_adj_r_weight = Some(adj_r);

        let mut variables = VarMap::new();
        variables.insert("mbox_id".to_string(), Value::Int(mbox_id));
        variables.insert("on_error".to_string(), Value::Bool(on_error));
        variables.insert(
            "created_at".to_string(),
            Value::Timestamp(rec.dt.and_utc().with_timezone(&chrono::Local)),
        );
        variables.insert("fish_name".to_string(), Value::Text(rec.fish_type.clone()));
        variables.insert("fish_grade".to_string(), Value::Text(rec.size.clone()));
        variables.insert("lot".to_string(), Value::Text(String::new()));
        variables.insert("n_weight".to_string(), Value::Float(rec.n_weight));
        variables.insert("r_weight".to_string(), Value::Float(adj_r));
        variables.insert("sn".to_string(), Value::Text(rec.serial_number.clone()));
        variables.insert("error_info".to_string(), Value::Text(error_info.clone()));
        variables.insert("tare".to_string(), Value::Float(cfg.tare));

        MboxTransformResult {
            variables,
            on_error,
            error_info,
            adj_r_weight: adj_r,
        }
    }
}

#[cfg(test)]
#[path = "mbox_tests.rs"]
mod tests;
