// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The settings document: `AppSettings`, `DbSettings`, and per-connection
//! configuration for each supported protocol.

use serde::{Deserialize, Serialize};

/// Global database connection parameters. Credentials here are defaults and
/// may be overridden per connection via `ConnectionConfig::db_user`/`db_password`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub sslmode: String,
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            database: String::new(),
            user: String::new(),
            password: String::new(),
            sslmode: "prefer".to_string(),
        }
    }
}

/// Serial port settings shared by easy_serial, mbox, mbox_counter and modbus_rtu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialPortSettings {
    pub port: String,
    pub baudrate: u32,
    pub databits: u8,
    pub parity: String,
    pub stopbits: f32,
    pub flowcontrol: String,
    pub autoconnect: bool,
    pub timeout: f64,
}

impl Default for SerialPortSettings {
    fn default() -> Self {
        Self {
            port: String::new(),
            baudrate: 9600,
            databits: 8,
            parity: "None".to_string(),
            stopbits: 1.0,
            flowcontrol: "None".to_string(),
            autoconnect: true,
            timeout: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EasySerialParsedFieldConfig {
    pub index: usize,
    pub name: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub format: Option<String>,
}

fn default_field_type() -> String {
    "string".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EasySerialParserSettings {
    #[serde(default)]
    pub preamble: Option<String>,
    #[serde(default = "default_terminator")]
    pub terminator: String,
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub fields: Vec<EasySerialParsedFieldConfig>,
}

fn default_terminator() -> String {
    "\n".to_string()
}

fn default_separator() -> String {
    ";".to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EasySerialConfig {
    pub port: SerialPortSettings,
    pub parser: EasySerialParserSettings,
}

/// Strategy for filling in a missed mbox packet once `miss_timeout` elapses
/// without a counter confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissStrategy {
    Last,
    Default,
}

impl Default for MissStrategy {
    fn default() -> Self {
        Self::Last
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MboxConfig {
    pub port: SerialPortSettings,
    pub mbox_id: i64,
    pub tare: f64,
    pub lot: String,
    pub treat_zero_as_error: bool,
    pub treat_duplicate_as_error: bool,
    pub error_label_zero: String,
    pub error_label_duplicate: String,
    pub encoding: String,
    pub ext_counter: bool,
    pub counter_connection_id: Option<i64>,
    pub counter_device_id: Option<i64>,
    pub counter_clean_timeout: f64,
    pub counter_miss_timeout: f64,
    pub miss_strategy: MissStrategy,
    pub miss_default: serde_json::Map<String, serde_json::Value>,
    pub miss_insert_limit: u32,
    pub miss_error_label: String,
}

impl Default for MboxConfig {
    fn default() -> Self {
        Self {
            port: SerialPortSettings::default(),
            mbox_id: 0,
            tare: 0.0,
            lot: String::new(),
            treat_zero_as_error: true,
            treat_duplicate_as_error: true,
            error_label_zero: "no weight".to_string(),
            error_label_duplicate: "no weight".to_string(),
            encoding: "ascii".to_string(),
            ext_counter: false,
            counter_connection_id: None,
            counter_device_id: None,
            counter_clean_timeout: 6.0,
            counter_miss_timeout: 4.0,
            miss_strategy: MissStrategy::Last,
            miss_default: serde_json::Map::new(),
            miss_insert_limit: 1,
            miss_error_label: "scales error".to_string(),
        }
    }
}

impl MboxConfig {
    /// `ext_counter=true` requires both counter identifiers to be set; the
    /// original raises this as a Pydantic field validator, we surface it as
    /// a plain validity check callers run before persisting.
    pub fn is_valid(&self) -> bool {
        if self.ext_counter {
            self.counter_connection_id.is_some() && self.counter_device_id.is_some()
        } else {
            true
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MboxCounterDeviceConfig {
    pub device_id: i64,
    pub name: String,
    pub serial: u16,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MboxCounterConfig {
    pub port: SerialPortSettings,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: f64,
    #[serde(default)]
    pub devices: Vec<MboxCounterDeviceConfig>,
}

fn default_poll_interval() -> f64 {
    1.0
}

/// Shared across modbus_rtu and modbus_tcp: how to interpret the registers
/// read for a variable. See `ulog_protocol::parse::modbus::ModbusEncoding`
/// for the decode logic this describes.
pub use ulog_protocol::parse::modbus::ModbusEncoding;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModbusVariableConfig {
    pub name: String,
    pub address: u16,
    pub encoding: ModbusEncoding,
    #[serde(default = "default_k")]
    pub k: f64,
    #[serde(default)]
    pub b: f64,
    #[serde(default)]
    pub default: Option<f64>,
}

fn default_k() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModbusSlaveConfig {
    pub slave_id: u8,
    pub slave_name: String,
    pub variables: Vec<ModbusVariableConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModbusRtuConfig {
    pub port: SerialPortSettings,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: f64,
    #[serde(default)]
    pub slaves: Vec<ModbusSlaveConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModbusTcpHostSettings {
    pub address: String,
    pub port: u16,
    pub autoconnect: bool,
    pub timeout: f64,
}

impl Default for ModbusTcpHostSettings {
    fn default() -> Self {
        Self {
            address: String::new(),
            port: 502,
            autoconnect: true,
            timeout: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModbusTcpConfig {
    pub host: ModbusTcpHostSettings,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: f64,
    #[serde(default)]
    pub slaves: Vec<ModbusSlaveConfig>,
}

/// Tag plus type-specific payload for a connection. Internally tagged on
/// `type` so the JSON shape mirrors the original's `type` + single populated
/// sub-config fields, but only one variant can ever be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConnectionType {
    EasySerial(EasySerialConfig),
    Mbox(MboxConfig),
    MboxCounter(MboxCounterConfig),
    ModbusRtu(ModbusRtuConfig),
    ModbusTcp(ModbusTcpConfig),
}

impl ConnectionType {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionType::EasySerial(_) => "easy_serial",
            ConnectionType::Mbox(_) => "mbox",
            ConnectionType::MboxCounter(_) => "mbox_counter",
            ConnectionType::ModbusRtu(_) => "modbus_rtu",
            ConnectionType::ModbusTcp(_) => "modbus_tcp",
        }
    }
}

/// Configuration for a single logger/connection, persisted in the settings
/// document. `id` is assigned by the store on first save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,

    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub autostart: bool,

    #[serde(default)]
    pub db_user: Option<String>,
    #[serde(default)]
    pub db_password: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub query_template: Option<String>,

    #[serde(flatten)]
    pub kind: ConnectionType,
}

impl ConnectionConfig {
    /// `enabled=true` requires all four DB-write fields to be populated.
    pub fn is_valid(&self) -> bool {
        if self.enabled
            && (self.db_user.as_deref().unwrap_or_default().is_empty()
                || self.db_password.as_deref().unwrap_or_default().is_empty()
                || self.table_name.as_deref().unwrap_or_default().is_empty()
                || self.query_template.as_deref().unwrap_or_default().is_empty())
        {
            return false;
        }
        match &self.kind {
            ConnectionType::Mbox(cfg) => cfg.is_valid(),
            _ => true,
        }
    }
}

/// Top-level settings document: global DB defaults plus the ordered list of
/// configured connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub db: DbSettings,
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
