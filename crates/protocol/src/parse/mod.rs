// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frame/registers -> typed record parsers and decoders.

pub mod easy_serial;
pub mod mbox;
pub mod mbox_counter;
pub mod modbus;

pub use easy_serial::{parse_payload_text, EasySerialFieldConfig, EasySerialFieldType, ParseError};
pub use mbox::{parse_label_frame, LabelParseError, LabelRecord};
pub use mbox_counter::{
    build_read_request, crc8_e5, parse_response_frame, CounterProtocolError, ParsedCountersResponse,
};
pub use modbus::{decode_registers, Decoded, ModbusDecodeError, ModbusEncoding, ModbusVariableConfig};
