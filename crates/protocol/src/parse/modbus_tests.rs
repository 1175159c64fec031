// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn var(encoding: ModbusEncoding) -> ModbusVariableConfig {
    ModbusVariableConfig {
        name: "v".to_string(),
        address: 0,
        encoding,
        k: 1.0,
        b: 0.0,
    }
}

#[test]
fn u16_decodes_plain() {
    let out = decode_registers(&[1234], &var(ModbusEncoding::U16)).unwrap();
    assert_eq!(out, Decoded::Unsigned(1234));
}

#[test]
fn s16_sign_extends_negative_values() {
    let out = decode_registers(&[0xFFFE], &var(ModbusEncoding::S16)).unwrap();
    assert_eq!(out, Decoded::Signed(-2));
}

#[test]
fn u32_abcd_and_cdab_are_word_swaps() {
    let abcd = decode_registers(&[0x1234, 0x5678], &var(ModbusEncoding::U32Abcd)).unwrap();
    let cdab = decode_registers(&[0x5678, 0x1234], &var(ModbusEncoding::U32Cdab)).unwrap();
    assert_eq!(abcd, Decoded::Unsigned(0x1234_5678));
    assert_eq!(cdab, Decoded::Unsigned(0x1234_5678));
}

#[test]
fn s32_sign_extends_negative_values() {
    let out = decode_registers(&[0xFFFF, 0xFFFE], &var(ModbusEncoding::S32Abcd)).unwrap();
    assert_eq!(out, Decoded::Signed(-2));
}

#[test]
fn e5_f32_abcd_round_trips_from_be_bytes() {
    let bits = 12.5f32.to_bits();
    let hi = (bits >> 16) as u16;
    let lo = (bits & 0xFFFF) as u16;
    let out = decode_registers(&[hi, lo], &var(ModbusEncoding::F32Abcd)).unwrap();
    match out {
        Decoded::Float(f) => assert!((f - 12.5).abs() < 1e-5),
        other => panic!("expected float, got {other:?}"),
    }
}

#[test]
fn scaled_variant_applies_linear_transform() {
    let mut cfg = var(ModbusEncoding::U16Scaled);
    cfg.k = 0.1;
    cfg.b = 5.0;
    let out = decode_registers(&[100], &cfg).unwrap();
    assert_eq!(out, Decoded::Float(15.0));
}

#[test]
fn not_enough_registers_is_an_error() {
    let err = decode_registers(&[1], &var(ModbusEncoding::U32Abcd)).unwrap_err();
    assert_eq!(
        err,
        ModbusDecodeError::NotEnoughRegisters {
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn register_count_matches_encoding_width() {
    assert_eq!(ModbusEncoding::U16.register_count(), 1);
    assert_eq!(ModbusEncoding::S16Scaled.register_count(), 1);
    assert_eq!(ModbusEncoding::F32Cdab.register_count(), 2);
}
