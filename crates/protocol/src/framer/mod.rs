// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte-stream framers: stateful, partial-input tolerant boundary extraction.

pub mod easy_serial;
pub mod mbox;
pub mod mbox_counter;

pub use easy_serial::EasySerialFramer;
pub use mbox::MboxFramer;
pub use mbox_counter::MboxCounterFramer;
