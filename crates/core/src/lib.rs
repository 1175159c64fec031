// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ulog-core: shared primitives for the ulog data-logging service.

pub mod id;
pub mod metrics;
pub mod ring_buffer;
pub mod state;
pub mod time_fmt;

pub use id::{ConnectionId, IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use metrics::{Counter, EmaLatency};
pub use ring_buffer::RingBuffer;
pub use state::WorkerState;
pub use time_fmt::{format_local, format_mbox_timestamp};
