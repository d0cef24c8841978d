// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! corvid-wire: length-prefixed JSON framing and the message envelopes
//! exchanged over the duplex pipe between the host and each worker
//! subprocess.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod protocol;
mod wire;

pub use protocol::{
    CacheRequest, CacheResponse, RequestId, ServiceRequest, ServiceResponse, WorkerInbound,
    WorkerOutbound,
};
pub use wire::{
    decode, encode, read_framed, read_message, write_framed, write_message, ProtocolError,
    MAX_MESSAGE_BYTES,
};
