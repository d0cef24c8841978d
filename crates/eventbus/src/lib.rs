// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! corvid-eventbus: C9 Event Bus, fanning out host notifications to
//! connected UI clients with a per-client heartbeat.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod bus;
mod client;

pub use bus::{ClientId, EventBus};
pub use client::{Client, ClientSendError};
