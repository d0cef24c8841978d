// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! corvid-core: shared domain types for the background execution core —
//! tasks, queues, service state, and the client-facing envelope types —
//! plus the `Clock`, config, and error primitives the other crates build
//! on.

pub mod macros;

pub mod clock;
pub mod config;
pub mod envelope;
pub mod error;
pub mod service;
pub mod task;
pub mod worker;

pub use clock::{Clock, FakeClock, SystemClock};
pub use envelope::{InboundEnvelope, OutboundEnvelope, ReadinessBody};
pub use error::ServiceUnavailable;
pub use service::{ServiceKind, ServicePhase, ServiceState};
pub use task::{
    Args, CallableId, CompletionEvent, InvalidQueueName, KwArgs, QueueName, RecurringSpec, Task,
    TaskFingerprint, TaskOutcome,
};
pub use worker::WorkerId;
