// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The transport-agnostic client surface the Event Bus fans out to.
//! No WebSocket type lives here (per spec.md §6, the WebSocket layer is
//! the host's problem); the bus only needs something it can hand a
//! frame to and get a yes/no back.

use async_trait::async_trait;
use corvid_core::OutboundEnvelope;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("client send failed: {0}")]
pub struct ClientSendError(pub String);

/// One connected UI client. Implementations own their own transport
/// (a WebSocket sink, a test double, ...); the bus only ever calls
/// `send`.
#[async_trait]
pub trait Client: Send + Sync {
    async fn send(&self, envelope: &OutboundEnvelope) -> Result<(), ClientSendError>;
}
