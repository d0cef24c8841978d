// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boundary types observed at the edges of the core (§6): the inbound
//! and outbound WebSocket envelopes, and the model-server readiness
//! contract. No transport lives here — only the shapes the host passes
//! across it.

use serde::{Deserialize, Serialize};

/// An inbound frame from a UI client. The core never interprets
/// `action`; it is opaque to the Event Bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEnvelope {
    pub action: String,
    #[serde(flatten)]
    pub body: serde_json::Value,
}

/// An outbound frame to a UI client. `Broadcast` forwards whatever
/// envelope the host passes it verbatim; the one frame the core
/// originates itself is the heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundEnvelope {
    #[serde(rename = "heartbeat")]
    Heartbeat,
    /// Any other host-originated frame, forwarded byte-for-byte.
    #[serde(untagged)]
    Other(serde_json::Value),
}

/// Response shape the supervisor accepts as evidence a model server is
/// ready. The embedding server's contract is looser: any successful
/// response counts, whereas the completion server must additionally
/// report `{"status": "ok"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadinessBody {
    #[serde(default)]
    pub status: Option<String>,
}

impl ReadinessBody {
    pub fn is_ready_for(&self, kind: crate::ServiceKind) -> bool {
        match kind {
            crate::ServiceKind::Embedding => true,
            crate::ServiceKind::Completion => self.status.as_deref() == Some("ok"),
        }
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
