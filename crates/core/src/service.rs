// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inference service identity and state shared between the supervisor
//! and the shared cache it stores `ServiceState` under.

use serde::{Deserialize, Serialize};

/// One of the two external model-server child processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Embedding,
    Completion,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 2] = [ServiceKind::Embedding, ServiceKind::Completion];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Embedding => "embedding",
            ServiceKind::Completion => "completion",
        }
    }

    /// Well-known shared-cache key this service's `ServiceState` is
    /// stored under, and the name of its `WithLock` mutex.
    pub fn cache_key(&self) -> String {
        format!("service_state:{}", self.as_str())
    }
}

crate::simple_display! {
    ServiceKind {
        Embedding => "embedding",
        Completion => "completion",
    }
}

/// The supervisor's state machine for one model type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServicePhase {
    Idle,
    Starting,
    Ready,
    Draining,
    Stopping,
}

/// One per model type in the inference supervisor. Stored in the shared
/// cache under `ServiceKind::cache_key()` so all worker processes that
/// query it observe the same value.
///
/// Invariants enforced by every transition:
/// - `usage_count >= 0` (the type is `u32`, which makes this structural).
/// - `pid` is `Some` iff the supervisor believes the service is alive
///   (phase is `Starting`, `Ready`, `Draining`, or `Stopping`).
/// - if `usage_count > 0` then `shutdown_scheduled == false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    pub phase: ServicePhase,
    pub pid: Option<u32>,
    pub usage_count: u32,
    pub shutdown_scheduled: bool,
    pub last_used_epoch_ms: u64,
}

impl ServiceState {
    pub fn idle() -> Self {
        Self {
            phase: ServicePhase::Idle,
            pid: None,
            usage_count: 0,
            shutdown_scheduled: false,
            last_used_epoch_ms: 0,
        }
    }

    /// Debug-only invariant check, exercised directly by tests.
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        if self.usage_count > 0 && self.shutdown_scheduled {
            return Err("shutdown_scheduled must be false while usage_count > 0");
        }
        let alive_phase = matches!(
            self.phase,
            ServicePhase::Starting | ServicePhase::Ready | ServicePhase::Draining | ServicePhase::Stopping
        );
        if self.pid.is_some() != alive_phase {
            return Err("pid must be set iff phase is Starting/Ready/Draining/Stopping");
        }
        Ok(())
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
