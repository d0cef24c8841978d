// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error kinds referenced across crate boundaries.

use thiserror::Error;

/// Errors surfaced by the inference supervisor's `UseService`, per
/// spec.md §4.3/§7's "Service-unavailable" kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceUnavailable {
    #[error("failed to spawn {kind} model server: {reason}")]
    SpawnFailed { kind: crate::ServiceKind, reason: String },

    #[error("{kind} model server did not become ready within the readiness timeout")]
    ReadinessTimeout { kind: crate::ServiceKind },

    #[error("{kind} model server is disabled")]
    Disabled { kind: crate::ServiceKind },
}
