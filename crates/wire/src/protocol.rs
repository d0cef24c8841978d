// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message envelopes multiplexed over the single duplex pipe a host
//! keeps open to each worker subprocess.
//!
//! Each worker process owns one queue and otherwise has no state of its
//! own: the shared cache and the inference supervisor are authoritative
//! in the host, so the worker reaches them by sending a `CacheRequest`
//! or `ServiceRequest` up its stdin/stdout pipe and waiting for the
//! correlated response. `request_id` values are chosen by the worker and
//! are only unique within that worker's own pipe.

use corvid_core::{CallableId, CompletionEvent, ServiceKind, Task};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type RequestId = u64;

/// Sent from the host down to a worker process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum WorkerInbound {
    /// Execute this task. The worker acks nothing; completion is
    /// reported asynchronously via `WorkerOutbound::Completion`.
    Task { task: Task },

    /// Response to an earlier `WorkerOutbound::Cache` request.
    CacheResult { request_id: RequestId, result: CacheResponse },

    /// Response to an earlier `WorkerOutbound::Service` request.
    ServiceResult { request_id: RequestId, result: ServiceResponse },

    /// Drain and exit: finish any task in flight, then shut down.
    Shutdown,
}

/// Sent from a worker process up to the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum WorkerOutbound {
    /// Worker finished executing a task, successfully or not.
    Completion { event: CompletionEvent },

    /// Worker has entered its run loop and is ready to receive tasks.
    Ready,

    /// RPC into the host's shared cache.
    Cache { request_id: RequestId, request: CacheRequest },

    /// RPC into the host's inference supervisor.
    Service { request_id: RequestId, request: ServiceRequest },

    /// Unhandled panic/error while executing `callable_id`, reported in
    /// addition to the `Completion(Failed)` event, for the log
    /// multiplexer to surface with a stack trace when available.
    CallableError { callable_id: CallableId, message: String },
}

/// The cache's RPC surface, mirroring `Cache::{Get,Set,Delete}` and its
/// `WithLock` scoped-mutex helper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op")]
pub enum CacheRequest {
    Get { key: String },
    Set { key: String, value: Value },
    Delete { key: String },
    /// Acquire the named mutex; the host replies only once it is held.
    Lock { key: String },
    Unlock { key: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op")]
pub enum CacheResponse {
    Value { value: Option<Value> },
    Deleted { existed: bool },
    Locked,
    Unlocked,
}

/// The inference supervisor's RPC surface, mirroring `UseService`'s
/// acquire/release pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op")]
pub enum ServiceRequest {
    Acquire { kind: ServiceKind },
    Release { kind: ServiceKind },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op")]
pub enum ServiceResponse {
    Acquired,
    Unavailable { reason: String },
    Released,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
