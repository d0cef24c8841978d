// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task, TaskFingerprint, QueueName, and RecurringSpec — the data model
//! shared by the queue, worker, and scheduler crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use twox_hash::XxHash3_128;

/// Stable string identifying a function registered with the worker's
/// static callable map. Never a closure — callables are resolved by id
/// inside the worker process, never captured and shipped across it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallableId(pub String);

impl CallableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CallableId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CallableId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One of the three fixed queues the core declares.
///
/// `Completion` and `Embedding` each correspond to one inference service
/// in the supervisor and are sized for single-worker throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueName {
    General,
    Completion,
    Embedding,
}

impl QueueName {
    pub const ALL: [QueueName; 3] = [QueueName::General, QueueName::Completion, QueueName::Embedding];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueName::General => "general",
            QueueName::Completion => "completion",
            QueueName::Embedding => "embedding",
        }
    }
}

crate::simple_display! {
    QueueName {
        General => "general",
        Completion => "completion",
        Embedding => "embedding",
    }
}

impl std::str::FromStr for QueueName {
    type Err = InvalidQueueName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(QueueName::General),
            "completion" => Ok(QueueName::Completion),
            "embedding" => Ok(QueueName::Embedding),
            other => Err(InvalidQueueName(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid queue name: {0:?}")]
pub struct InvalidQueueName(pub String);

/// Opaque, order-preserved positional/named arguments. Values must
/// already be in a serializable form — the core never inspects them.
pub type Args = Vec<serde_json::Value>;
pub type KwArgs = std::collections::BTreeMap<String, serde_json::Value>;

/// A unit of work: a callable-id plus its arguments. Immutable once
/// submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub callable_id: CallableId,
    #[serde(default)]
    pub args: Args,
    #[serde(default)]
    pub kwargs: KwArgs,
}

impl Task {
    pub fn new(callable_id: impl Into<CallableId>, args: Args, kwargs: KwArgs) -> Self {
        Self { callable_id: callable_id.into(), args, kwargs }
    }

    /// Deterministic hash over `(callable-id, args, kwargs)` after
    /// canonicalizing key order. `kwargs` is a `BTreeMap` so iteration is
    /// already key-sorted; `args` stays tuple-ordered.
    pub fn fingerprint(&self) -> TaskFingerprint {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(self.callable_id.as_str().as_bytes());
        bytes.push(0);
        for arg in &self.args {
            bytes.extend_from_slice(canonical_json(arg).as_bytes());
            bytes.push(0);
        }
        bytes.push(0);
        for (k, v) in &self.kwargs {
            bytes.extend_from_slice(k.as_bytes());
            bytes.push(b'=');
            bytes.extend_from_slice(canonical_json(v).as_bytes());
            bytes.push(0);
        }
        TaskFingerprint(XxHash3_128::oneshot(&bytes))
    }
}

/// `serde_json::to_string` already emits object keys in the order they
/// were inserted; since `serde_json::Value` objects are backed by a
/// `BTreeMap` when the `preserve_order` feature is off, this is already
/// key-sorted and therefore a valid canonical form for hashing.
fn canonical_json(v: &serde_json::Value) -> String {
    v.to_string()
}

/// A 128-bit non-cryptographic hash over a task's identity. Two
/// submissions with identical fingerprints are considered the same work;
/// collisions beyond the hash are accepted (the only consequence is
/// missed dedup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskFingerprint(pub u128);

impl fmt::Display for TaskFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// A recurring submission: fires `callable_id(args, kwargs)` onto `queue`
/// every `interval` once its `next_run` time has elapsed. Mutable only at
/// startup; read-only during scheduler operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringSpec {
    pub callable_id: CallableId,
    pub interval: std::time::Duration,
    pub args: Args,
    pub kwargs: KwArgs,
    pub queue: QueueName,
}

impl RecurringSpec {
    pub fn new(
        callable_id: impl Into<CallableId>,
        interval: std::time::Duration,
        queue: QueueName,
    ) -> Self {
        Self {
            callable_id: callable_id.into(),
            interval,
            args: Vec::new(),
            kwargs: KwArgs::new(),
            queue,
        }
    }
}

/// `(callable-id, timestamp)` — produced exactly once per executed task,
/// regardless of whether the task succeeded. Carries the task's own
/// `fingerprint` so the host can release it from the dedup index once
/// the task it guards has actually finished (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub callable_id: CallableId,
    pub fingerprint: TaskFingerprint,
    pub epoch_ms: u64,
    pub outcome: TaskOutcome,
}

/// Whether the callable returned normally or panicked/errored. The
/// completion event is emitted unconditionally either way (see
/// `DESIGN.md`'s resolution of the open question in spec.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    Success,
    Failed,
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
