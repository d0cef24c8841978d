// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three fixed task queues (general, completion, embedding). Each
//! worker process owns one queue's receiving half; the host (and the
//! scheduler, within it) submits through the sending half.

use crate::dedup::DedupIndex;
use corvid_core::{QueueName, Task};
use std::collections::HashMap;
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("queue {0} has no running worker to receive submissions")]
    WorkerGone(QueueName),
}

/// Host-side handle: one `UnboundedSender` per queue plus the dedup
/// index all queues share. Cloning is cheap and safe to hand to the
/// scheduler and the public submission API alike.
#[derive(Clone)]
pub struct TaskQueues {
    senders: HashMap<QueueName, mpsc::UnboundedSender<Task>>,
    dedup: DedupIndex,
}

/// The receiving half for one queue, handed to that queue's worker
/// supervisor at startup. Not `Clone` — a queue has exactly one reader.
pub struct QueueReceiver {
    pub queue: QueueName,
    pub receiver: mpsc::UnboundedReceiver<Task>,
}

impl TaskQueues {
    /// Build the fixed set of queues, returning the host-side handle and
    /// one `QueueReceiver` per `QueueName`.
    pub fn new() -> (Self, Vec<QueueReceiver>) {
        let mut senders = HashMap::new();
        let mut receivers = Vec::new();
        for queue in QueueName::ALL {
            let (tx, rx) = mpsc::unbounded_channel();
            senders.insert(queue, tx);
            receivers.push(QueueReceiver { queue, receiver: rx });
        }
        (Self { senders, dedup: DedupIndex::new() }, receivers)
    }

    /// Submit `task` to `queue`. Returns `Ok(true)` if accepted,
    /// `Ok(false)` if an identical task (by fingerprint) is already
    /// pending and this submission was dropped as a duplicate.
    pub fn submit(&self, queue: QueueName, task: Task) -> Result<bool, SubmitError> {
        let fingerprint = task.fingerprint();
        if !self.dedup.try_insert(fingerprint) {
            return Ok(false);
        }

        let sender = self.senders.get(&queue).ok_or(SubmitError::WorkerGone(queue))?;
        if sender.send(task).is_err() {
            self.dedup.remove(fingerprint);
            return Err(SubmitError::WorkerGone(queue));
        }
        Ok(true)
    }

    /// Release a fingerprint from the dedup index once its task has
    /// finished executing, so an identical submission is accepted again.
    pub fn mark_complete(&self, task: &Task) {
        self.dedup.remove(task.fingerprint());
    }

    pub fn dedup_index(&self) -> &DedupIndex {
        &self.dedup
    }
}

#[cfg(test)]
#[path = "queues_tests.rs"]
mod tests;
