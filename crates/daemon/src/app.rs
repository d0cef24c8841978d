// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host-side wiring: builds the shared cache, the inference supervisor,
//! the three queues and their scheduler, one worker process per queue,
//! and the completion notifier that fans state changes out to the event
//! bus. Matches spec.md §5's component graph and its shutdown sequence.

use corvid_cache::HostCache;
use corvid_core::{config, CallableId, CompletionEvent, QueueName, RecurringSpec, SystemClock};
use corvid_eventbus::EventBus;
use corvid_inference::InferenceSupervisor;
use corvid_queue::{Scheduler, TaskQueues};
use corvid_worker::{CompletionNotifier, WorkerHandle};
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// The callables whose completion should be pushed to connected UI
/// clients rather than silently logged (spec.md §4.8).
fn state_changing_callables() -> [CallableId; 2] {
    [CallableId::new("process_inbox_thread"), CallableId::new("execute_function_for_message")]
}

fn default_recurring_specs() -> Vec<RecurringSpec> {
    vec![
        RecurringSpec::new("sync_mailbox", Duration::from_secs(5 * 60), QueueName::General),
        RecurringSpec::new("send_digest", Duration::from_secs(24 * 60 * 60), QueueName::General),
    ]
}

/// Everything the running daemon needs to hold onto: the task
/// submission handle callers use, and the join state needed to stop it.
pub struct App {
    pub queues: TaskQueues,
    pub event_bus: EventBus,
    scheduler_cancel: CancellationToken,
    scheduler: tokio::task::JoinHandle<()>,
    workers: Vec<WorkerHandle>,
    inference: InferenceSupervisor,
    notifier: tokio::task::JoinHandle<()>,
}

impl App {
    /// Spawn the scheduler, one worker per queue, and the completion
    /// notifier. Returns once every worker has reported `Ready`'s
    /// surrounding plumbing is in place (not once the model servers
    /// themselves are warm — those spawn lazily on first acquire).
    pub async fn start() -> std::io::Result<Self> {
        let cache = HostCache::new();
        let inference = InferenceSupervisor::new(cache.clone(), SystemClock);
        let (queues, receivers) = TaskQueues::new();
        let event_bus = EventBus::new();

        let scheduler_cancel = CancellationToken::new();
        let scheduler = Scheduler::new(queues.clone(), SystemClock, default_recurring_specs());
        let scheduler = tokio::spawn(scheduler.run(
            scheduler_cancel.clone(),
            config::scheduler_tick_interval(),
            config::scheduler_startup_grace(),
        ));

        let (completions_tx, completions_rx) = mpsc::unbounded_channel::<CompletionEvent>();

        let mut workers = Vec::with_capacity(receivers.len());
        for receiver in receivers {
            let handle = WorkerHandle::spawn(
                receiver.queue,
                receiver.receiver,
                cache.clone(),
                inference.clone(),
                queues.dedup_index().clone(),
                completions_tx.clone(),
            )
            .await?;
            workers.push(handle);
        }
        drop(completions_tx);

        let notifier_bus = event_bus.clone();
        let notifier = tokio::spawn(CompletionNotifier::new(state_changing_callables()).run(
            completions_rx,
            move |event| {
                let bus = notifier_bus.clone();
                async move {
                    bus.broadcast(corvid_core::OutboundEnvelope::Other(json!({
                        "type": "task_completed",
                        "callable_id": event.callable_id.as_str(),
                        "epoch_ms": event.epoch_ms,
                        "outcome": event.outcome,
                    })))
                    .await;
                }
            },
        ));

        Ok(Self { queues, event_bus, scheduler_cancel, scheduler, workers, inference, notifier })
    }

    /// Run the documented stop sequence (spec.md §5): cancel the
    /// scheduler first so no new task lands mid-shutdown, stop every
    /// worker process, force-stop both model servers unconditionally,
    /// then let the completion notifier drain and exit on its own once
    /// every worker's completion sender has dropped.
    pub async fn shutdown(self) {
        self.scheduler_cancel.cancel();
        let _ = self.scheduler.await;

        for worker in self.workers {
            worker.shutdown().await;
        }

        self.inference.force_stop_all().await;

        let _ = self.notifier.await;
    }
}
