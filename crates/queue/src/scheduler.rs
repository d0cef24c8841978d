// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring-task scheduler: re-submits each `RecurringSpec` on its
//! fixed interval. Mirrors the original daemon's scheduler thread, which
//! offsets every recurring task's first run by a startup grace period so
//! one-time setup tasks enqueued at boot get a head start.

use crate::queues::TaskQueues;
use corvid_core::{Clock, RecurringSpec, Task};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

pub struct Scheduler<C: Clock + 'static> {
    queues: TaskQueues,
    clock: C,
    specs: Vec<RecurringSpec>,
}

impl<C: Clock + 'static> Scheduler<C> {
    pub fn new(queues: TaskQueues, clock: C, specs: Vec<RecurringSpec>) -> Self {
        Self { queues, clock, specs }
    }

    fn initial_due_times(&self, startup_grace: Duration) -> Vec<Instant> {
        let start = self.clock.now();
        self.specs.iter().map(|_| start + startup_grace).collect()
    }

    /// Submit every spec whose due time has elapsed as of `now`, and
    /// advance its due time by its interval. Pure apart from the
    /// queue submission side effect, so it can be driven directly in
    /// tests without waiting on real time.
    fn tick(&self, now: Instant, due: &mut [Instant]) {
        for (spec, due) in self.specs.iter().zip(due.iter_mut()) {
            if now < *due {
                continue;
            }
            let task = Task::new(spec.callable_id.clone(), spec.args.clone(), spec.kwargs.clone());
            match self.queues.submit(spec.queue, task) {
                Ok(true) => tracing::debug!(
                    callable_id = %spec.callable_id,
                    queue = %spec.queue,
                    "scheduled recurring task"
                ),
                Ok(false) => tracing::debug!(
                    callable_id = %spec.callable_id,
                    "recurring task already pending, skipped"
                ),
                Err(err) => tracing::error!(
                    callable_id = %spec.callable_id,
                    error = %err,
                    "failed to schedule recurring task"
                ),
            }
            *due = now + spec.interval;
        }
    }

    /// Run the tick loop until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken, tick_interval: Duration, startup_grace: Duration) {
        let mut due = self.initial_due_times(startup_grace);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("scheduler stopping");
                    return;
                }
                _ = tokio::time::sleep(tick_interval) => {}
            }

            self.tick(self.clock.now(), &mut due);
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
