// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corvid_core::{CallableId, FakeClock, KwArgs, QueueName};

fn spec(interval: Duration) -> RecurringSpec {
    RecurringSpec::new(CallableId::new("sync_mailbox"), interval, QueueName::General)
}

#[tokio::test]
async fn startup_grace_delays_the_first_run() {
    let clock = FakeClock::new();
    let (queues, mut receivers) = TaskQueues::new();
    let scheduler = Scheduler::new(queues, clock.clone(), vec![spec(Duration::from_secs(10))]);

    let mut due = scheduler.initial_due_times(Duration::from_secs(5));

    // Before the grace period elapses, nothing is due.
    scheduler.tick(clock.now(), &mut due);
    let general = receivers.iter_mut().find(|r| r.queue == QueueName::General).unwrap();
    assert!(general.receiver.try_recv().is_err());

    clock.advance(Duration::from_secs(5));
    scheduler.tick(clock.now(), &mut due);
    assert!(general.receiver.try_recv().is_ok());
}

#[tokio::test]
async fn fires_again_after_each_interval() {
    let clock = FakeClock::new();
    let (queues, mut receivers) = TaskQueues::new();
    let scheduler = Scheduler::new(queues, clock.clone(), vec![spec(Duration::from_secs(10))]);
    let mut due = scheduler.initial_due_times(Duration::ZERO);

    let general = receivers.iter_mut().find(|r| r.queue == QueueName::General).unwrap();

    scheduler.tick(clock.now(), &mut due);
    assert!(general.receiver.try_recv().is_ok());
    assert!(general.receiver.try_recv().is_err());

    clock.advance(Duration::from_secs(9));
    scheduler.tick(clock.now(), &mut due);
    assert!(general.receiver.try_recv().is_err());

    clock.advance(Duration::from_secs(1));
    scheduler.tick(clock.now(), &mut due);
    assert!(general.receiver.try_recv().is_ok());
}

#[tokio::test]
async fn run_stops_promptly_when_cancelled() {
    let clock = FakeClock::new();
    let (queues, _receivers) = TaskQueues::new();
    let scheduler = Scheduler::new(queues, clock, vec![spec(Duration::from_secs(60))]);
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    let handle = tokio::spawn(scheduler.run(cancel_clone, Duration::from_millis(5), Duration::ZERO));

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("scheduler did not stop after cancellation")
        .expect("task panicked");
}
