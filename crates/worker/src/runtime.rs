// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker process's own run loop: read `Task`/`Shutdown` frames from
//! the host, resolve and execute callables, and report completion.
//! Matches spec.md §4.7: blocks on its queue, resolves the callable by
//! id, executes, and on return (success or exception) emits a
//! completion event and loops without dying.

use crate::registry::CallableRegistry;
use crate::rpc_client::RemoteHandle;
use corvid_core::{CallableId, Clock, CompletionEvent, SystemClock, Task, TaskOutcome};
use corvid_wire::{read_framed, write_framed, WorkerInbound, WorkerOutbound};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

/// Runs the worker's read/execute/report loop until the host sends
/// `Shutdown` or closes the pipe.
///
/// `remote` and `outbound_rx` come from `rpc_client::channel()`, called
/// once at worker startup before `registry` is built, so callables can
/// be registered as closures capturing `RemoteCache`/`RemoteService`
/// clients built from the same `remote` handle.
pub async fn run<R, W>(
    registry: CallableRegistry,
    remote: Arc<RemoteHandle>,
    outbound_rx: mpsc::UnboundedReceiver<WorkerOutbound>,
    input: R,
    output: W,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let outbound_tx = remote.outbound_sender();
    let writer = tokio::spawn(write_loop(output, outbound_rx));

    let _ = outbound_tx.send(WorkerOutbound::Ready);

    read_loop(registry, remote, input, outbound_tx).await;

    // Dropping the sender closes `outbound_rx`, letting `write_loop`
    // finish after flushing whatever completion frames are still queued.
    let _ = writer.await;
    Ok(())
}

async fn read_loop<R: AsyncRead + Unpin>(
    registry: CallableRegistry,
    remote: Arc<RemoteHandle>,
    mut input: R,
    outbound: mpsc::UnboundedSender<WorkerOutbound>,
) {
    loop {
        let message = match read_framed::<WorkerInbound, _>(&mut input).await {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(error = %err, "worker pipe closed, shutting down");
                return;
            }
        };

        match message {
            WorkerInbound::Task { task } => execute(&registry, task, &outbound).await,
            WorkerInbound::CacheResult { request_id, result } => remote.complete_cache(request_id, result),
            WorkerInbound::ServiceResult { request_id, result } => remote.complete_service(request_id, result),
            WorkerInbound::Shutdown => {
                tracing::info!("worker received shutdown");
                return;
            }
        }
    }
}

async fn write_loop<W: AsyncWrite + Unpin>(mut output: W, mut outbound_rx: mpsc::UnboundedReceiver<WorkerOutbound>) {
    while let Some(message) = outbound_rx.recv().await {
        if let Err(err) = write_framed(&mut output, &message).await {
            tracing::warn!(error = %err, "failed writing to host pipe");
            return;
        }
    }
}

/// Executes one task on its own tokio task so a panicking callable
/// cannot take the worker's read loop down with it, matching spec.md
/// §4.7.4's "exceptions are caught... and do not terminate the worker".
async fn execute(registry: &CallableRegistry, task: Task, outbound: &mpsc::UnboundedSender<WorkerOutbound>) {
    let callable_id = task.callable_id.clone();
    let fingerprint = task.fingerprint();
    let outcome = match registry.get(&callable_id) {
        Some(callable) => match tokio::spawn(callable(task.args, task.kwargs)).await {
            Ok(Ok(())) => TaskOutcome::Success,
            Ok(Err(message)) => {
                report_error(outbound, callable_id.clone(), message);
                TaskOutcome::Failed
            }
            Err(join_err) => {
                report_error(outbound, callable_id.clone(), join_err.to_string());
                TaskOutcome::Failed
            }
        },
        None => {
            report_error(outbound, callable_id.clone(), "no callable registered under this id".to_string());
            TaskOutcome::Failed
        }
    };

    let event = CompletionEvent { callable_id, fingerprint, epoch_ms: SystemClock.epoch_ms(), outcome };
    let _ = outbound.send(WorkerOutbound::Completion { event });
}

fn report_error(outbound: &mpsc::UnboundedSender<WorkerOutbound>, callable_id: CallableId, message: String) {
    tracing::error!(%callable_id, %message, "task failed");
    let _ = outbound.send(WorkerOutbound::CallableError { callable_id, message });
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
