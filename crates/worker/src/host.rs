// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host-side half of the worker protocol: spawns the queue's worker
//! process, forwards queued tasks down its stdin, and answers the
//! `Cache`/`Service` RPCs its stdout multiplexes back up. One
//! `WorkerHandle` per queue, matching spec.md §4.7's "one worker unit
//! per queue name, in a separate OS process".

use crate::process;
use corvid_cache::{Cache as _, HostCache};
use corvid_core::{CompletionEvent, QueueName, Task, WorkerId};
use corvid_inference::InferenceSupervisor;
use corvid_queue::DedupIndex;
use corvid_wire::{read_framed, write_framed, CacheRequest, CacheResponse, ServiceRequest, ServiceResponse};
use corvid_wire::{WorkerInbound, WorkerOutbound};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::process::Child;
use tokio::sync::{mpsc, Mutex as AsyncMutex};

/// Handle to one running queue worker process. Dropping it does not
/// terminate the child; call `shutdown` explicitly, mirroring the
/// daemon's documented stop sequence (spec.md §5).
pub struct WorkerHandle {
    pub queue: QueueName,
    /// One of the three fixed queue workers' identities, derived from
    /// its queue name. Distinct from the teacher's pool of arbitrary
    /// worker members, but kept as the same newtype for log field
    /// consistency with the rest of the corpus's id handling.
    pub id: WorkerId,
    child: Child,
}

impl WorkerHandle {
    /// Spawn the worker process, wire its stdin to drain `task_rx`, and
    /// wire its stdout to answer cache/service RPCs and forward
    /// `Completion` events to `completions`.
    pub async fn spawn(
        queue: QueueName,
        task_rx: mpsc::UnboundedReceiver<Task>,
        cache: HostCache,
        inference: InferenceSupervisor,
        dedup: DedupIndex,
        completions: mpsc::UnboundedSender<CompletionEvent>,
    ) -> io::Result<Self> {
        let mut child = process::spawn(queue)?;
        let stdin = child.stdin.take().expect("child spawned with piped stdin");
        let stdout = child.stdout.take().expect("child spawned with piped stdout");
        let stderr = child.stderr.take();

        let stdin = Arc::new(AsyncMutex::new(stdin));

        if let Some(stderr) = stderr {
            tokio::spawn(forward_stderr(queue, stderr));
        }

        tokio::spawn(forward_tasks(stdin.clone(), task_rx));
        tokio::spawn(dispatch(queue, BufReader::new(stdout), stdin, cache, inference, dedup, completions));

        Ok(Self { queue, id: WorkerId::new(queue.as_str()), child })
    }

    /// Best-effort graceful stop: the forwarding task already closes the
    /// child's stdin with a trailing `Shutdown` frame once its queue
    /// receiver is dropped. This waits for exit, then escalates to
    /// SIGTERM/SIGKILL if the process is still alive, matching spec.md
    /// §5's "host then sends a terminate signal and joins".
    pub async fn shutdown(mut self) {
        let pid = self.child.id();
        if tokio::time::timeout(std::time::Duration::from_secs(2), self.child.wait()).await.is_err() {
            tracing::info!(worker_id = %self.id, "worker did not exit after shutdown frame, terminating");
            if let Some(pid) = pid {
                corvid_inference::terminate(pid).await;
            }
            let _ = self.child.wait().await;
        }
    }
}

async fn forward_tasks<W: AsyncWrite + Unpin>(
    stdin: Arc<AsyncMutex<W>>,
    mut task_rx: mpsc::UnboundedReceiver<Task>,
) {
    while let Some(task) = task_rx.recv().await {
        let mut guard = stdin.lock().await;
        if write_framed(&mut *guard, &WorkerInbound::Task { task }).await.is_err() {
            return;
        }
    }
    let mut guard = stdin.lock().await;
    let _ = write_framed(&mut *guard, &WorkerInbound::Shutdown).await;
}

async fn forward_stderr<R: AsyncRead + Unpin>(queue: QueueName, stderr: R) {
    use tokio::io::AsyncBufReadExt;
    let mut lines = BufReader::new(stderr).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => tracing::info!(queue = %queue, "{line}"),
            Ok(None) => return,
            Err(err) => {
                tracing::warn!(queue = %queue, error = %err, "error reading worker stderr");
                return;
            }
        }
    }
}

async fn dispatch<R: AsyncRead + Unpin, W: AsyncWrite + Unpin>(
    queue: QueueName,
    mut stdout: R,
    stdin: Arc<AsyncMutex<W>>,
    cache: HostCache,
    inference: InferenceSupervisor,
    dedup: DedupIndex,
    completions: mpsc::UnboundedSender<CompletionEvent>,
) {
    loop {
        let message = match read_framed::<WorkerOutbound, _>(&mut stdout).await {
            Ok(message) => message,
            Err(err) => {
                tracing::info!(queue = %queue, error = %err, "worker pipe closed");
                return;
            }
        };

        match message {
            WorkerOutbound::Completion { event } => {
                // Releases the fingerprint so an identical submission is
                // accepted again, matching spec.md §4.5's "the
                // fingerprint remains until the worker returns from
                // executing that Task".
                dedup.remove(event.fingerprint);
                let _ = completions.send(event);
            }
            WorkerOutbound::Ready => tracing::info!(queue = %queue, "worker ready"),
            WorkerOutbound::CallableError { callable_id, message } => {
                tracing::error!(queue = %queue, %callable_id, %message, "worker reported task error");
            }
            WorkerOutbound::Cache { request_id, request } => {
                let result = handle_cache_request(&cache, request).await;
                let mut guard = stdin.lock().await;
                if write_framed(&mut *guard, &WorkerInbound::CacheResult { request_id, result }).await.is_err() {
                    return;
                }
            }
            WorkerOutbound::Service { request_id, request } => {
                let result = handle_service_request(&inference, request).await;
                let mut guard = stdin.lock().await;
                if write_framed(&mut *guard, &WorkerInbound::ServiceResult { request_id, result }).await.is_err() {
                    return;
                }
            }
        }
    }
}

async fn handle_cache_request(cache: &HostCache, request: CacheRequest) -> CacheResponse {
    match request {
        CacheRequest::Get { key } => CacheResponse::Value { value: cache.get(&key).await.unwrap_or(None) },
        CacheRequest::Set { key, value } => {
            let _ = cache.set(&key, value).await;
            CacheResponse::Value { value: None }
        }
        CacheRequest::Delete { key } => CacheResponse::Deleted { existed: cache.delete(&key).await.unwrap_or(false) },
        CacheRequest::Lock { key } => {
            let _ = cache.lock(&key).await;
            CacheResponse::Locked
        }
        CacheRequest::Unlock { key } => {
            let _ = cache.unlock(&key).await;
            CacheResponse::Unlocked
        }
    }
}

async fn handle_service_request(inference: &InferenceSupervisor, request: ServiceRequest) -> ServiceResponse {
    match request {
        ServiceRequest::Acquire { kind } => match inference.acquire(kind).await {
            Ok(()) => ServiceResponse::Acquired,
            Err(reason) => ServiceResponse::Unavailable { reason: reason.to_string() },
        },
        ServiceRequest::Release { kind } => {
            inference.release(kind).await;
            ServiceResponse::Released
        }
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
