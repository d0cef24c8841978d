// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-side RPC clients for the shared cache and the inference
//! supervisor, both of which live only in the host process. Every
//! request is multiplexed onto the worker's single outbound pipe and
//! correlated back to its response by `RequestId`.

use async_trait::async_trait;
use corvid_cache::{Cache, CacheError};
use corvid_core::{config, ServiceKind};
use corvid_wire::{CacheRequest, CacheResponse, RequestId, ServiceRequest, ServiceResponse, WorkerOutbound};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};

/// Owns the outbound sender and the pending-request tables for both RPC
/// surfaces multiplexed over one pipe. Cheap to clone; all state is
/// behind `Arc`-backed interior structures.
pub struct RemoteHandle {
    outbound: mpsc::UnboundedSender<WorkerOutbound>,
    next_id: AtomicU64,
    pending_cache: Mutex<HashMap<RequestId, oneshot::Sender<CacheResponse>>>,
    pending_service: Mutex<HashMap<RequestId, oneshot::Sender<ServiceResponse>>>,
}

impl RemoteHandle {
    pub fn new(outbound: mpsc::UnboundedSender<WorkerOutbound>) -> Self {
        Self {
            outbound,
            next_id: AtomicU64::new(0),
            pending_cache: Mutex::new(HashMap::new()),
            pending_service: Mutex::new(HashMap::new()),
        }
    }

    fn next_request_id(&self) -> RequestId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn cache_request(&self, request: CacheRequest) -> Result<CacheResponse, CacheError> {
        let request_id = self.next_request_id();
        let (tx, rx) = oneshot::channel();
        self.pending_cache.lock().insert(request_id, tx);
        self.outbound
            .send(WorkerOutbound::Cache { request_id, request })
            .map_err(|_| CacheError::Transport("host pipe closed".into()))?;
        rx.await.map_err(|_| CacheError::Transport("host dropped the request".into()))
    }

    /// Issue a `ServiceRequest` and wait for its correlated result.
    /// Returns `Err` only if the pipe to the host is gone; a refused
    /// acquire still comes back as `Ok(ServiceResponse::Unavailable)`.
    pub async fn service_request(&self, request: ServiceRequest) -> Result<ServiceResponse, String> {
        let request_id = self.next_request_id();
        let (tx, rx) = oneshot::channel();
        self.pending_service.lock().insert(request_id, tx);
        self.outbound
            .send(WorkerOutbound::Service { request_id, request })
            .map_err(|_| "host pipe closed".to_string())?;
        rx.await.map_err(|_| "host dropped the request".to_string())
    }

    /// Called by the run loop's inbound demux when a `CacheResult`
    /// frame arrives.
    pub fn complete_cache(&self, request_id: RequestId, result: CacheResponse) {
        if let Some(tx) = self.pending_cache.lock().remove(&request_id) {
            let _ = tx.send(result);
        }
    }

    /// Called by the run loop's inbound demux when a `ServiceResult`
    /// frame arrives.
    pub fn complete_service(&self, request_id: RequestId, result: ServiceResponse) {
        if let Some(tx) = self.pending_service.lock().remove(&request_id) {
            let _ = tx.send(result);
        }
    }

    /// The same outbound sender RPC requests are multiplexed onto, so
    /// the run loop can interleave `Completion`/`Ready`/`CallableError`
    /// frames from the same queue without a second writer task.
    pub fn outbound_sender(&self) -> mpsc::UnboundedSender<WorkerOutbound> {
        self.outbound.clone()
    }
}

/// Build a fresh `RemoteHandle` together with the receiver its owning
/// run loop drains to write frames to the host. Called once at worker
/// startup.
pub fn channel() -> (std::sync::Arc<RemoteHandle>, mpsc::UnboundedReceiver<WorkerOutbound>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (std::sync::Arc::new(RemoteHandle::new(tx)), rx)
}

/// Implements `corvid_cache::Cache` by round-tripping every call through
/// the host over the wire protocol, so task code can use the same
/// `Cache` trait whether it runs in-process (tests) or in a worker.
#[derive(Clone)]
pub struct RemoteCache(std::sync::Arc<RemoteHandle>);

impl RemoteCache {
    pub fn new(handle: std::sync::Arc<RemoteHandle>) -> Self {
        Self(handle)
    }
}

#[async_trait]
impl Cache for RemoteCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        match self.0.cache_request(CacheRequest::Get { key: key.to_string() }).await? {
            CacheResponse::Value { value } => Ok(value),
            other => Err(unexpected("Get", other)),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
        match self.0.cache_request(CacheRequest::Set { key: key.to_string(), value }).await? {
            CacheResponse::Value { .. } => Ok(()),
            other => Err(unexpected("Set", other)),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        match self.0.cache_request(CacheRequest::Delete { key: key.to_string() }).await? {
            CacheResponse::Deleted { existed } => Ok(existed),
            other => Err(unexpected("Delete", other)),
        }
    }

    async fn lock(&self, key: &str) -> Result<(), CacheError> {
        match self.0.cache_request(CacheRequest::Lock { key: key.to_string() }).await? {
            CacheResponse::Locked => Ok(()),
            other => Err(unexpected("Lock", other)),
        }
    }

    async fn unlock(&self, key: &str) -> Result<(), CacheError> {
        match self.0.cache_request(CacheRequest::Unlock { key: key.to_string() }).await? {
            CacheResponse::Unlocked => Ok(()),
            other => Err(unexpected("Unlock", other)),
        }
    }
}

fn unexpected(op: &str, response: CacheResponse) -> CacheError {
    CacheError::Transport(format!("unexpected response to {op}: {response:?}"))
}

/// Worker-side handle onto the host's inference supervisor. Tasks that
/// need a model server acquire/release around their call, exactly like
/// `InferenceSupervisor::use_service` does in-host.
#[derive(Clone)]
pub struct RemoteService(std::sync::Arc<RemoteHandle>);

impl RemoteService {
    pub fn new(handle: std::sync::Arc<RemoteHandle>) -> Self {
        Self(handle)
    }

    pub async fn acquire(&self, kind: ServiceKind) -> Result<(), String> {
        match self.0.service_request(ServiceRequest::Acquire { kind }).await? {
            ServiceResponse::Acquired => Ok(()),
            ServiceResponse::Unavailable { reason } => Err(reason),
            other => Err(format!("unexpected response to Acquire: {other:?}")),
        }
    }

    pub async fn release(&self, kind: ServiceKind) {
        let _ = self.0.service_request(ServiceRequest::Release { kind }).await;
    }

    /// Acquire `kind`, run `f`, release unconditionally, mirroring
    /// `InferenceSupervisor::use_service`'s scoping from the worker side.
    ///
    /// When `kind` is disabled, short-circuits to `f()` directly: the
    /// worker process inherits the same environment the host reads
    /// `CORVID_COMPLETION_ENABLED` from, so this is checked locally
    /// rather than round-tripping an `Acquire` the host would refuse
    /// anyway.
    pub async fn use_service<F, Fut, T>(&self, kind: ServiceKind, f: F) -> Result<T, String>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        if kind == ServiceKind::Completion && !config::completion_enabled() {
            return Ok(f().await);
        }

        self.acquire(kind).await?;
        let result = f().await;
        self.release(kind).await;
        Ok(result)
    }
}

#[cfg(test)]
#[path = "rpc_client_tests.rs"]
mod tests;
