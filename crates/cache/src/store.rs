// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared key/value cache: the host's single source of truth for data
//! visible across the worker pool and the inference supervisor.
//!
//! Every worker process and the host itself see the same `HostCache`
//! instance's values — workers just reach it over RPC instead of
//! in-process. `ServiceState` is stored here under
//! `ServiceKind::cache_key()` for exactly that reason.

use async_trait::async_trait;
use parking_lot::Mutex as SyncMutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache transport error: {0}")]
    Transport(String),
}

/// The cache's operations, implemented directly by `HostCache` in the
/// host process and by a remote RPC client inside each worker process
/// (see `corvid-worker`'s `cache` module).
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), CacheError>;
    /// Returns whether the key existed prior to deletion.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;
    /// Acquire the named mutex, blocking until held.
    async fn lock(&self, key: &str) -> Result<(), CacheError>;
    async fn unlock(&self, key: &str) -> Result<(), CacheError>;
}

/// In-process, host-authoritative cache. Values live in a plain
/// `HashMap` guarded by a `parking_lot::Mutex` since lookups are quick
/// and never held across an `.await`; named locks use `tokio::sync::Mutex`
/// since `with_lock` callers hold them across arbitrary async work.
#[derive(Clone, Default)]
pub struct HostCache {
    values: Arc<SyncMutex<HashMap<String, Value>>>,
    locks: Arc<SyncMutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
    /// Guards currently held via the RPC-facing `lock`/`unlock` pair.
    /// Dropping the entry releases the mutex.
    held: Arc<SyncMutex<HashMap<String, OwnedMutexGuard<()>>>>,
}

impl HostCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, key: &str) -> Arc<AsyncMutex<()>> {
        self.locks.lock().entry(key.to_string()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
    }

    /// Run `f` while holding the named mutex, mirroring the teacher
    /// corpus's `WithLock` scoped-acquisition idiom. Unlike `lock`/`unlock`
    /// (exposed over RPC for worker processes), this never releases the
    /// lock to anyone else mid-call.
    pub async fn with_lock<F, Fut, T>(&self, key: &str, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        let lock = self.lock_for(key);
        let _guard = lock.lock().await;
        f().await
    }
}

#[async_trait]
impl Cache for HostCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        Ok(self.values.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.values.lock().remove(key).is_some())
    }

    async fn lock(&self, key: &str) -> Result<(), CacheError> {
        let lock = self.lock_for(key);
        let guard = lock.lock_owned().await;
        self.held.lock().insert(key.to_string(), guard);
        Ok(())
    }

    async fn unlock(&self, key: &str) -> Result<(), CacheError> {
        // Dropping the guard releases the mutex for the next `lock` caller.
        self.held.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
