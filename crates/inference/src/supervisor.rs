// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The inference supervisor: scoped acquire/release around the two
//! model-server child processes, with idle-shutdown and force-stop.
//!
//! State for each `ServiceKind` lives in the shared cache under
//! `ServiceKind::cache_key()` rather than supervisor-local memory, so
//! every worker process observes the same `usage_count`/`phase` even
//! though only the host ever spawns or kills the child.

use crate::{readiness, spawn, terminate};
use corvid_cache::{Cache as _, HostCache};
use corvid_core::{config, Clock, ServiceKind, ServicePhase, ServiceState, ServiceUnavailable};
use std::fs::OpenOptions;
use std::future::Future;

#[derive(Clone)]
pub struct InferenceSupervisor<C: Clock + 'static = corvid_core::SystemClock> {
    cache: HostCache,
    clock: C,
}

impl<C: Clock + 'static> InferenceSupervisor<C> {
    pub fn new(cache: HostCache, clock: C) -> Self {
        Self { cache, clock }
    }

    /// Acquire `kind`, spawning it on first use, run `f`, then release.
    /// Mirrors the original `use_inference_service` decorator: the
    /// process is never torn down synchronously on release — it lingers
    /// for `idle_shutdown_delay` in case another call arrives.
    ///
    /// When `kind` is disabled, short-circuits straight to `f()` without
    /// touching `ServiceState` or spawning anything.
    pub async fn use_service<F, Fut, T>(&self, kind: ServiceKind, f: F) -> Result<T, ServiceUnavailable>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if kind == ServiceKind::Completion && !config::completion_enabled() {
            return Ok(f().await);
        }

        self.acquire(kind).await?;
        let result = f().await;
        self.release(kind).await;
        Ok(result)
    }

    /// Acquire `kind` directly, without the `use_service` RAII scope.
    /// Exists for the worker-side RPC client, which issues `Acquire` and
    /// `Release` as two independent requests rather than one bundled
    /// closure.
    ///
    /// The readiness poll inside `spawn_and_wait_ready` runs unlocked:
    /// only the `ServiceState` transitions themselves are made under the
    /// named lock, never the HTTP call that can take up to
    /// `readiness_timeout`.
    pub async fn acquire(&self, kind: ServiceKind) -> Result<(), ServiceUnavailable> {
        if kind == ServiceKind::Completion && !config::completion_enabled() {
            return Err(ServiceUnavailable::Disabled { kind });
        }
        let key = kind.cache_key();

        let needs_spawn = {
            let cache = self.cache.clone();
            let key = key.clone();
            self.cache
                .with_lock(&key, move || async move {
                    let mut state = read_state(&cache, &key).await;
                    let needs_spawn = state.phase == ServicePhase::Idle;
                    if needs_spawn {
                        state.phase = ServicePhase::Starting;
                        write_state(&cache, &key, &state).await;
                    }
                    needs_spawn
                })
                .await
        };

        if needs_spawn {
            let spawned = spawn_and_wait_ready(kind).await;
            let cache = self.cache.clone();
            let key = key.clone();
            self.cache
                .with_lock(&key, move || async move {
                    let mut state = read_state(&cache, &key).await;
                    match spawned {
                        Ok(pid) => {
                            state.phase = ServicePhase::Ready;
                            state.pid = Some(pid);
                            write_state(&cache, &key, &state).await;
                            Ok(())
                        }
                        Err(err) => {
                            state.phase = ServicePhase::Idle;
                            state.pid = None;
                            write_state(&cache, &key, &state).await;
                            Err(err)
                        }
                    }
                })
                .await?;
        }

        let cache = self.cache.clone();
        let clock = self.clock.clone();
        self.cache
            .with_lock(&key, move || async move {
                let mut state = read_state(&cache, &key).await;
                state.usage_count += 1;
                state.shutdown_scheduled = false;
                state.last_used_epoch_ms = clock.epoch_ms();
                write_state(&cache, &key, &state).await;
            })
            .await;
        Ok(())
    }

    /// Release `kind` directly; see `acquire`'s doc comment.
    pub async fn release(&self, kind: ServiceKind) {
        let key = kind.cache_key();
        let cache = self.cache.clone();
        self.cache
            .with_lock(&key, move || async move {
                let mut state = read_state(&cache, &key).await;
                state.usage_count = state.usage_count.saturating_sub(1);
                if state.usage_count == 0 {
                    state.shutdown_scheduled = true;
                }
                write_state(&cache, &key, &state).await;
            })
            .await;

        let supervisor = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(config::idle_shutdown_delay()).await;
            supervisor.shutdown_if_still_idle(kind).await;
        });
    }

    /// Runs after the idle-shutdown delay; only tears the process down
    /// if nothing re-acquired it in the meantime.
    async fn shutdown_if_still_idle(&self, kind: ServiceKind) {
        let key = kind.cache_key();
        let cache = self.cache.clone();
        self.cache
            .with_lock(&key, move || async move {
                let mut state = read_state(&cache, &key).await;
                if state.usage_count == 0 && state.shutdown_scheduled {
                    if let Some(pid) = state.pid.take() {
                        terminate::terminate(pid).await;
                    }
                    state.phase = ServicePhase::Idle;
                    state.shutdown_scheduled = false;
                    write_state(&cache, &key, &state).await;
                }
            })
            .await;
    }

    /// Unconditionally terminate `kind`, regardless of `usage_count`.
    pub async fn force_stop(&self, kind: ServiceKind) {
        let key = kind.cache_key();
        let cache = self.cache.clone();
        self.cache
            .with_lock(&key, move || async move {
                let mut state = read_state(&cache, &key).await;
                if let Some(pid) = state.pid.take() {
                    state.phase = ServicePhase::Stopping;
                    write_state(&cache, &key, &state).await;
                    terminate::terminate(pid).await;
                }
                state.phase = ServicePhase::Idle;
                state.usage_count = 0;
                state.shutdown_scheduled = false;
                write_state(&cache, &key, &state).await;
            })
            .await;
    }

    /// Force-stop both services, used during daemon shutdown.
    pub async fn force_stop_all(&self) {
        for kind in ServiceKind::ALL {
            self.force_stop(kind).await;
        }
    }
}

async fn spawn_and_wait_ready(kind: ServiceKind) -> Result<u32, ServiceUnavailable> {
    let port = match kind {
        ServiceKind::Embedding => config::embedding_port(),
        ServiceKind::Completion => config::completion_port(),
    };

    let log_dir = config::log_dir();
    let _ = std::fs::create_dir_all(&log_dir);
    let stdout = open_log(&log_dir, kind, "stdout");
    let stderr = open_log(&log_dir, kind, "stderr");

    let cmd = spawn::build_command(kind, port, stdout, stderr);
    let pid = spawn::spawn_and_reap(cmd, kind).map_err(|e| ServiceUnavailable::SpawnFailed {
        kind,
        reason: e.to_string(),
    })?;

    readiness::wait_until_ready(kind, port)
        .await
        .map_err(|_| ServiceUnavailable::ReadinessTimeout { kind })?;

    Ok(pid)
}

fn open_log(log_dir: &std::path::Path, kind: ServiceKind, stream: &str) -> std::process::Stdio {
    let path = log_dir.join(format!("{kind}_{stream}.log"));
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file.into(),
        Err(_) => std::process::Stdio::null(),
    }
}

async fn read_state(cache: &HostCache, key: &str) -> ServiceState {
    cache
        .get(key)
        .await
        .ok()
        .flatten()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

async fn write_state(cache: &HostCache, key: &str, state: &ServiceState) {
    if let Ok(value) = serde_json::to_value(state) {
        let _ = cache.set(key, value).await;
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
