// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access, mirroring the teacher's
//! `daemon::env` module's "resolve with fallback chain" style.

use std::path::PathBuf;
use std::time::Duration;

/// Idle-shutdown delay before a drained service's process is torn down.
/// Spec.md §4.3/§9 specifies 5s as the default, explicitly adjustable.
pub fn idle_shutdown_delay() -> Duration {
    env_duration_ms("CORVID_IDLE_SHUTDOWN_MS", Duration::from_secs(5))
}

/// Hard timeout for the readiness poll after spawning a model server.
pub fn readiness_timeout() -> Duration {
    env_duration_ms("CORVID_READINESS_TIMEOUT_MS", Duration::from_secs(60))
}

/// Interval between readiness poll attempts.
pub fn readiness_poll_interval() -> Duration {
    env_duration_ms("CORVID_READINESS_POLL_MS", Duration::from_secs(1))
}

/// Grace period between a graceful terminate and a forced kill.
pub fn terminate_grace_period() -> Duration {
    env_duration_ms("CORVID_TERMINATE_GRACE_MS", Duration::from_secs(5))
}

/// Heartbeat interval sent to each connected Event Bus client.
pub fn heartbeat_interval() -> Duration {
    env_duration_ms("CORVID_HEARTBEAT_MS", Duration::from_secs(10))
}

/// Blocking-read timeout each worker uses when polling its queue.
pub fn queue_poll_timeout() -> Duration {
    env_duration_ms("CORVID_QUEUE_POLL_MS", Duration::from_secs(1))
}

/// Tick interval for the scheduler's recurring-task loop.
pub fn scheduler_tick_interval() -> Duration {
    env_duration_ms("CORVID_SCHEDULER_TICK_MS", Duration::from_secs(1))
}

/// Startup grace before the first recurring submission, so one-time
/// setup tasks enqueued at boot get a head start (spec.md §4.6).
pub fn scheduler_startup_grace() -> Duration {
    env_duration_ms("CORVID_SCHEDULER_GRACE_MS", Duration::from_secs(5))
}

/// Fixed localhost port for the embedding model server.
pub fn embedding_port() -> u16 {
    env_u16("CORVID_EMBEDDING_PORT", 17726)
}

/// Fixed localhost port for the completion model server.
pub fn completion_port() -> u16 {
    env_u16("CORVID_COMPLETION_PORT", 17727)
}

/// Path to the model-server executable the inference supervisor spawns.
pub fn model_server_exe() -> PathBuf {
    std::env::var("CORVID_MODEL_SERVER_EXE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("llamafile"))
}

/// Directory containing the `.gguf` model weight files.
pub fn models_dir() -> PathBuf {
    std::env::var("CORVID_MODELS_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("models"))
}

/// Model file name and context size for one service kind, mirroring the
/// original implementation's per-model-type constants.
pub fn model_file_name(kind: crate::ServiceKind) -> &'static str {
    match kind {
        crate::ServiceKind::Embedding => "mxbai-embed-large-v1-f16.gguf",
        crate::ServiceKind::Completion => "gemma-2-9b-it-Q5_K_M.gguf",
    }
}

pub fn model_context_size(kind: crate::ServiceKind) -> u32 {
    match kind {
        crate::ServiceKind::Embedding => 512,
        crate::ServiceKind::Completion => 8192,
    }
}

/// Resolve state directory: `CORVID_STATE_DIR` > `XDG_STATE_HOME/corvid` >
/// `~/.local/state/corvid`.
pub fn state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("CORVID_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("corvid"));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".local/state/corvid"))
}

/// Directory append-only child stdout/stderr logs are written under.
pub fn log_dir() -> PathBuf {
    std::env::var("CORVID_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().unwrap_or_else(|| PathBuf::from("/tmp/corvid")).join("logs"))
}

/// `EnvFilter` directive for `tracing-subscriber`.
pub fn log_filter() -> String {
    std::env::var("CORVID_LOG").unwrap_or_else(|_| "info".to_string())
}

/// Whether the completion model is enabled. The completion service is
/// optional at runtime (spec.md §4.3); when disabled, `UseService`
/// short-circuits to calling the wrapped function directly.
pub fn completion_enabled() -> bool {
    std::env::var("CORVID_COMPLETION_ENABLED")
        .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(true)
}

fn env_duration_ms(name: &str, default: Duration) -> Duration {
    std::env::var(name).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis).unwrap_or(default)
}

fn env_u16(name: &str, default: u16) -> u16 {
    std::env::var(name).ok().and_then(|s| s.parse::<u16>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
