// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! C2 Log Multiplexer: one `tracing` subscriber shared by the host and
//! every queue worker's forwarded stderr, writing to a rolling file
//! under `config::log_dir()` in addition to stderr.

use corvid_core::config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber. The returned guard must be kept
/// alive for the process's lifetime; dropping it stops the background
/// flush thread and silently truncates any buffered log lines.
pub fn init(process_name: &'static str) -> WorkerGuard {
    let log_dir = config::log_dir();
    let _ = std::fs::create_dir_all(&log_dir);
    let appender = tracing_appender::rolling::daily(&log_dir, format!("{process_name}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config::log_filter()))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    guard
}
