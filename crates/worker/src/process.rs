// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns a queue worker as a re-exec of the current binary, matching
//! the inference supervisor's own child-process idiom (`corvid_inference::spawn`)
//! but invoking ourselves rather than an external model server.

use corvid_core::QueueName;
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Build the `corvidd --worker <queue>` command, piped on all three
/// standard streams so the host can speak the wire protocol over
/// stdin/stdout and forward stderr into the log multiplexer.
pub fn build_command(queue: QueueName) -> std::io::Result<Command> {
    let exe = std::env::current_exe()?;
    let mut cmd = Command::new(exe);
    cmd.arg("--worker")
        .arg(queue.as_str())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    Ok(cmd)
}

/// Spawn `corvidd --worker <queue>` with piped stdin/stdout/stderr.
pub fn spawn(queue: QueueName) -> std::io::Result<Child> {
    build_command(queue)?.spawn()
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
