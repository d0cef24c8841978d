// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graceful-then-forceful process termination: SIGTERM, wait out the
//! grace period, SIGKILL if the process is still alive.

use corvid_core::config;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// Send `SIGTERM` to `pid`, wait `terminate_grace_period`, then `SIGKILL`
/// if it is still alive. Mirrors the original daemon's
/// `os.kill(pid, 15)` followed by a 5-second sleep and `os.kill(pid, 9)`.
pub async fn terminate(pid: u32) {
    let nix_pid = Pid::from_raw(pid as i32);

    if signal::kill(nix_pid, Signal::SIGTERM).is_err() {
        // Already gone.
        return;
    }

    tokio::time::sleep(config::terminate_grace_period()).await;

    if is_alive(nix_pid) {
        let _ = signal::kill(nix_pid, Signal::SIGKILL);
    }
}

fn is_alive(pid: Pid) -> bool {
    // Signal 0 performs no-op permission/existence checks only.
    signal::kill(pid, None).is_ok()
}

#[cfg(test)]
#[path = "terminate_tests.rs"]
mod tests;
