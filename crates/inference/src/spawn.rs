// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Model server process creation and the reaper task that waits on it.

use corvid_core::{config, ServiceKind};
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Spawn the model server for `kind` bound to `port`, piping its stdout
/// and stderr to the caller's log files. Lowers the process's scheduling
/// priority with `nice` on Unix, mirroring the original daemon's
/// `settings.os_name == 'Darwin'` special case generalized to all
/// non-Windows platforms (Windows priority is set post-spawn instead; see
/// `set_below_normal_priority`).
pub fn build_command(kind: ServiceKind, port: u16, stdout: Stdio, stderr: Stdio) -> Command {
    let exe = config::model_server_exe();
    let model_path = config::models_dir().join(config::model_file_name(kind));
    let context_size = config::model_context_size(kind).to_string();

    let mut cmd = if cfg!(unix) {
        let mut c = Command::new("nice");
        c.arg("-n").arg("10").arg(&exe);
        c
    } else {
        Command::new(&exe)
    };

    cmd.arg("--server")
        .arg("--nobrowser")
        .arg("--port")
        .arg(port.to_string())
        .arg("-ngl")
        .arg("9999")
        .arg("--no-mmap")
        .arg("--ctx-size")
        .arg(&context_size)
        .arg("--model")
        .arg(&model_path)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr);

    cmd
}

/// Spawn the server and detach a reaper task that logs its exit, so the
/// child never lingers as a zombie once it terminates.
pub fn spawn_and_reap(mut cmd: Command, kind: ServiceKind) -> std::io::Result<u32> {
    let child: Child = cmd.spawn()?;
    let pid = child.id().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "spawned child has no pid")
    })?;

    tokio::spawn(async move {
        match child.wait_with_output().await {
            Ok(output) => {
                tracing::warn!(
                    service = %kind,
                    exit_status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "model server process exited"
                );
            }
            Err(e) => {
                tracing::error!(service = %kind, error = %e, "failed to wait on model server process");
            }
        }
    });

    Ok(pid)
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
