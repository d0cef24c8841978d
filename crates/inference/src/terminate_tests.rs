// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[tokio::test]
#[serial(corvid_env)]
async fn terminate_kills_a_real_child_process() {
    std::env::set_var("CORVID_TERMINATE_GRACE_MS", "50");

    let mut child = tokio::process::Command::new("sleep")
        .arg("30")
        .spawn()
        .expect("spawn sleep");
    let pid = child.id().expect("pid");

    terminate(pid).await;

    let status = tokio::time::timeout(std::time::Duration::from_secs(2), child.wait())
        .await
        .expect("child did not exit after terminate")
        .expect("wait");
    assert!(!status.success());

    std::env::remove_var("CORVID_TERMINATE_GRACE_MS");
}

#[tokio::test]
async fn terminate_on_already_dead_pid_does_not_panic() {
    // A pid unlikely to exist. Best-effort; kill(2) returning ESRCH just
    // means `terminate` returns early.
    terminate(999_999).await;
}
