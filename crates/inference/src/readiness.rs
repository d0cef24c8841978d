// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Readiness polling: HTTP GET against the model server's health
//! endpoint until it reports itself ready or the timeout elapses.

use corvid_core::{config, ReadinessBody, ServiceKind};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("model server did not become ready within the timeout")]
pub struct ReadinessTimedOut;

/// Poll `http://127.0.0.1:{port}/health` once per
/// `readiness_poll_interval` until `ReadinessBody::is_ready_for(kind)`
/// or `readiness_timeout` elapses.
pub async fn wait_until_ready(kind: ServiceKind, port: u16) -> Result<(), ReadinessTimedOut> {
    let url = format!("http://127.0.0.1:{port}/health");
    let deadline = tokio::time::Instant::now() + config::readiness_timeout();
    let poll_interval = config::readiness_poll_interval();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap_or_default();

    loop {
        if let Ok(response) = client.get(&url).send().await {
            if response.status().is_success() {
                if let Ok(body) = response.json::<ReadinessBody>().await {
                    if body.is_ready_for(kind) {
                        return Ok(());
                    }
                }
            }
        }

        if tokio::time::Instant::now() >= deadline {
            return Err(ReadinessTimedOut);
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
