// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `corvidd`: run as the host process by default, or as one queue's
//! worker process when invoked with `--worker <queue>` — the form the
//! host itself uses to re-exec this same binary (spec.md §4.7).

use clap::Parser;
use corvid_daemon::{app::App, logging, worker_entry};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "corvidd")]
struct Cli {
    /// Run as the named queue's worker process instead of the host.
    /// Never passed by a human; the host supplies it when re-exec'ing.
    #[arg(long, value_name = "QUEUE")]
    worker: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    match cli.worker {
        Some(queue) => {
            let _guard = logging::init("corvidd-worker");
            let queue = corvid_core::QueueName::from_str(&queue).unwrap_or_else(|err| {
                tracing::error!(%err, "invalid --worker queue name");
                std::process::exit(1);
            });
            worker_entry::run(queue).await
        }
        None => {
            let _guard = logging::init("corvidd");
            let app = App::start().await?;
            tracing::info!("corvidd started");

            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(%err, "failed to listen for ctrl-c, shutting down anyway");
            }

            tracing::info!("shutting down");
            app.shutdown().await;
            Ok(())
        }
    }
}
