// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry point taken when `corvidd` is re-exec'd as `corvidd --worker
//! <queue>`. Builds the RPC clients, registers the callable set, and
//! runs the worker loop against real stdin/stdout.

use corvid_core::QueueName;
use corvid_worker::{CallableRegistry, RemoteCache, RemoteService};

pub async fn run(queue: QueueName) -> std::io::Result<()> {
    let (remote, outbound_rx) = corvid_worker::remote_channel();
    let cache = RemoteCache::new(remote.clone());
    let service = RemoteService::new(remote.clone());

    let mut registry = CallableRegistry::new();
    crate::callables::register(&mut registry, cache, service);

    tracing::info!(%queue, registered = registry.len(), "worker starting");

    corvid_worker::run(registry, remote, outbound_rx, tokio::io::stdin(), tokio::io::stdout()).await
}
