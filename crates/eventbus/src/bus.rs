// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! C9 Event Bus: fan-out of host notifications to connected UI clients,
//! each with its own attached heartbeat task. Mirrors spec.md §4.9's
//! Connect/Disconnect/Broadcast contract.

use crate::client::Client;
use corvid_core::{config, OutboundEnvelope};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub type ClientId = u64;

struct Entry {
    client: Arc<dyn Client>,
    heartbeat_cancel: CancellationToken,
}

#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

struct Inner {
    clients: Mutex<HashMap<ClientId, Entry>>,
    next_id: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self { inner: Arc::new(Inner { clients: Mutex::new(HashMap::new()), next_id: AtomicU64::new(0) }) }
    }

    /// Accept `client` into the active set and launch its heartbeat
    /// task. Returns the id to pass to `disconnect`.
    pub fn connect(&self, client: Arc<dyn Client>) -> ClientId {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        self.inner.clients.lock().insert(id, Entry { client, heartbeat_cancel: cancel.clone() });

        let bus = self.clone();
        tokio::spawn(async move { bus.heartbeat_loop(id, cancel).await });

        id
    }

    /// Remove `id` from the active set and cancel its heartbeat. A
    /// repeat or unknown id is a no-op, never an error.
    pub fn disconnect(&self, id: ClientId) {
        if let Some(entry) = self.inner.clients.lock().remove(&id) {
            entry.heartbeat_cancel.cancel();
        }
    }

    /// Send `envelope` to a snapshot of the active set. Any client whose
    /// send fails is treated as gone and disconnected; this never blocks
    /// on one slow client past its own transport's send call.
    pub async fn broadcast(&self, envelope: OutboundEnvelope) {
        let snapshot: Vec<(ClientId, Arc<dyn Client>)> =
            self.inner.clients.lock().iter().map(|(id, entry)| (*id, entry.client.clone())).collect();

        for (id, client) in snapshot {
            if let Err(err) = client.send(&envelope).await {
                tracing::debug!(client_id = id, error = %err, "client gone, disconnecting");
                self.disconnect(id);
            }
        }
    }

    pub fn client_count(&self) -> usize {
        self.inner.clients.lock().len()
    }

    pub fn is_connected(&self, id: ClientId) -> bool {
        self.inner.clients.lock().contains_key(&id)
    }

    async fn heartbeat_loop(&self, id: ClientId, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(config::heartbeat_interval()) => {}
            }

            let Some(client) = self.inner.clients.lock().get(&id).map(|entry| entry.client.clone()) else {
                return;
            };

            if let Err(err) = client.send(&OutboundEnvelope::Heartbeat).await {
                tracing::debug!(client_id = id, error = %err, "heartbeat failed, disconnecting");
                self.disconnect(id);
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
