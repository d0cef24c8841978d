// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! C8 Completion Notifier: the host's single reader across every
//! worker's completion stream. Workers only ever report a callable-id;
//! whether that id means "something changed" is a host policy decision,
//! kept here as a configured set so workers stay free of DB/WebSocket
//! knowledge (spec.md §4.8).

use corvid_core::{CallableId, CompletionEvent};
use std::collections::HashSet;
use std::future::Future;
use tokio::sync::mpsc;

/// Watches a merged stream of `CompletionEvent`s and invokes a callback
/// for members of a configured "state-changing" callable set.
pub struct CompletionNotifier {
    state_changing: HashSet<CallableId>,
}

impl CompletionNotifier {
    pub fn new(state_changing: impl IntoIterator<Item = CallableId>) -> Self {
        Self { state_changing: state_changing.into_iter().collect() }
    }

    /// Drain `completions` until every worker's sender half is dropped,
    /// calling `on_state_change` once per event whose callable is a
    /// member of the configured set. Non-members are silently ignored.
    pub async fn run<F, Fut>(self, mut completions: mpsc::UnboundedReceiver<CompletionEvent>, on_state_change: F)
    where
        F: Fn(CompletionEvent) -> Fut,
        Fut: Future<Output = ()>,
    {
        while let Some(event) = completions.recv().await {
            if self.state_changing.contains(&event.callable_id) {
                on_state_change(event).await;
            } else {
                tracing::trace!(callable_id = %event.callable_id, "completion ignored, not state-changing");
            }
        }
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
