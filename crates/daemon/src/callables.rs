// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The callables a queue worker can resolve a `Task` against. Stand-ins
//! for the personal-assistant mailbox logic the execution core exists to
//! run; each shows one way task code reaches the host's shared cache and
//! inference supervisor through the worker-side RPC clients rather than
//! touching either directly.

use corvid_cache::Cache as _;
use corvid_core::{Clock, ServiceKind, SystemClock};
use corvid_worker::{CallableRegistry, RemoteCache, RemoteService};
use serde_json::json;

/// `process_inbox_thread` and `execute_function_for_message` are the
/// two callables whose completion should fan out to connected UI
/// clients; see `app::state_changing_callables`.
pub fn register(registry: &mut CallableRegistry, cache: RemoteCache, service: RemoteService) {
    registry.register("sync_mailbox", {
        let cache = cache.clone();
        move |_args, _kwargs| {
            let cache = cache.clone();
            async move {
                cache
                    .set("mailbox:last_sync_epoch_ms", json!(SystemClock.epoch_ms()))
                    .await
                    .map_err(|err| err.to_string())
            }
        }
    });

    registry.register("process_inbox_thread", {
        let cache = cache.clone();
        let service = service.clone();
        move |args, _kwargs| {
            let cache = cache.clone();
            let service = service.clone();
            async move {
                let thread_id = args.first().and_then(|v| v.as_str()).ok_or("missing thread id argument")?;
                let summary = service
                    .use_service(ServiceKind::Embedding, || async { json!({ "thread_id": thread_id }) })
                    .await
                    .map_err(|reason| format!("embedding unavailable: {reason}"))?;
                cache.set(&format!("mailbox:thread:{thread_id}"), summary).await.map_err(|err| err.to_string())
            }
        }
    });

    registry.register("execute_function_for_message", {
        let service = service.clone();
        move |args, kwargs| {
            let service = service.clone();
            async move {
                let message_id = args.first().and_then(|v| v.as_str()).ok_or("missing message id argument")?;
                let function_name = kwargs.get("function").and_then(|v| v.as_str()).unwrap_or("reply_draft");
                service
                    .use_service(ServiceKind::Completion, || async { (message_id.to_string(), function_name.to_string()) })
                    .await
                    .map(|_| ())
                    .map_err(|reason| format!("completion unavailable: {reason}"))
            }
        }
    });

    registry.register("send_digest", move |_args, _kwargs| {
        let cache = cache.clone();
        async move {
            let _ = cache.get("mailbox:last_sync_epoch_ms").await.map_err(|err| err.to_string())?;
            Ok(())
        }
    });
}

#[cfg(test)]
#[path = "callables_tests.rs"]
mod tests;
