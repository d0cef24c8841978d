// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corvid_core::KwArgs;
use corvid_wire::{CacheRequest, CacheResponse, ServiceRequest, ServiceResponse, WorkerOutbound};
use corvid_worker::{remote_channel, CallableRegistry};
use serde_json::json;
use serial_test::serial;
use tokio::sync::mpsc;

/// Drains one frame from `outbound_rx` and replies on `remote` with
/// whatever the supplied closure decides for a `Cache` request, or
/// forwards a `Service` request untouched to the caller for a second
/// round of handling. Simulates just enough of the host's dispatch loop
/// (see `corvid_worker::host::dispatch`) to exercise a callable without
/// a real worker subprocess.
async fn respond_to_cache(
    outbound_rx: &mut mpsc::UnboundedReceiver<WorkerOutbound>,
    remote: &corvid_worker::RemoteHandle,
    reply: CacheResponse,
) -> CacheRequest {
    match outbound_rx.recv().await.expect("host pipe closed") {
        WorkerOutbound::Cache { request_id, request } => {
            remote.complete_cache(request_id, reply);
            request
        }
        other => panic!("expected a Cache request, got {other:?}"),
    }
}

async fn respond_to_service(
    outbound_rx: &mut mpsc::UnboundedReceiver<WorkerOutbound>,
    remote: &corvid_worker::RemoteHandle,
    reply: ServiceResponse,
) -> ServiceRequest {
    match outbound_rx.recv().await.expect("host pipe closed") {
        WorkerOutbound::Service { request_id, request } => {
            remote.complete_service(request_id, reply);
            request
        }
        other => panic!("expected a Service request, got {other:?}"),
    }
}

#[tokio::test]
async fn sync_mailbox_writes_a_timestamp_into_the_cache() {
    let (remote, mut outbound_rx) = remote_channel();
    let cache = corvid_worker::RemoteCache::new(remote.clone());
    let service = corvid_worker::RemoteService::new(remote.clone());
    let mut registry = CallableRegistry::new();
    register(&mut registry, cache, service);

    let call = registry.get(&corvid_core::CallableId::new("sync_mailbox")).unwrap();
    let running = tokio::spawn(call(Vec::new(), KwArgs::new()));

    let request = respond_to_cache(&mut outbound_rx, &remote, CacheResponse::Value { value: None }).await;
    assert!(matches!(request, CacheRequest::Set { key, .. } if key == "mailbox:last_sync_epoch_ms"));

    assert_eq!(running.await.unwrap(), Ok(()));
}

#[tokio::test]
async fn process_inbox_thread_acquires_embedding_then_caches_the_summary() {
    let (remote, mut outbound_rx) = remote_channel();
    let cache = corvid_worker::RemoteCache::new(remote.clone());
    let service = corvid_worker::RemoteService::new(remote.clone());
    let mut registry = CallableRegistry::new();
    register(&mut registry, cache, service);

    let call = registry.get(&corvid_core::CallableId::new("process_inbox_thread")).unwrap();
    let running = tokio::spawn(call(vec![json!("thread-42")], KwArgs::new()));

    let acquire = respond_to_service(&mut outbound_rx, &remote, ServiceResponse::Acquired).await;
    assert!(matches!(acquire, ServiceRequest::Acquire { kind: ServiceKind::Embedding }));

    let release = respond_to_service(&mut outbound_rx, &remote, ServiceResponse::Released).await;
    assert!(matches!(release, ServiceRequest::Release { kind: ServiceKind::Embedding }));

    let set = respond_to_cache(&mut outbound_rx, &remote, CacheResponse::Value { value: None }).await;
    assert!(matches!(set, CacheRequest::Set { key, .. } if key == "mailbox:thread:thread-42"));

    assert_eq!(running.await.unwrap(), Ok(()));
}

#[tokio::test]
async fn process_inbox_thread_fails_without_a_thread_id_argument() {
    let (remote, _outbound_rx) = remote_channel();
    let cache = corvid_worker::RemoteCache::new(remote.clone());
    let service = corvid_worker::RemoteService::new(remote.clone());
    let mut registry = CallableRegistry::new();
    register(&mut registry, cache, service);

    let call = registry.get(&corvid_core::CallableId::new("process_inbox_thread")).unwrap();
    let result = call(Vec::new(), KwArgs::new()).await;
    assert!(result.is_err());
}

/// With completion disabled, `execute_function_for_message` must run its
/// wrapped call directly rather than failing — `RemoteService::use_service`
/// short-circuits before issuing any `Acquire` RPC, so `outbound_rx` never
/// sees a request at all.
#[tokio::test]
#[serial(corvid_env)]
async fn execute_function_for_message_runs_directly_when_completion_is_disabled() {
    std::env::set_var("CORVID_COMPLETION_ENABLED", "false");

    let (remote, mut outbound_rx) = remote_channel();
    let cache = corvid_worker::RemoteCache::new(remote.clone());
    let service = corvid_worker::RemoteService::new(remote.clone());
    let mut registry = CallableRegistry::new();
    register(&mut registry, cache, service);

    let call = registry.get(&corvid_core::CallableId::new("execute_function_for_message")).unwrap();
    let result = call(vec![json!("msg-1")], KwArgs::new()).await;

    assert_eq!(result, Ok(()));
    assert!(outbound_rx.try_recv().is_err());

    std::env::remove_var("CORVID_COMPLETION_ENABLED");
}
