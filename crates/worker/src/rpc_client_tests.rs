// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;

#[tokio::test]
async fn get_round_trips_through_a_simulated_host() {
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    let handle = Arc::new(RemoteHandle::new(outbound_tx));
    let cache = RemoteCache::new(handle.clone());

    let responder = tokio::spawn(async move {
        let WorkerOutbound::Cache { request_id, request } = outbound_rx.recv().await.unwrap() else {
            panic!("expected a Cache request");
        };
        assert_eq!(request, CacheRequest::Get { key: "k".to_string() });
        handle.complete_cache(request_id, CacheResponse::Value { value: Some(serde_json::json!(7)) });
    });

    let value = cache.get("k").await.unwrap();
    assert_eq!(value, Some(serde_json::json!(7)));
    responder.await.unwrap();
}

#[tokio::test]
async fn acquire_returns_unavailable_reason_as_err() {
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    let handle = Arc::new(RemoteHandle::new(outbound_tx));
    let service = RemoteService::new(handle.clone());

    tokio::spawn(async move {
        let WorkerOutbound::Service { request_id, .. } = outbound_rx.recv().await.unwrap() else {
            panic!("expected a Service request");
        };
        handle.complete_service(
            request_id,
            ServiceResponse::Unavailable { reason: "completion disabled".to_string() },
        );
    });

    let err = service.acquire(ServiceKind::Completion).await.unwrap_err();
    assert_eq!(err, "completion disabled");
}

#[tokio::test]
async fn cache_request_errs_once_the_host_pipe_is_gone() {
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    drop(outbound_rx);
    let handle = Arc::new(RemoteHandle::new(outbound_tx));
    let cache = RemoteCache::new(handle);

    assert!(cache.get("k").await.is_err());
}
