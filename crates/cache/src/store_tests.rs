// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[tokio::test]
async fn get_missing_key_returns_none() {
    let cache = HostCache::new();
    assert_eq!(cache.get("nope").await.unwrap(), None);
}

#[tokio::test]
async fn set_then_get_round_trips() {
    let cache = HostCache::new();
    cache.set("k", json!({"n": 1})).await.unwrap();
    assert_eq!(cache.get("k").await.unwrap(), Some(json!({"n": 1})));
}

#[tokio::test]
async fn delete_reports_whether_key_existed() {
    let cache = HostCache::new();
    cache.set("k", json!(1)).await.unwrap();
    assert!(cache.delete("k").await.unwrap());
    assert!(!cache.delete("k").await.unwrap());
}

#[tokio::test]
async fn with_lock_serializes_concurrent_callers() {
    let cache = HostCache::new();
    cache.set("counter", json!(0)).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache
                .with_lock("counter", || async {
                    let current = cache.get("counter").await.unwrap().unwrap().as_i64().unwrap();
                    // Yield so a buggy lock would let another task interleave here.
                    tokio::task::yield_now().await;
                    cache.set("counter", json!(current + 1)).await.unwrap();
                })
                .await;
        }));
    }
    for h in handles {
        h.await.unwrap();
    }
    assert_eq!(cache.get("counter").await.unwrap(), Some(json!(20)));
}

#[tokio::test]
async fn rpc_lock_blocks_until_unlock() {
    let cache = HostCache::new();
    cache.lock("service_state:completion").await.unwrap();

    let waiter_cache = cache.clone();
    let waiter = tokio::spawn(async move {
        waiter_cache.lock("service_state:completion").await.unwrap();
        "acquired"
    });

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    cache.unlock("service_state:completion").await.unwrap();
    assert_eq!(waiter.await.unwrap(), "acquired");
}
