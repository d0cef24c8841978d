// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corvid_core::{Args, KwArgs};

#[test]
fn task_message_round_trips_through_json() {
    let msg = WorkerInbound::Task {
        task: Task::new("send_digest", Args::new(), KwArgs::new()),
    };
    let json = serde_json::to_string(&msg).expect("serialize");
    let back: WorkerInbound = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(msg, back);
}

#[test]
fn cache_request_tags_on_op_not_type() {
    let req = CacheRequest::Get { key: "k".to_string() };
    let json = serde_json::to_value(&req).expect("serialize");
    assert_eq!(json["op"], "Get");
    assert_eq!(json["key"], "k");
}

#[test]
fn worker_outbound_cache_nests_request_with_id() {
    let msg = WorkerOutbound::Cache {
        request_id: 3,
        request: CacheRequest::Lock { key: "service_state:completion".to_string() },
    };
    let json = serde_json::to_string(&msg).expect("serialize");
    let back: WorkerOutbound = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(msg, back);
}

#[test]
fn service_request_round_trips_for_each_kind() {
    for kind in ServiceKind::ALL {
        let msg = ServiceRequest::Acquire { kind };
        let json = serde_json::to_string(&msg).expect("serialize");
        let back: ServiceRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(msg, back);
    }
}

#[test]
fn callable_error_carries_message() {
    let msg = WorkerOutbound::CallableError {
        callable_id: CallableId::new("send_digest"),
        message: "boom".to_string(),
    };
    let json = serde_json::to_value(&msg).expect("serialize");
    assert_eq!(json["message"], "boom");
}
