// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ServiceKind;

#[test]
fn heartbeat_serializes_with_type_tag() {
    let json = serde_json::to_value(OutboundEnvelope::Heartbeat).expect("serialize");
    assert_eq!(json, serde_json::json!({"type": "heartbeat"}));
}

#[test]
fn inbound_envelope_keeps_arbitrary_body_fields() {
    let raw = serde_json::json!({"action": "subscribe", "topic": "mailbox"});
    let env: InboundEnvelope = serde_json::from_value(raw).expect("deserialize");
    assert_eq!(env.action, "subscribe");
    assert_eq!(env.body.get("topic").and_then(|v| v.as_str()), Some("mailbox"));
}

#[test]
fn embedding_readiness_accepts_any_body() {
    let body = ReadinessBody { status: None };
    assert!(body.is_ready_for(ServiceKind::Embedding));
}

#[test]
fn completion_readiness_requires_status_ok() {
    let ok = ReadinessBody { status: Some("ok".to_string()) };
    let pending = ReadinessBody { status: Some("loading".to_string()) };
    assert!(ok.is_ready_for(ServiceKind::Completion));
    assert!(!pending.is_ready_for(ServiceKind::Completion));
}
