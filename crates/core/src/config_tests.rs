// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ServiceKind;
use serial_test::serial;

#[test]
#[serial(corvid_env)]
fn idle_shutdown_delay_defaults_to_five_seconds() {
    std::env::remove_var("CORVID_IDLE_SHUTDOWN_MS");
    assert_eq!(idle_shutdown_delay(), Duration::from_secs(5));
}

#[test]
#[serial(corvid_env)]
fn idle_shutdown_delay_honors_override() {
    std::env::set_var("CORVID_IDLE_SHUTDOWN_MS", "250");
    assert_eq!(idle_shutdown_delay(), Duration::from_millis(250));
    std::env::remove_var("CORVID_IDLE_SHUTDOWN_MS");
}

#[test]
#[serial(corvid_env)]
fn readiness_timeout_defaults_to_sixty_seconds() {
    std::env::remove_var("CORVID_READINESS_TIMEOUT_MS");
    assert_eq!(readiness_timeout(), Duration::from_secs(60));
}

#[test]
#[serial(corvid_env)]
fn completion_enabled_defaults_true() {
    std::env::remove_var("CORVID_COMPLETION_ENABLED");
    assert!(completion_enabled());
}

#[test]
#[serial(corvid_env)]
fn completion_enabled_respects_explicit_false() {
    std::env::set_var("CORVID_COMPLETION_ENABLED", "false");
    assert!(!completion_enabled());
    std::env::remove_var("CORVID_COMPLETION_ENABLED");
}

#[test]
#[serial(corvid_env)]
fn ports_default_to_distinct_fixed_values() {
    std::env::remove_var("CORVID_EMBEDDING_PORT");
    std::env::remove_var("CORVID_COMPLETION_PORT");
    assert_ne!(embedding_port(), completion_port());
}

#[test]
fn model_file_names_are_distinct_per_kind() {
    assert_ne!(model_file_name(ServiceKind::Embedding), model_file_name(ServiceKind::Completion));
}

#[test]
fn completion_context_is_larger_than_embedding() {
    assert!(model_context_size(ServiceKind::Completion) > model_context_size(ServiceKind::Embedding));
}
