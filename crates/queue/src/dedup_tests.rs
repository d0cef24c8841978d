// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corvid_core::{CallableId, KwArgs, Task};

fn fp(n: i64) -> TaskFingerprint {
    Task::new(CallableId::new("send_digest"), vec![serde_json::json!(n)], KwArgs::new()).fingerprint()
}

#[test]
fn first_insert_succeeds_second_is_rejected() {
    let index = DedupIndex::new();
    assert!(index.try_insert(fp(1)));
    assert!(!index.try_insert(fp(1)));
}

#[test]
fn distinct_fingerprints_both_insert() {
    let index = DedupIndex::new();
    assert!(index.try_insert(fp(1)));
    assert!(index.try_insert(fp(2)));
    assert_eq!(index.len(), 2);
}

#[test]
fn remove_allows_resubmission() {
    let index = DedupIndex::new();
    let fingerprint = fp(1);
    assert!(index.try_insert(fingerprint));
    index.remove(fingerprint);
    assert!(index.try_insert(fingerprint));
}

#[test]
fn remove_of_unknown_fingerprint_is_a_no_op() {
    let index = DedupIndex::new();
    index.remove(fp(1));
    assert!(index.is_empty());
}

