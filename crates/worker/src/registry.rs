// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static callable-id -> function registry the worker process resolves
//! tasks against. Mirrors the original's dynamic lookup by name, except
//! the mapping is built once at startup rather than via reflection.

use corvid_core::{Args, CallableId, KwArgs};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A registered callable. Returns `Err` with a human-readable message on
/// failure; never expected to panic, though the worker run loop catches
/// panics too (see `runtime::run`).
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;
pub type Callable = Arc<dyn Fn(Args, KwArgs) -> BoxFuture<'static> + Send + Sync>;

/// Maps callable ids to their implementations. Built once by the
/// embedding binary (`corvidd`) at startup and handed to the worker run
/// loop; never mutated afterward.
#[derive(Clone, Default)]
pub struct CallableRegistry {
    callables: HashMap<CallableId, Callable>,
}

impl CallableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callable_id`, overwriting any previous registration
    /// under the same id.
    pub fn register<F, Fut>(&mut self, callable_id: impl Into<CallableId>, f: F)
    where
        F: Fn(Args, KwArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        let id = callable_id.into();
        self.callables.insert(id, Arc::new(move |args, kwargs| Box::pin(f(args, kwargs))));
    }

    pub fn get(&self, callable_id: &CallableId) -> Option<Callable> {
        self.callables.get(callable_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.callables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callables.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
