//! # Composable Controller Service
//!
//! Subscribes once to each child and republishes the merged state of all
//! children whenever any one of them publishes.

use crate::errors::ComposeError;
use crate::state::ComposedState;
use serde_json::{Map, Value};
use shared_store::{ObservableStore, StateSource, SubscriptionId, ValueListener};
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

struct Inner {
    children: Vec<Arc<dyn StateSource>>,
    store: ObservableStore<ComposedState>,
}

impl Inner {
    /// Rebuild from every child, taking `changed`'s value from its notification.
    fn refresh(&self, changed: &str, value: &Value) {
        let mut composed = ComposedState::default();
        for child in &self.children {
            let state = if child.name() == changed {
                value.clone()
            } else {
                child.state_value()
            };
            composed.insert(child.name().to_string(), state);
        }
        trace!(child = changed, "Republishing composed state");
        self.store.put_state(composed);
    }
}

fn compose(children: &[Arc<dyn StateSource>]) -> ComposedState {
    let mut composed = ComposedState::default();
    for child in children {
        composed.insert(child.name().to_string(), child.state_value());
    }
    composed
}

/// Observer that merges named child states.
pub struct ComposableController {
    inner: Arc<Inner>,
    subscriptions: Vec<SubscriptionId>,
}

impl ComposableController {
    /// Subscribe to every child exactly once.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError` if a child name is empty or repeated.
    pub fn new(children: Vec<Arc<dyn StateSource>>) -> Result<Self, ComposeError> {
        let mut seen = HashSet::new();
        for child in &children {
            let name = child.name();
            if name.is_empty() {
                return Err(ComposeError::EmptyName);
            }
            if !seen.insert(name.to_string()) {
                return Err(ComposeError::DuplicateName(name.to_string()));
            }
        }

        let inner = Arc::new(Inner {
            store: ObservableStore::new(compose(&children)),
            children,
        });

        let subscriptions = inner
            .children
            .iter()
            .map(|child| {
                let handle: Weak<Inner> = Arc::downgrade(&inner);
                let name = child.name().to_string();
                let listener: ValueListener = Arc::new(move |value: &Value| {
                    if let Some(inner) = handle.upgrade() {
                        inner.refresh(&name, value);
                    }
                });
                child.subscribe_value(listener)
            })
            .collect();

        debug!(children = inner.children.len(), "Composable controller ready");
        Ok(Self {
            inner,
            subscriptions,
        })
    }

    /// Merged state of all children.
    #[must_use]
    pub fn state(&self) -> ComposedState {
        self.inner.store.get_state()
    }

    /// Top-level fields of every child merged into one object.
    #[must_use]
    pub fn flat_state(&self) -> Map<String, Value> {
        self.inner.store.get_state().flatten()
    }

    /// Names of the composed children, in construction order.
    pub fn child_names(&self) -> Vec<String> {
        self.inner
            .children
            .iter()
            .map(|child| child.name().to_string())
            .collect()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ComposedState) + Send + Sync + 'static,
    {
        self.inner.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.store.unsubscribe(id)
    }
}

impl Drop for ComposableController {
    fn drop(&mut self) {
        for (child, id) in self.inner.children.iter().zip(self.subscriptions.drain(..)) {
            child.unsubscribe(id);
        }
    }
}
