//! # Observable Store
//!
//! Holds one state value and notifies subscribers on every write.

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Subscriber callback.
pub type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// A state container with synchronous change notification.
///
/// Reads return owned clones. Both locks are released before subscribers
/// run, so a subscriber may read or write the store again; nested writes are
/// delivered depth-first.
pub struct ObservableStore<S> {
    state: RwLock<S>,
    listeners: RwLock<Vec<(SubscriptionId, Listener<S>)>>,
    next_id: AtomicU64,
}

impl<S: Clone + Send + Sync + 'static> ObservableStore<S> {
    /// Create a store holding `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            state: RwLock::new(initial),
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Owned snapshot of the current state.
    #[must_use]
    pub fn get_state(&self) -> S {
        self.state.read().clone()
    }

    /// Replace the state and notify.
    pub fn put_state(&self, state: S) {
        {
            *self.state.write() = state.clone();
        }
        self.notify(&state);
    }

    /// Mutate the state in place and notify with the result.
    pub fn update_state<F>(&self, update: F)
    where
        F: FnOnce(&mut S),
    {
        let snapshot = {
            let mut guard = self.state.write();
            update(&mut guard);
            guard.clone()
        };
        self.notify(&snapshot);
    }

    /// Register a callback invoked with the full new state on every write.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.subscribe_arc(Arc::new(listener))
    }

    /// Register an already shared callback.
    pub fn subscribe_arc(&self, listener: Listener<S>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        trace!(subscription = ?id, "Store subscriber added");
        id
    }

    /// Remove a callback. Returns false if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        let removed = listeners.len() != before;
        if removed {
            trace!(subscription = ?id, "Store subscriber removed");
        }
        removed
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.read().len()
    }

    fn notify(&self, state: &S) {
        let listeners: Vec<Listener<S>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(state);
        }
    }
}

impl<S: Clone + Default + Send + Sync + 'static> Default for ObservableStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> fmt::Debug for ObservableStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableStore")
            .field("subscribers", &self.listeners.read().len())
            .finish_non_exhaustive()
    }
}
