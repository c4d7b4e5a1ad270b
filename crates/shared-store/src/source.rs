//! # State Sources
//!
//! The contract a component implements so its state can be merged into an
//! aggregate view.

use crate::store::{ObservableStore, SubscriptionId};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Callback receiving a source's state as JSON.
pub type ValueListener = Arc<dyn Fn(&Value) + Send + Sync>;

/// A named, observable component state.
pub trait StateSource: Send + Sync {
    /// Key under which this source appears in a composed state.
    fn name(&self) -> &str;

    /// Current state as JSON.
    fn state_value(&self) -> Value;

    /// Register a callback invoked with the new state on every change.
    fn subscribe_value(&self, listener: ValueListener) -> SubscriptionId;

    /// Remove a callback registered with `subscribe_value`.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Exposes a serializable [`ObservableStore`] as a [`StateSource`].
pub struct NamedStore<S> {
    name: String,
    store: Arc<ObservableStore<S>>,
}

impl<S> NamedStore<S> {
    pub fn new(name: impl Into<String>, store: Arc<ObservableStore<S>>) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }

    /// The wrapped store.
    pub fn store(&self) -> &Arc<ObservableStore<S>> {
        &self.store
    }
}

fn to_value<S: Serialize>(name: &str, state: &S) -> Value {
    serde_json::to_value(state).unwrap_or_else(|e| {
        warn!(source = name, error = %e, "State is not representable as JSON");
        Value::Null
    })
}

impl<S> StateSource for NamedStore<S>
where
    S: Serialize + Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn state_value(&self) -> Value {
        to_value(&self.name, &self.store.get_state())
    }

    fn subscribe_value(&self, listener: ValueListener) -> SubscriptionId {
        let name = self.name.clone();
        self.store
            .subscribe(move |state: &S| listener(&to_value(&name, state)))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Clone, Serialize)]
    struct Prefs {
        theme: String,
    }

    #[test]
    fn test_named_store_reports_json() {
        let store = Arc::new(ObservableStore::new(Prefs {
            theme: "dark".into(),
        }));
        let source = NamedStore::new("Preferences", Arc::clone(&store));

        assert_eq!(source.name(), "Preferences");
        assert_eq!(source.state_value(), json!({ "theme": "dark" }));
    }

    #[test]
    fn test_named_store_forwards_updates() {
        let store = Arc::new(ObservableStore::new(Prefs {
            theme: "dark".into(),
        }));
        let source = NamedStore::new("Preferences", Arc::clone(&store));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        let id = source.subscribe_value(Arc::new(move |value: &Value| log.lock().push(value.clone())));
        store.put_state(Prefs {
            theme: "light".into(),
        });

        assert_eq!(*seen.lock(), vec![json!({ "theme": "light" })]);
        assert!(source.unsubscribe(id));
        assert_eq!(store.subscriber_count(), 0);
    }
}
