//! # Composed State
//!
//! Name → state mapping published by the aggregator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Last known state of every child, keyed by child name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComposedState(BTreeMap<String, Value>);

impl ComposedState {
    /// State of the child named `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge the top-level fields of every child into one object.
    ///
    /// Children are merged in name order; on a key collision the later name
    /// wins. Non-object states contribute nothing.
    pub fn flatten(&self) -> Map<String, Value> {
        let mut flat = Map::new();
        for state in self.0.values() {
            if let Value::Object(fields) = state {
                flat.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        flat
    }

    pub(crate) fn insert(&mut self, name: String, state: Value) {
        self.0.insert(name, state);
    }
}

impl From<BTreeMap<String, Value>> for ComposedState {
    fn from(states: BTreeMap<String, Value>) -> Self {
        Self(states)
    }
}

impl From<ComposedState> for Value {
    fn from(state: ComposedState) -> Self {
        Value::Object(state.0.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ComposedState {
        let mut state = ComposedState::default();
        state.insert("KeyringController".into(), json!({ "isUnlocked": false, "keyrings": [] }));
        state.insert("Preferences".into(), json!({ "theme": "dark" }));
        state
    }

    #[test]
    fn test_serializes_as_plain_map() {
        assert_eq!(
            serde_json::to_value(sample()).unwrap(),
            json!({
                "KeyringController": { "isUnlocked": false, "keyrings": [] },
                "Preferences": { "theme": "dark" }
            })
        );
    }

    #[test]
    fn test_flatten_merges_fields() {
        let flat = sample().flatten();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat["theme"], json!("dark"));
        assert_eq!(flat["isUnlocked"], json!(false));
    }

    #[test]
    fn test_flatten_skips_scalars_and_later_name_wins() {
        let mut state = ComposedState::default();
        state.insert("A".into(), json!({ "shared": 1 }));
        state.insert("B".into(), json!({ "shared": 2 }));
        state.insert("C".into(), json!(42));

        let flat = state.flatten();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["shared"], json!(2));
    }

    #[test]
    fn test_names_are_sorted() {
        assert_eq!(
            sample().names().collect::<Vec<_>>(),
            vec!["KeyringController", "Preferences"]
        );
    }
}
