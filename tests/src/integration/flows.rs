//! # Integration Test Flows
//!
//! Tests that kv-01-keyring-controller, kv-02-composable-controller and
//! shared-store work together.
//!
//! ## Flows Tested:
//!
//! 1. **Controller → ObservableStore**: one notification per committed mutation
//! 2. **Controller → ComposableController**: merged state follows every publish

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use kv_01_keyring_controller::{
        ImportStrategy, KeyringApi, KeyringController, KeyringType, PublicState,
    };
    use kv_02_composable_controller::{ComposableController, ComposedState};
    use shared_store::{NamedStore, ObservableStore, StateSource};

    // =============================================================================
    // CONTROLLER → STORE
    // =============================================================================

    /// Full lifecycle, counting publishes on the public store
    #[tokio::test]
    async fn test_each_mutation_publishes_once() {
        let controller = KeyringController::new(fast_config());
        let states = Arc::new(Mutex::new(Vec::<PublicState>::new()));
        let log = Arc::clone(&states);
        controller.subscribe(move |state: &PublicState| log.lock().push(state.clone()));

        controller
            .create_new_vault_and_restore(PASSWORD, ABANDON)
            .await
            .unwrap();
        controller.add_new_account().await.unwrap();
        controller
            .import_account_with_strategy(ImportStrategy::PrivateKey, &[COW_KEY.into()])
            .await
            .unwrap();
        controller
            .remove_account(&address(COW_ADDRESS))
            .await
            .unwrap();
        controller.set_locked().await.unwrap();
        controller.submit_password(PASSWORD).await.unwrap();

        let states = states.lock();
        assert_eq!(states.len(), 6);
        let account_counts: Vec<usize> = states.iter().map(|s| s.accounts().len()).collect();
        assert_eq!(account_counts, vec![1, 2, 3, 2, 0, 2]);
        assert!(!states[4].is_unlocked);
        assert_eq!(states[5], states[3]);
    }

    /// Rejected operations publish nothing
    #[tokio::test]
    async fn test_failed_operations_publish_nothing() {
        let controller = restored_controller().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        controller.subscribe(move |_: &PublicState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(controller
            .import_account_with_strategy(ImportStrategy::PrivateKey, &["zz".into()])
            .await
            .is_err());
        assert!(controller
            .remove_account(&address(COW_ADDRESS))
            .await
            .is_err());
        assert!(controller.export_seed_phrase("wrong").await.is_err());

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    // =============================================================================
    // CONTROLLER → AGGREGATOR
    // =============================================================================

    #[derive(Clone, serde::Serialize)]
    struct NetworkState {
        chain_id: u64,
    }

    #[tokio::test]
    async fn test_aggregator_tracks_keyring_controller() {
        let keyring = Arc::new(KeyringController::new(fast_config()));
        let network = Arc::new(ObservableStore::new(NetworkState { chain_id: 1 }));
        let children: Vec<Arc<dyn StateSource>> = vec![
            keyring.clone() as Arc<dyn StateSource>,
            Arc::new(NamedStore::new("NetworkController", Arc::clone(&network))),
        ];
        let composed = ComposableController::new(children).unwrap();

        let published = Arc::new(Mutex::new(Vec::<ComposedState>::new()));
        let log = Arc::clone(&published);
        composed.subscribe(move |state: &ComposedState| log.lock().push(state.clone()));

        keyring
            .create_new_vault_and_restore(PASSWORD, ABANDON)
            .await
            .unwrap();
        network.put_state(NetworkState { chain_id: 5 });
        keyring.set_locked().await.unwrap();

        let published = published.lock();
        assert_eq!(published.len(), 3);

        let first = &published[0];
        assert_eq!(
            first.get("KeyringController").unwrap()["keyrings"][0]["accounts"],
            json!([ABANDON_FIRST])
        );
        assert_eq!(first.get("NetworkController"), Some(&json!({ "chain_id": 1 })));

        // Network change republishes with the unchanged keyring state
        assert_eq!(
            published[1].get("KeyringController"),
            first.get("KeyringController")
        );
        assert_eq!(
            published[1].get("NetworkController"),
            Some(&json!({ "chain_id": 5 }))
        );

        let locked = published[2].get("KeyringController").unwrap();
        assert_eq!(locked["isUnlocked"], json!(false));
        assert_eq!(locked["keyrings"], json!([]));
        assert_eq!(
            locked["keyringTypes"],
            json!([KeyringType::Hd.as_str(), KeyringType::Simple.as_str()])
        );
    }

    #[tokio::test]
    async fn test_dropping_aggregator_detaches_from_controller() {
        let keyring = restored_controller().await;
        let composed =
            ComposableController::new(vec![keyring.clone() as Arc<dyn StateSource>]).unwrap();
        assert_eq!(keyring.memory_store().subscriber_count(), 1);

        drop(composed);
        assert_eq!(keyring.memory_store().subscriber_count(), 0);
        keyring.add_new_account().await.unwrap();
    }

    #[tokio::test]
    async fn test_flat_state_exposes_controller_fields() {
        let keyring = restored_controller().await;
        let composed =
            ComposableController::new(vec![keyring.clone() as Arc<dyn StateSource>]).unwrap();

        let flat = composed.flat_state();
        assert_eq!(flat.get("isUnlocked"), Some(&Value::Bool(true)));
        assert!(flat.contains_key("keyrings"));
        assert!(flat.contains_key("keyringTypes"));
    }
}
