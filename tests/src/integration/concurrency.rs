//! # Concurrency Flows
//!
//! One controller shared between tasks. Operations on a vault run one at a
//! time, so concurrent callers observe a sequence of complete states.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    use kv_01_keyring_controller::{ErrorKind, KeyringApi, MessageParams, PublicState};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_derivations_are_serialized() {
        let controller = restored_controller().await;
        let published = Arc::new(Mutex::new(Vec::<usize>::new()));
        let log = Arc::clone(&published);
        controller.subscribe(move |state: &PublicState| log.lock().push(state.accounts().len()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move { controller.add_new_account().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let accounts = controller.get_accounts().await.unwrap();
        assert_eq!(accounts.len(), 9);
        let unique: HashSet<_> = accounts.iter().collect();
        assert_eq!(unique.len(), 9);

        // Every publish saw exactly one more account than the one before
        assert_eq!(*published.lock(), (2..=9).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_lock_races_with_signing() {
        let controller = restored_controller().await;
        let from = address(ABANDON_FIRST);

        let signers: Vec<_> = (0..16)
            .map(|i| {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    controller
                        .sign_personal_message(&MessageParams {
                            from,
                            data: format!("message {i}"),
                        })
                        .await
                })
            })
            .collect();
        let locker = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.set_locked().await })
        };

        locker.await.unwrap().unwrap();
        for signer in signers {
            match signer.await.unwrap() {
                Ok(signature) => assert_eq!(signature.len(), 132),
                Err(err) => assert_eq!(err.kind(), ErrorKind::State),
            }
        }
        assert!(!controller.is_unlocked());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_unlocks_agree() {
        let controller = restored_controller().await;
        controller.add_new_account().await.unwrap();
        let expected = controller.state();
        controller.set_locked().await.unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move { controller.submit_password(PASSWORD).await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), expected);
        }
        assert_eq!(controller.state(), expected);
    }
}
