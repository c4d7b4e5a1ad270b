//! # Vault Persistence Flows
//!
//! The encrypted vault published on `vault_store()` is the only thing a host
//! needs to keep. These flows hand it from one controller instance to the
//! next the way a host restarting would.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    use kv_01_keyring_controller::{
        DefaultCryptoProvider, ErrorKind, ImportStrategy, KeyringApi, KeyringConfig,
        KeyringController, VaultState,
    };
    use shared_crypto::{decrypt_with_password, Cipher};

    /// Simulated disk: the last vault written by a controller
    fn attach_disk(controller: &KeyringController) -> Arc<Mutex<Option<String>>> {
        let disk = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&disk);
        controller
            .vault_store()
            .subscribe(move |state: &VaultState| *sink.lock() = state.vault.clone());
        disk
    }

    #[tokio::test]
    async fn test_vault_survives_restart() {
        let first = KeyringController::new(fast_config());
        let disk = attach_disk(&first);

        first
            .create_new_vault_and_restore(PASSWORD, ABANDON)
            .await
            .unwrap();
        first.add_new_account().await.unwrap();
        first
            .import_account_with_strategy(ImportStrategy::PrivateKey, &[COW_KEY.into()])
            .await
            .unwrap();
        let expected = first.state();
        drop(first);

        let blob = disk.lock().clone().expect("vault was persisted");
        let second = KeyringController::new(fast_config().with_vault(blob));
        assert!(!second.is_unlocked());

        let restored = second.submit_password(PASSWORD).await.unwrap();
        assert_eq!(restored, expected);
        assert_eq!(
            second.export_seed_phrase(PASSWORD).await.unwrap().as_str(),
            ABANDON
        );
    }

    #[tokio::test]
    async fn test_blob_never_contains_plaintext_secrets() {
        let controller = KeyringController::new(fast_config());
        let disk = attach_disk(&controller);
        controller
            .create_new_vault_and_restore(PASSWORD, ABANDON)
            .await
            .unwrap();
        controller
            .import_account_with_strategy(ImportStrategy::PrivateKey, &[COW_KEY.into()])
            .await
            .unwrap();

        let blob = disk.lock().clone().unwrap();
        assert!(!blob.contains("abandon"));
        assert!(!blob.contains(COW_KEY));
        assert!(!blob.contains(PASSWORD));

        // The blob is a plain password vault any host can open
        let plaintext = decrypt_with_password(PASSWORD, &blob).unwrap();
        let entries: serde_json::Value = serde_json::from_slice(&plaintext).unwrap();
        assert_eq!(entries.as_array().unwrap().len(), 2);
        assert_eq!(entries[0]["type"], "HD Key Tree");
        assert_eq!(entries[1]["type"], "Simple Key Pair");
    }

    #[tokio::test]
    async fn test_each_commit_rewrites_vault() {
        let controller = KeyringController::new(fast_config());
        let writes = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&writes);
        controller
            .vault_store()
            .subscribe(move |state: &VaultState| log.lock().push(state.vault.clone()));

        controller
            .create_new_vault_and_restore(PASSWORD, ABANDON)
            .await
            .unwrap();
        controller.add_new_account().await.unwrap();
        // Lock and unlock leave the vault alone
        controller.set_locked().await.unwrap();
        controller.submit_password(PASSWORD).await.unwrap();
        controller
            .remove_account(&address(ABANDON_FIRST))
            .await
            .unwrap();

        let writes = writes.lock();
        assert_eq!(writes.len(), 3);
        assert!(writes.iter().all(Option::is_some));
        // Fresh salt and IV on every write
        assert_ne!(writes[0], writes[1]);
    }

    #[tokio::test]
    async fn test_new_vault_replaces_old_one() {
        let controller = restored_controller().await;
        controller.add_new_account().await.unwrap();
        let old_blob = controller.vault_store().get_state().vault.unwrap();

        let state = controller
            .create_new_vault_and_keychain("another password")
            .await
            .unwrap();
        assert_eq!(state.accounts().len(), 1);
        assert_ne!(state.accounts()[0], address(ABANDON_FIRST));

        controller.set_locked().await.unwrap();
        let err = controller.submit_password(PASSWORD).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Crypto);
        assert!(controller.submit_password("another password").await.is_ok());

        // The old blob still opens in a controller of its own
        let legacy = KeyringController::new(fast_config().with_vault(old_blob));
        assert_eq!(
            legacy.submit_password(PASSWORD).await.unwrap().accounts().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_cipher_choice_round_trips() {
        for cipher in [Cipher::Aes256Gcm, Cipher::XChaCha20Poly1305] {
            let provider = Arc::new(DefaultCryptoProvider::new(cipher, 1_000));
            let config = KeyringConfig::default().with_encryptor(provider);
            let controller = KeyringController::new(config);
            controller
                .create_new_vault_and_restore(PASSWORD, ABANDON)
                .await
                .unwrap();
            let blob = controller.vault_store().get_state().vault.unwrap();

            let reopened = KeyringController::new(fast_config().with_vault(blob));
            let state = reopened.submit_password(PASSWORD).await.unwrap();
            assert_eq!(state.accounts(), vec![address(ABANDON_FIRST)]);
        }
    }

    #[tokio::test]
    async fn test_tampered_vault_is_rejected() {
        let controller = restored_controller().await;
        let blob = controller.vault_store().get_state().vault.unwrap();

        let mut parsed: serde_json::Value = serde_json::from_str(&blob).unwrap();
        let data = parsed["data"].as_str().unwrap().to_string();
        let flipped = if data.starts_with('0') { "1" } else { "0" };
        parsed["data"] = serde_json::Value::String(format!("{flipped}{}", &data[1..]));

        let reopened = KeyringController::new(fast_config().with_vault(parsed.to_string()));
        let err = reopened.submit_password(PASSWORD).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Crypto);
        assert!(!reopened.is_unlocked());
    }
}
