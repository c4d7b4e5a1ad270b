//! # Keyring Controller Service
//!
//! Application service layer that implements the `KeyringApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`KeyringApi`)
//! - Uses the outbound port (`CryptoProvider`) for every cryptographic step
//! - Publishes `PublicState` and the encrypted vault through two
//!   `ObservableStore`s
//!
//! ## Mutation Pattern
//!
//! validate → locate/derive → provider → mutate a staged copy → encrypt and
//! persist → commit → publish. A failure before commit leaves the live
//! keyrings and the persisted vault untouched; the staged copy is zeroized
//! when dropped.

use crate::adapters::default_provider::DefaultCryptoProvider;
use crate::config::KeyringConfig;
use crate::domain::entities::{
    ImportStrategy, KeyringSnapshot, KeyringType, MessageParams, PublicState, TypedDataVersion,
    TypedMessageParams, VaultState,
};
use crate::domain::errors::{ErrorKind, KeyringError};
use crate::domain::hd_keyring::HdKeyring;
use crate::domain::keyring::{Keyring, KeyringSet};
use crate::domain::session::Session;
use crate::domain::simple_keyring::SimpleKeyring;
use crate::domain::vault::{decode_vault, encode_vault, SerializedKeyring};
use crate::ports::inbound::KeyringApi;
use crate::ports::outbound::CryptoProvider;
use async_trait::async_trait;
use keyvault_telemetry::metrics::{self, AccountShare};
use serde_json::Value;
use shared_crypto::{
    DerivationPath, Eip712Version, Hash, PrivateKey, SignedTransaction, TransactionRequest,
    TypedData, TypedDataV1Entry,
};
use shared_store::{NamedStore, ObservableStore, StateSource, SubscriptionId, ValueListener};
use shared_types::{decode_hex, Address};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// Name under which the controller appears in a composed state.
pub const CONTROLLER_NAME: &str = "KeyringController";

/// Keyring Controller.
///
/// Owns the encrypted vault, the unlocked session and the public state.
/// Every operation holds the session lock for its whole duration, so calls
/// on one controller never interleave.
pub struct KeyringController {
    provider: Arc<dyn CryptoProvider>,
    hd_path: DerivationPath,
    session: Mutex<Option<Session>>,
    vault: Arc<ObservableStore<VaultState>>,
    memory: Arc<ObservableStore<PublicState>>,
    source: NamedStore<PublicState>,
    account_metric: AccountShare,
}

impl KeyringController {
    /// Create a locked controller.
    pub fn new(config: KeyringConfig) -> Self {
        let provider: Arc<dyn CryptoProvider> = match config.encryptor {
            Some(provider) => provider,
            None => Arc::new(DefaultCryptoProvider::new(
                config.cipher,
                config.kdf_iterations,
            )),
        };
        let vault = Arc::new(ObservableStore::new(VaultState {
            vault: config.initial_vault,
        }));
        let memory = Arc::new(ObservableStore::new(PublicState::locked()));

        Self {
            provider,
            hd_path: config.hd_path,
            session: Mutex::new(None),
            vault,
            source: NamedStore::new(CONTROLLER_NAME, Arc::clone(&memory)),
            memory,
            account_metric: AccountShare::new(),
        }
    }

    /// Current public state.
    #[must_use]
    pub fn state(&self) -> PublicState {
        self.memory.get_state()
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.memory.get_state().is_unlocked
    }

    /// Register a callback invoked with the full `PublicState` after every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&PublicState) + Send + Sync + 'static,
    {
        self.memory.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.memory.unsubscribe(id)
    }

    /// Store holding the public state.
    pub fn memory_store(&self) -> &Arc<ObservableStore<PublicState>> {
        &self.memory
    }

    /// Store holding the encrypted vault. Subscribe to persist it.
    pub fn vault_store(&self) -> &Arc<ObservableStore<VaultState>> {
        &self.vault
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn unlocked(session: &mut Option<Session>) -> Result<&mut Session, KeyringError> {
        session.as_mut().ok_or_else(KeyringError::locked)
    }

    fn unlocked_ref(session: &Option<Session>) -> Result<&Session, KeyringError> {
        session.as_ref().ok_or_else(KeyringError::locked)
    }

    fn stored_vault(&self) -> Result<String, KeyringError> {
        self.vault.get_state().vault.ok_or_else(KeyringError::no_vault)
    }

    /// Serialize, encrypt and store `keyrings` under `password`.
    async fn persist(&self, password: &str, keyrings: &[Keyring]) -> Result<(), KeyringError> {
        let entries: Vec<SerializedKeyring> = keyrings.iter().map(Keyring::serialize).collect();
        let plaintext = encode_vault(&entries)?;
        drop(entries);

        let blob = self
            .provider
            .encrypt(password, plaintext.as_bytes())
            .await
            .map_err(|e| KeyringError::Crypto(e.to_string()))?;
        self.vault.put_state(VaultState { vault: Some(blob) });
        Ok(())
    }

    fn publish(&self, state: &PublicState) {
        self.account_metric.set(state.accounts().len());
        self.memory.put_state(state.clone());
    }

    /// Persist a staged copy, make it live and publish.
    async fn commit(
        &self,
        session: &mut Session,
        staged: Vec<Keyring>,
    ) -> Result<PublicState, KeyringError> {
        self.persist(session.password(), &staged).await?;
        session.commit(staged);

        let state = session.public_state();
        self.publish(&state);
        Ok(state)
    }

    /// Decrypt the stored vault to check `password`.
    async fn check_password(&self, password: &str) -> Result<(), KeyringError> {
        if password.is_empty() {
            return Err(KeyringError::Crypto("Incorrect password".into()));
        }
        let blob = self.stored_vault()?;
        self.provider
            .decrypt(password, &blob)
            .await
            .map(drop)
            .map_err(|e| KeyringError::Crypto(e.to_string()))
    }

    fn primary_from_mnemonic(&self, mnemonic: Zeroizing<String>) -> Result<Keyring, KeyringError> {
        let provider = self.provider.as_ref();
        let mut primary = HdKeyring::from_mnemonic(provider, mnemonic, self.hd_path.clone())?;
        primary.add_account(provider)?;
        Ok(Keyring::Hd(primary))
    }

    /// Replace any vault with one holding only `primary`, and unlock.
    async fn create_vault(
        &self,
        password: &str,
        primary: Keyring,
    ) -> Result<PublicState, KeyringError> {
        let mut guard = self.session.lock().await;
        let staged = vec![primary];
        self.persist(password, &staged).await?;

        let session = guard.insert(Session::new(Zeroizing::new(password.to_string()), staged));
        let state = session.public_state();
        self.publish(&state);

        info!(accounts = state.accounts().len(), "New vault created");
        Ok(state)
    }

    fn restore_keyrings(&self, plaintext: &[u8]) -> Result<Vec<Keyring>, KeyringError> {
        let entries = decode_vault(plaintext)?;
        let keyrings = entries
            .iter()
            .map(|entry| Keyring::restore(self.provider.as_ref(), entry))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| KeyringError::Crypto(format!("Invalid vault: {e}")))?;
        if keyrings.is_empty() {
            return Err(KeyringError::Crypto("Invalid vault: no keyrings".into()));
        }
        Ok(keyrings)
    }

    async fn import_key(
        &self,
        strategy: ImportStrategy,
        args: &[String],
    ) -> Result<PrivateKey, KeyringError> {
        match strategy {
            ImportStrategy::PrivateKey => {
                let raw = args.first().map_or("", |arg| arg.trim());
                if raw.is_empty() {
                    return Err(KeyringError::Validation("Cannot import an empty key.".into()));
                }
                PrivateKey::from_hex(raw).map_err(|_| {
                    KeyringError::Validation("Cannot import invalid private key.".into())
                })
            }
            ImportStrategy::Json => {
                let json = args.first().map_or("", |arg| arg.trim());
                if json.is_empty() {
                    return Err(KeyringError::Validation("Cannot import an empty keystore.".into()));
                }
                let password = args.get(1).map_or("", String::as_str);
                Ok(self.provider.decrypt_keystore(json, password).await?)
            }
        }
    }

    async fn sign_typed(
        &self,
        params: &TypedMessageParams,
        version: TypedDataVersion,
    ) -> Result<String, KeyringError> {
        let guard = self.session.lock().await;
        let session = Self::unlocked_ref(&guard)?;

        let signature = match version {
            TypedDataVersion::V1 => {
                let entries = parse_v1_entries(&params.data)?;
                let key = session.keyrings().key_for(&params.from)?;
                self.provider.sign_typed_data_v1(key, &entries).await?
            }
            TypedDataVersion::V3 | TypedDataVersion::V4 => {
                let data = TypedData::from_value(&params.data)?;
                let key = session.keyrings().key_for(&params.from)?;
                let eip712 = if version == TypedDataVersion::V3 {
                    Eip712Version::V3
                } else {
                    Eip712Version::V4
                };
                self.provider.sign_typed_data(key, &data, eip712).await?
            }
        };
        metrics::record_signature(version.metric_label());
        Ok(signature.to_hex())
    }
}

fn observe<T>(operation: &'static str, result: Result<T, KeyringError>) -> Result<T, KeyringError> {
    match &result {
        Ok(_) => {
            metrics::record_operation(operation, "ok");
            debug!(operation, "Keyring operation completed");
        }
        Err(e) => {
            let kind = e.kind();
            metrics::record_operation(operation, kind.as_str());
            if kind == ErrorKind::Crypto {
                warn!(operation, error = %e, "Keyring operation failed");
            } else {
                debug!(operation, kind = kind.as_str(), error = %e, "Keyring operation rejected");
            }
        }
    }
    result
}

fn parse_v1_entries(data: &Value) -> Result<Vec<TypedDataV1Entry>, KeyringError> {
    let parsed = match data {
        Value::String(json) => serde_json::from_str::<Vec<TypedDataV1Entry>>(json),
        other => serde_json::from_value::<Vec<TypedDataV1Entry>>(other.clone()),
    };
    let entries =
        parsed.map_err(|e| KeyringError::Validation(format!("Invalid V1 typed data: {e}")))?;
    if entries.is_empty() {
        return Err(KeyringError::Validation(
            "Expect argument to be non-empty array".into(),
        ));
    }
    Ok(entries)
}

fn parse_digest(data: &str) -> Result<Hash, KeyringError> {
    let invalid = || KeyringError::Validation("Message data must be a 32-byte hex digest".into());
    let bytes = decode_hex(data).map_err(|_| invalid())?;
    bytes.as_slice().try_into().map_err(|_| invalid())
}

fn personal_message_bytes(data: &str) -> Result<Vec<u8>, KeyringError> {
    if data.starts_with("0x") || data.starts_with("0X") {
        decode_hex(data)
            .map_err(|e| KeyringError::Validation(format!("Invalid message data: {e}")))
    } else {
        Ok(data.as_bytes().to_vec())
    }
}

#[async_trait]
impl KeyringApi for KeyringController {
    async fn create_new_vault_and_keychain(
        &self,
        password: &str,
    ) -> Result<PublicState, KeyringError> {
        let result = async {
            if password.is_empty() {
                return Err(KeyringError::Validation("Password cannot be empty".into()));
            }
            let mnemonic = self.provider.generate_mnemonic()?;
            let primary = self.primary_from_mnemonic(mnemonic)?;
            self.create_vault(password, primary).await
        }
        .await;
        observe("create_new_vault_and_keychain", result)
    }

    async fn create_new_vault_and_restore(
        &self,
        password: &str,
        seed_phrase: &str,
    ) -> Result<PublicState, KeyringError> {
        let result = async {
            if password.is_empty() {
                return Err(KeyringError::Validation("Password cannot be empty".into()));
            }
            let invalid = || KeyringError::Validation("Seed phrase is invalid".into());
            let phrase = shared_crypto::normalize_phrase(seed_phrase);
            if phrase.is_empty() {
                return Err(invalid());
            }
            let primary = self.primary_from_mnemonic(phrase).map_err(|e| match e.kind() {
                ErrorKind::Validation => invalid(),
                _ => e,
            })?;
            self.create_vault(password, primary).await
        }
        .await;
        observe("create_new_vault_and_restore", result)
    }

    async fn submit_password(&self, password: &str) -> Result<PublicState, KeyringError> {
        let result = async {
            let mut guard = self.session.lock().await;
            let blob = self.stored_vault()?;

            let plaintext = self.provider.decrypt(password, &blob).await.map_err(|e| {
                metrics::record_unlock_failure();
                KeyringError::Crypto(e.to_string())
            })?;
            let keyrings = self.restore_keyrings(&plaintext)?;

            let session = guard.insert(Session::new(Zeroizing::new(password.to_string()), keyrings));
            let state = session.public_state();
            self.publish(&state);

            info!(keyrings = state.keyrings.len(), "Vault unlocked");
            Ok(state)
        }
        .await;
        observe("submit_password", result)
    }

    async fn verify_password(&self, password: &str) -> Result<(), KeyringError> {
        let result = self.check_password(password).await;
        observe("verify_password", result)
    }

    async fn set_locked(&self) -> Result<PublicState, KeyringError> {
        let mut guard = self.session.lock().await;
        // Dropping the session zeroizes the password, mnemonics, seeds and keys
        drop(guard.take());

        let state = PublicState::locked();
        self.publish(&state);
        info!("Vault locked");
        observe("set_locked", Ok(state))
    }

    async fn add_new_account(&self) -> Result<PublicState, KeyringError> {
        let result = async {
            let mut guard = self.session.lock().await;
            let session = Self::unlocked(&mut guard)?;

            let mut staged = session.stage();
            // An index whose address was imported elsewhere is skipped for good
            let address = match staged.split_first_mut() {
                Some((Keyring::Hd(primary), others)) => primary
                    .add_account_skipping(self.provider.as_ref(), |candidate| {
                        others.position_of(candidate).is_some()
                    })?,
                _ => return Err(KeyringError::State("No primary HD keyring".into())),
            };

            let state = self.commit(session, staged).await?;
            debug!(account = %address, "Account added");
            Ok(state)
        }
        .await;
        observe("add_new_account", result)
    }

    async fn import_account_with_strategy(
        &self,
        strategy: ImportStrategy,
        args: &[String],
    ) -> Result<PublicState, KeyringError> {
        let result = async {
            let mut guard = self.session.lock().await;
            let session = Self::unlocked(&mut guard)?;

            let key = self.import_key(strategy, args).await?;
            let keyring = SimpleKeyring::with_key(self.provider.as_ref(), key)?;

            let mut staged = session.stage();
            for address in keyring.accounts() {
                staged.ensure_new(&address)?;
            }
            let imported = keyring.accounts();
            staged.push(Keyring::Simple(keyring));

            let state = self.commit(session, staged).await?;
            debug!(strategy = ?strategy, accounts = ?imported, "Account imported");
            Ok(state)
        }
        .await;
        observe("import_account_with_strategy", result)
    }

    async fn remove_account(&self, address: &Address) -> Result<PublicState, KeyringError> {
        let result = async {
            let mut guard = self.session.lock().await;
            let session = Self::unlocked(&mut guard)?;

            let mut staged = session.stage();
            let index = staged
                .position_of(address)
                .ok_or_else(KeyringError::unknown_account)?;
            staged[index].remove_account(address);
            // The primary keyring stays even when empty
            if index != 0 && staged[index].is_empty() {
                staged.remove(index);
            }

            let state = self.commit(session, staged).await?;
            debug!(account = %address, "Account removed");
            Ok(state)
        }
        .await;
        observe("remove_account", result)
    }

    async fn get_accounts(&self) -> Result<Vec<Address>, KeyringError> {
        let guard = self.session.lock().await;
        let result = Self::unlocked_ref(&guard).map(|session| session.keyrings().all_accounts());
        observe("get_accounts", result)
    }

    async fn keyring_for_account(
        &self,
        address: &Address,
    ) -> Result<KeyringSnapshot, KeyringError> {
        let guard = self.session.lock().await;
        let result = Self::unlocked_ref(&guard).and_then(|session| {
            let keyrings = session.keyrings();
            keyrings
                .position_of(address)
                .map(|index| keyrings[index].snapshot())
                .ok_or_else(KeyringError::unknown_account)
        });
        observe("keyring_for_account", result)
    }

    async fn keyrings_by_type(
        &self,
        keyring_type: KeyringType,
    ) -> Result<Vec<KeyringSnapshot>, KeyringError> {
        let guard = self.session.lock().await;
        let result = Self::unlocked_ref(&guard).map(|session| {
            session
                .keyrings()
                .iter()
                .filter(|keyring| keyring.keyring_type() == keyring_type)
                .map(Keyring::snapshot)
                .collect()
        });
        observe("keyrings_by_type", result)
    }

    async fn export_seed_phrase(
        &self,
        password: &str,
    ) -> Result<Zeroizing<String>, KeyringError> {
        let result = async {
            let guard = self.session.lock().await;
            let session = Self::unlocked_ref(&guard)?;
            self.check_password(password).await?;

            match session.keyrings().first() {
                Some(Keyring::Hd(primary)) => Ok(Zeroizing::new(primary.mnemonic().to_string())),
                _ => Err(KeyringError::State("No primary HD keyring".into())),
            }
        }
        .await;
        observe("export_seed_phrase", result)
    }

    async fn export_account(
        &self,
        password: &str,
        address: &Address,
    ) -> Result<Zeroizing<String>, KeyringError> {
        let result = async {
            let guard = self.session.lock().await;
            let session = Self::unlocked_ref(&guard)?;
            self.check_password(password).await?;

            let key = session.keyrings().key_for(address)?;
            Ok(key.to_hex())
        }
        .await;
        observe("export_account", result)
    }

    async fn sign_message(&self, params: &MessageParams) -> Result<String, KeyringError> {
        let result = async {
            let guard = self.session.lock().await;
            let session = Self::unlocked_ref(&guard)?;

            let digest = parse_digest(&params.data)?;
            let key = session.keyrings().key_for(&params.from)?;
            let signature = self.provider.sign_digest(key, &digest).await?;
            metrics::record_signature("message");
            Ok(signature.to_hex())
        }
        .await;
        observe("sign_message", result)
    }

    async fn sign_personal_message(
        &self,
        params: &MessageParams,
    ) -> Result<String, KeyringError> {
        let result = async {
            let guard = self.session.lock().await;
            let session = Self::unlocked_ref(&guard)?;

            let message = personal_message_bytes(&params.data)?;
            let key = session.keyrings().key_for(&params.from)?;
            let signature = self.provider.sign_personal_message(key, &message).await?;
            metrics::record_signature("personal");
            Ok(signature.to_hex())
        }
        .await;
        observe("sign_personal_message", result)
    }

    async fn sign_typed_message(
        &self,
        params: &TypedMessageParams,
        version: TypedDataVersion,
    ) -> Result<String, KeyringError> {
        let result = self
            .sign_typed(params, version)
            .await
            .map_err(KeyringError::typed_message);
        observe("sign_typed_message", result)
    }

    async fn sign_transaction(
        &self,
        transaction: &TransactionRequest,
        from: &Address,
    ) -> Result<SignedTransaction, KeyringError> {
        let result = async {
            let guard = self.session.lock().await;
            let session = Self::unlocked_ref(&guard)?;

            let key = session.keyrings().key_for(from)?;
            let signed = self.provider.sign_transaction(key, transaction).await?;
            metrics::record_signature("transaction");
            Ok(signed)
        }
        .await;
        observe("sign_transaction", result)
    }
}

impl StateSource for KeyringController {
    fn name(&self) -> &str {
        self.source.name()
    }

    fn state_value(&self) -> Value {
        self.source.state_value()
    }

    fn subscribe_value(&self, listener: ValueListener) -> SubscriptionId {
        self.source.subscribe_value(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.source.unsubscribe(id)
    }
}
