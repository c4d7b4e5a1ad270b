//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of the keyring controller.

use crate::domain::entities::{
    ImportStrategy, KeyringSnapshot, KeyringType, MessageParams, PublicState, TypedDataVersion,
    TypedMessageParams,
};
use crate::domain::errors::KeyringError;
use async_trait::async_trait;
use shared_crypto::{SignedTransaction, TransactionRequest};
use shared_types::Address;
use zeroize::Zeroizing;

/// Primary Keyring Controller API.
///
/// Every operation other than vault creation and password submission fails
/// with a state error while the controller is locked.
#[async_trait]
pub trait KeyringApi: Send + Sync {
    // =========================================================================
    // Vault Lifecycle
    // =========================================================================

    /// Create a vault holding one HD keyring with one account, and unlock.
    async fn create_new_vault_and_keychain(
        &self,
        password: &str,
    ) -> Result<PublicState, KeyringError>;

    /// Like `create_new_vault_and_keychain`, from an existing seed phrase.
    async fn create_new_vault_and_restore(
        &self,
        password: &str,
        seed_phrase: &str,
    ) -> Result<PublicState, KeyringError>;

    /// Decrypt the persisted vault and unlock.
    async fn submit_password(&self, password: &str) -> Result<PublicState, KeyringError>;

    /// Check `password` against the persisted vault.
    async fn verify_password(&self, password: &str) -> Result<(), KeyringError>;

    /// Drop every in-memory secret and lock.
    async fn set_locked(&self) -> Result<PublicState, KeyringError>;

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Derive the next account of the primary keyring.
    async fn add_new_account(&self) -> Result<PublicState, KeyringError>;

    async fn import_account_with_strategy(
        &self,
        strategy: ImportStrategy,
        args: &[String],
    ) -> Result<PublicState, KeyringError>;

    async fn remove_account(&self, address: &Address) -> Result<PublicState, KeyringError>;

    /// Every account, in keyring order.
    async fn get_accounts(&self) -> Result<Vec<Address>, KeyringError>;

    async fn keyring_for_account(
        &self,
        address: &Address,
    ) -> Result<KeyringSnapshot, KeyringError>;

    async fn keyrings_by_type(
        &self,
        keyring_type: KeyringType,
    ) -> Result<Vec<KeyringSnapshot>, KeyringError>;

    // =========================================================================
    // Export
    // =========================================================================

    /// Mnemonic of the primary keyring.
    async fn export_seed_phrase(&self, password: &str)
        -> Result<Zeroizing<String>, KeyringError>;

    /// Hex private key (no `0x`) of `address`.
    async fn export_account(
        &self,
        password: &str,
        address: &Address,
    ) -> Result<Zeroizing<String>, KeyringError>;

    // =========================================================================
    // Signing
    // =========================================================================

    /// Sign a 32-byte digest. Returns `0x`-prefixed `r || s || v`.
    async fn sign_message(&self, params: &MessageParams) -> Result<String, KeyringError>;

    /// EIP-191 personal message signature.
    async fn sign_personal_message(&self, params: &MessageParams)
        -> Result<String, KeyringError>;

    /// Typed data signature. Every failure carries the
    /// `Keyring Controller signTypedMessage: ` prefix.
    async fn sign_typed_message(
        &self,
        params: &TypedMessageParams,
        version: TypedDataVersion,
    ) -> Result<String, KeyringError>;

    async fn sign_transaction(
        &self,
        transaction: &TransactionRequest,
        from: &Address,
    ) -> Result<SignedTransaction, KeyringError>;
}
