//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits that define dependencies this controller needs.

use async_trait::async_trait;
use shared_crypto::{
    CryptoError, DerivationPath, Eip712Version, Hash, PrivateKey, RecoverableSignature,
    SignedTransaction, TransactionRequest, TypedData, TypedDataV1Entry,
};
use shared_types::Address;
use zeroize::Zeroizing;

/// Cryptographic backend of the keyring controller.
///
/// Every primitive the controller relies on goes through this trait, so a
/// host can swap the vault format or signer and tests can inject fakes.
/// Secret inputs and outputs are passed in zeroizing wrappers.
///
/// Errors are reported as [`CryptoError`]; their `Display` text reaches the
/// caller verbatim.
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    // =========================================================================
    // Vault
    // =========================================================================

    /// Encrypt the serialized keyrings under `password` into a self-describing blob.
    async fn encrypt(&self, password: &str, plaintext: &[u8]) -> Result<String, CryptoError>;

    /// Reverse of [`CryptoProvider::encrypt`].
    ///
    /// # Errors
    /// * wrong password - must not be distinguishable from tampering
    async fn decrypt(&self, password: &str, blob: &str)
        -> Result<Zeroizing<Vec<u8>>, CryptoError>;

    // =========================================================================
    // Key material
    // =========================================================================

    /// Fresh mnemonic for a new HD keyring.
    fn generate_mnemonic(&self) -> Result<Zeroizing<String>, CryptoError>;

    /// Seed of a mnemonic. Malformed phrases fail with `InvalidMnemonic`.
    fn mnemonic_to_seed(&self, mnemonic: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError>;

    /// Key of account `index` under `hd_path`.
    fn derive_account(
        &self,
        seed: &[u8],
        hd_path: &DerivationPath,
        index: u32,
    ) -> Result<PrivateKey, CryptoError>;

    /// Address controlled by `key`.
    fn address_of(&self, key: &PrivateKey) -> Result<Address, CryptoError>;

    /// Decrypt an encrypted JSON key file.
    async fn decrypt_keystore(&self, json: &str, password: &str)
        -> Result<PrivateKey, CryptoError>;

    // =========================================================================
    // Signing
    // =========================================================================

    /// Sign a 32-byte digest as-is.
    async fn sign_digest(
        &self,
        key: &PrivateKey,
        digest: &Hash,
    ) -> Result<RecoverableSignature, CryptoError>;

    /// EIP-191 `personal_sign`.
    async fn sign_personal_message(
        &self,
        key: &PrivateKey,
        message: &[u8],
    ) -> Result<RecoverableSignature, CryptoError>;

    /// Legacy typed data.
    async fn sign_typed_data_v1(
        &self,
        key: &PrivateKey,
        entries: &[TypedDataV1Entry],
    ) -> Result<RecoverableSignature, CryptoError>;

    /// EIP-712 typed data.
    async fn sign_typed_data(
        &self,
        key: &PrivateKey,
        data: &TypedData,
        version: Eip712Version,
    ) -> Result<RecoverableSignature, CryptoError>;

    async fn sign_transaction(
        &self,
        key: &PrivateKey,
        transaction: &TransactionRequest,
    ) -> Result<SignedTransaction, CryptoError>;
}
