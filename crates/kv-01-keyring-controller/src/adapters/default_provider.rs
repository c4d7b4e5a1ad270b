//! # Default Crypto Provider
//!
//! Implements [`CryptoProvider`] with `shared-crypto`:
//!
//! - Vault: PBKDF2-SHA256 + AES-256-GCM (or XChaCha20-Poly1305), JSON blob
//! - Keys: BIP-39 mnemonics, BIP-32/44 derivation, secp256k1
//! - Imports: Web3 Secret Storage V3 (scrypt / pbkdf2 + AES-128-CTR)

use crate::ports::outbound::CryptoProvider;
use async_trait::async_trait;
use shared_crypto::{
    decrypt_keystore, decrypt_with_password, derive_account_key, encrypt_with_password,
    generate_mnemonic, hash_typed_data, hash_typed_data_v1, mnemonic_to_seed,
    personal_message_hash, sign_transaction, Cipher, CryptoError, DerivationPath, Eip712Version,
    Hash, PrivateKey, RecoverableSignature, SignedTransaction, TransactionRequest, TypedData,
    TypedDataV1Entry, DEFAULT_KDF_ITERATIONS,
};
use shared_types::Address;
use zeroize::Zeroizing;

/// Crypto provider used when the host does not inject one.
#[derive(Clone, Debug)]
pub struct DefaultCryptoProvider {
    cipher: Cipher,
    kdf_iterations: u32,
}

impl DefaultCryptoProvider {
    pub fn new(cipher: Cipher, kdf_iterations: u32) -> Self {
        Self {
            cipher,
            kdf_iterations,
        }
    }
}

impl Default for DefaultCryptoProvider {
    fn default() -> Self {
        Self::new(Cipher::default(), DEFAULT_KDF_ITERATIONS)
    }
}

#[async_trait]
impl CryptoProvider for DefaultCryptoProvider {
    async fn encrypt(&self, password: &str, plaintext: &[u8]) -> Result<String, CryptoError> {
        encrypt_with_password(password, plaintext, self.cipher, self.kdf_iterations)
    }

    async fn decrypt(
        &self,
        password: &str,
        blob: &str,
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        decrypt_with_password(password, blob)
    }

    fn generate_mnemonic(&self) -> Result<Zeroizing<String>, CryptoError> {
        generate_mnemonic()
    }

    fn mnemonic_to_seed(&self, mnemonic: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let seed = mnemonic_to_seed(mnemonic)?;
        Ok(Zeroizing::new(seed.to_vec()))
    }

    fn derive_account(
        &self,
        seed: &[u8],
        hd_path: &DerivationPath,
        index: u32,
    ) -> Result<PrivateKey, CryptoError> {
        derive_account_key(seed, hd_path, index)
    }

    fn address_of(&self, key: &PrivateKey) -> Result<Address, CryptoError> {
        key.address()
    }

    async fn decrypt_keystore(
        &self,
        json: &str,
        password: &str,
    ) -> Result<PrivateKey, CryptoError> {
        decrypt_keystore(json, password)
    }

    async fn sign_digest(
        &self,
        key: &PrivateKey,
        digest: &Hash,
    ) -> Result<RecoverableSignature, CryptoError> {
        key.sign_digest(digest)
    }

    async fn sign_personal_message(
        &self,
        key: &PrivateKey,
        message: &[u8],
    ) -> Result<RecoverableSignature, CryptoError> {
        key.sign_digest(&personal_message_hash(message))
    }

    async fn sign_typed_data_v1(
        &self,
        key: &PrivateKey,
        entries: &[TypedDataV1Entry],
    ) -> Result<RecoverableSignature, CryptoError> {
        key.sign_digest(&hash_typed_data_v1(entries)?)
    }

    async fn sign_typed_data(
        &self,
        key: &PrivateKey,
        data: &TypedData,
        version: Eip712Version,
    ) -> Result<RecoverableSignature, CryptoError> {
        key.sign_digest(&hash_typed_data(data, version)?)
    }

    async fn sign_transaction(
        &self,
        key: &PrivateKey,
        transaction: &TransactionRequest,
    ) -> Result<SignedTransaction, CryptoError> {
        sign_transaction(key, transaction)
    }
}
