//! # Shared Crypto - Default Key-Management Primitives
//!
//! Everything the keyring controller's default crypto provider needs.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | PBKDF2-SHA256 + AES-256-GCM / XChaCha20-Poly1305 | Vault encryption |
//! | `hashing` | Keccak-256, EIP-191 | Addresses, personal messages |
//! | `ecdsa` | secp256k1 | Recoverable signing |
//! | `mnemonic` | BIP-39 | Seed phrases |
//! | `hd` | BIP-32 / BIP-44 | Account derivation |
//! | `keystore` | Web3 Secret Storage V3 | JSON key import |
//! | `typed_data` | V1, EIP-712 V3/V4 | Typed message hashing |
//! | `transaction` | RLP, EIP-155, EIP-1559 | Transaction signing |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic, low-S normalization (EIP-2)
//! - **Vault**: fresh salt and nonce per encryption, authenticated ciphertext
//! - **Secrets**: private keys, seeds and derived keys are zeroized on drop

#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod hd;
pub mod keystore;
pub mod mnemonic;
pub mod symmetric;
pub mod transaction;
pub mod typed_data;

// Re-exports
pub use ecdsa::{recover_address, PrivateKey, RecoverableSignature};
pub use errors::CryptoError;
pub use hashing::{keccak256, personal_message_hash, Hash};
pub use hd::{derive_account_key, DerivationPath, DEFAULT_HD_PATH};
pub use keystore::{decrypt_keystore, encrypt_keystore, KdfParams};
pub use mnemonic::{generate_mnemonic, mnemonic_to_seed, normalize_phrase, validate_mnemonic};
pub use symmetric::{
    decrypt_with_password, encrypt_with_password, Cipher, DEFAULT_KDF_ITERATIONS,
};
pub use transaction::{
    sign_transaction, AccessListItem, Eip1559Transaction, LegacyTransaction, SignedTransaction,
    TransactionRequest,
};
pub use typed_data::{
    hash_typed_data, hash_typed_data_v1, Eip712Version, TypedData, TypedDataV1Entry,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
