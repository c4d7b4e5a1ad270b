//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
///
/// The `Display` text is surfaced verbatim by the keyring controller, so the
/// messages are written for end users.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Vault authentication failed (wrong password or tampered blob)
    #[error("Incorrect password")]
    IncorrectPassword,

    /// Vault blob could not be parsed
    #[error("Invalid vault: {0}")]
    InvalidVault(String),

    /// Keystore MAC mismatch
    #[error("Key derivation failed - possibly wrong passphrase")]
    WrongPassphrase,

    /// Keystore JSON is malformed or uses unsupported parameters
    #[error("Invalid keystore: {0}")]
    InvalidKeystore(String),

    /// Mnemonic failed BIP-39 validation
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Derivation path could not be parsed
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    /// Child key derivation produced an invalid scalar
    #[error("Key derivation failed at index {0}")]
    DerivationFailed(u32),

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Invalid signature
    #[error("Invalid signature")]
    InvalidSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Typed data failed schema validation or encoding
    #[error("{0}")]
    InvalidTypedData(String),

    /// Invalid input for cryptographic operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
