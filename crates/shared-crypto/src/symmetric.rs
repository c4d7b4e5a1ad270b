//! # Vault Encryption
//!
//! Password-based encryption of the serialized keyring vault.
//!
//! The key is derived with PBKDF2-HMAC-SHA256 and the payload sealed with an
//! AEAD cipher. Every parameter needed to open the blob (cipher, KDF,
//! iteration count, salt, IV) travels with it, so a blob written with one
//! configuration still opens after the defaults change.
//!
//! ## Security Properties
//!
//! - **AES-256-GCM** (default): 96-bit random IV per encryption
//! - **XChaCha20-Poly1305**: 192-bit random nonce, constant-time ARX design
//! - Derived keys are zeroized on drop

use crate::CryptoError;
use aes_gcm::Aes256Gcm;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

/// Current vault blob format version.
pub const VAULT_VERSION: u8 = 1;

/// Default PBKDF2 iteration count.
pub const DEFAULT_KDF_ITERATIONS: u32 = 10_000;

const SALT_LEN: usize = 32;
const KDF_NAME: &str = "pbkdf2-sha256";

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Derive from a password with PBKDF2-HMAC-SHA256.
    pub fn derive(password: &str, salt: &[u8], iterations: u32) -> Self {
        let mut bytes = [0u8; 32];
        pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Cipher selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cipher {
    /// AES-256-GCM (default)
    #[default]
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    /// XChaCha20-Poly1305
    #[serde(rename = "xchacha20-poly1305")]
    XChaCha20Poly1305,
}

impl Cipher {
    fn nonce_len(self) -> usize {
        match self {
            Cipher::Aes256Gcm => 12,
            Cipher::XChaCha20Poly1305 => 24,
        }
    }
}

/// Serialized form of an encrypted vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultBlob {
    /// Format version
    pub version: u8,
    /// AEAD cipher
    pub cipher: Cipher,
    /// Key derivation function name
    pub kdf: String,
    /// KDF iteration count
    pub iterations: u32,
    /// KDF salt (hex)
    pub salt: String,
    /// Cipher IV / nonce (hex)
    pub iv: String,
    /// Ciphertext with authentication tag (hex)
    pub data: String,
}

impl VaultBlob {
    /// Parse a blob from its JSON string.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        serde_json::from_str(json).map_err(|e| CryptoError::InvalidVault(e.to_string()))
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(self).map_err(|e| CryptoError::InvalidVault(e.to_string()))
    }
}

/// Encrypt `plaintext` under `password`, returning the JSON vault blob.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if the cipher rejects the input.
pub fn encrypt_with_password(
    password: &str,
    plaintext: &[u8],
    cipher: Cipher,
    iterations: u32,
) -> Result<String, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut salt);
    let mut iv = vec![0u8; cipher.nonce_len()];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut iv);

    let key = SecretKey::derive(password, &salt, iterations);
    let ciphertext = seal(cipher, &key, &iv, plaintext)?;

    VaultBlob {
        version: VAULT_VERSION,
        cipher,
        kdf: KDF_NAME.to_string(),
        iterations,
        salt: hex::encode(salt),
        iv: hex::encode(iv),
        data: hex::encode(ciphertext),
    }
    .to_json()
}

/// Decrypt a JSON vault blob.
///
/// # Errors
///
/// - `CryptoError::InvalidVault` if the blob is malformed or unsupported
/// - `CryptoError::IncorrectPassword` if authentication fails
pub fn decrypt_with_password(password: &str, blob: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let blob = VaultBlob::from_json(blob)?;
    if blob.version != VAULT_VERSION {
        return Err(CryptoError::InvalidVault(format!(
            "unsupported version {}",
            blob.version
        )));
    }
    if blob.kdf != KDF_NAME {
        return Err(CryptoError::InvalidVault(format!("unsupported kdf {}", blob.kdf)));
    }

    let salt = hex::decode(&blob.salt).map_err(|e| CryptoError::InvalidVault(e.to_string()))?;
    let iv = hex::decode(&blob.iv).map_err(|e| CryptoError::InvalidVault(e.to_string()))?;
    let data = hex::decode(&blob.data).map_err(|e| CryptoError::InvalidVault(e.to_string()))?;
    if iv.len() != blob.cipher.nonce_len() {
        return Err(CryptoError::InvalidVault("iv length mismatch".to_string()));
    }

    let key = SecretKey::derive(password, &salt, blob.iterations);
    open(blob.cipher, &key, &iv, &data).map(Zeroizing::new)
}

fn seal(cipher: Cipher, key: &SecretKey, iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    match cipher {
        Cipher::Aes256Gcm => Aes256Gcm::new(key.as_bytes().into())
            .encrypt(aes_gcm::Nonce::from_slice(iv), plaintext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string())),
        Cipher::XChaCha20Poly1305 => XChaCha20Poly1305::new(key.as_bytes().into())
            .encrypt(XNonce::from_slice(iv), plaintext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string())),
    }
}

fn open(cipher: Cipher, key: &SecretKey, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    match cipher {
        Cipher::Aes256Gcm => Aes256Gcm::new(key.as_bytes().into())
            .decrypt(aes_gcm::Nonce::from_slice(iv), ciphertext)
            .map_err(|_| CryptoError::IncorrectPassword),
        Cipher::XChaCha20Poly1305 => XChaCha20Poly1305::new(key.as_bytes().into())
            .decrypt(XNonce::from_slice(iv), ciphertext)
            .map_err(|_| CryptoError::IncorrectPassword),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 64;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        for cipher in [Cipher::Aes256Gcm, Cipher::XChaCha20Poly1305] {
            let blob = encrypt_with_password("hunter2", b"vault contents", cipher, FAST).unwrap();
            let plain = decrypt_with_password("hunter2", &blob).unwrap();
            assert_eq!(plain.as_slice(), b"vault contents");
        }
    }

    #[test]
    fn test_wrong_password_fails() {
        let blob = encrypt_with_password("right", b"secret", Cipher::default(), FAST).unwrap();
        assert_eq!(
            decrypt_with_password("wrong", &blob).unwrap_err(),
            CryptoError::IncorrectPassword
        );
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let blob = encrypt_with_password("pw", b"secret", Cipher::default(), FAST).unwrap();
        let mut parsed = VaultBlob::from_json(&blob).unwrap();
        let mut data = hex::decode(&parsed.data).unwrap();
        data[0] ^= 0xFF;
        parsed.data = hex::encode(data);

        let result = decrypt_with_password("pw", &parsed.to_json().unwrap());
        assert_eq!(result.unwrap_err(), CryptoError::IncorrectPassword);
    }

    #[test]
    fn test_blob_records_parameters() {
        let blob = encrypt_with_password("pw", b"x", Cipher::XChaCha20Poly1305, 77).unwrap();
        let parsed = VaultBlob::from_json(&blob).unwrap();
        assert_eq!(parsed.version, VAULT_VERSION);
        assert_eq!(parsed.cipher, Cipher::XChaCha20Poly1305);
        assert_eq!(parsed.iterations, 77);
        assert_eq!(parsed.iv.len(), 48);
        assert!(blob.contains("\"xchacha20-poly1305\""));
    }

    #[test]
    fn test_salt_uniqueness() {
        let a = encrypt_with_password("pw", b"x", Cipher::default(), FAST).unwrap();
        let b = encrypt_with_password("pw", b"x", Cipher::default(), FAST).unwrap();
        assert_ne!(VaultBlob::from_json(&a).unwrap().salt, VaultBlob::from_json(&b).unwrap().salt);
    }

    #[test]
    fn test_malformed_blob() {
        assert!(matches!(
            decrypt_with_password("pw", "not json"),
            Err(CryptoError::InvalidVault(_))
        ));
    }
}
