//! Web3 Secret Storage (V3 keystore) files.
//!
//! Supports the `scrypt` and `pbkdf2` (hmac-sha256) KDFs with the
//! `aes-128-ctr` cipher. The MAC is `keccak256(DK[16..32] || ciphertext)`.

use crate::ecdsa::PrivateKey;
use crate::hashing::keccak256_concat;
use crate::CryptoError;
use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use shared_types::decode_hex;
use zeroize::Zeroizing;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

/// Keystore format version.
pub const KEYSTORE_VERSION: u32 = 3;

const CIPHER: &str = "aes-128-ctr";
const DKLEN: usize = 32;

/// Highest pbkdf2 round count accepted from a keystore file.
pub const MAX_PBKDF2_ROUNDS: u32 = 10_000_000;
/// Highest scrypt working set (`128 * r * n` bytes) accepted from a keystore file.
pub const MAX_SCRYPT_MEMORY: u64 = 512 * 1024 * 1024;
/// Highest scrypt parallelism accepted from a keystore file.
pub const MAX_SCRYPT_PARALLELISM: u32 = 16;

/// Top-level keystore document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Keystore {
    pub version: u32,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(alias = "Crypto")]
    pub crypto: KeystoreCrypto,
}

/// The `crypto` section.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub cipher: String,
    pub cipherparams: CipherParams,
    pub ciphertext: String,
    #[serde(flatten)]
    pub kdf: KdfParams,
    pub mac: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CipherParams {
    pub iv: String,
}

/// KDF selector and parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kdf", content = "kdfparams", rename_all = "lowercase")]
pub enum KdfParams {
    Scrypt {
        dklen: usize,
        n: u64,
        r: u32,
        p: u32,
        salt: String,
    },
    Pbkdf2 {
        dklen: usize,
        c: u32,
        #[serde(default = "default_prf")]
        prf: String,
        salt: String,
    },
}

fn default_prf() -> String {
    "hmac-sha256".to_string()
}

impl KdfParams {
    /// Light scrypt parameters (n = 2^log_n, r = 8, p = 1).
    pub fn scrypt(log_n: u8) -> Self {
        let mut salt = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::Scrypt {
            dklen: DKLEN,
            n: 1u64 << log_n,
            r: 8,
            p: 1,
            salt: hex::encode(salt),
        }
    }

    /// Reject parameters that would exhaust memory or CPU before deriving.
    pub fn check_bounds(&self) -> Result<(), CryptoError> {
        let invalid = |msg: String| Err(CryptoError::InvalidKeystore(msg));
        if self.dklen() != DKLEN {
            return invalid(format!("dklen must be {DKLEN}, got {}", self.dklen()));
        }
        match self {
            Self::Scrypt { n, r, p, .. } => {
                if *n < 2 || !n.is_power_of_two() {
                    return invalid(format!("scrypt n={n}"));
                }
                if *r == 0 || *p == 0 || *p > MAX_SCRYPT_PARALLELISM {
                    return invalid(format!("scrypt r={r} p={p}"));
                }
                let memory = n
                    .checked_mul(u64::from(*r))
                    .and_then(|blocks| blocks.checked_mul(128));
                match memory {
                    Some(bytes) if bytes <= MAX_SCRYPT_MEMORY => Ok(()),
                    _ => invalid(format!("scrypt n={n} r={r} exceeds memory limit")),
                }
            }
            Self::Pbkdf2 { c, .. } => {
                if *c == 0 || *c > MAX_PBKDF2_ROUNDS {
                    return invalid(format!("pbkdf2 c={c}"));
                }
                Ok(())
            }
        }
    }

    fn derive(&self, password: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        self.check_bounds()?;
        match self {
            Self::Scrypt { dklen, n, r, p, salt } => {
                let salt = decode_field("salt", salt)?;
                let log_n = n.trailing_zeros() as u8;
                let params = scrypt::Params::new(log_n, *r, *p, *dklen)
                    .map_err(|e| CryptoError::InvalidKeystore(e.to_string()))?;
                let mut derived = Zeroizing::new(vec![0u8; *dklen]);
                scrypt::scrypt(password.as_bytes(), &salt, &params, &mut derived)
                    .map_err(|e| CryptoError::InvalidKeystore(e.to_string()))?;
                Ok(derived)
            }
            Self::Pbkdf2 { dklen, c, prf, salt } => {
                if prf != "hmac-sha256" {
                    return Err(CryptoError::InvalidKeystore(format!("unsupported prf {prf}")));
                }
                let salt = decode_field("salt", salt)?;
                let mut derived = Zeroizing::new(vec![0u8; *dklen]);
                pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, *c, &mut derived);
                Ok(derived)
            }
        }
    }

    fn dklen(&self) -> usize {
        match self {
            Self::Scrypt { dklen, .. } | Self::Pbkdf2 { dklen, .. } => *dklen,
        }
    }
}

impl Keystore {
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let keystore: Self =
            serde_json::from_str(json).map_err(|e| CryptoError::InvalidKeystore(e.to_string()))?;
        if keystore.version != KEYSTORE_VERSION {
            return Err(CryptoError::InvalidKeystore(format!(
                "unsupported version {}",
                keystore.version
            )));
        }
        Ok(keystore)
    }

    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(self).map_err(|e| CryptoError::InvalidKeystore(e.to_string()))
    }
}

/// Decrypt a V3 keystore into its private key.
pub fn decrypt_keystore(json: &str, password: &str) -> Result<PrivateKey, CryptoError> {
    let keystore = Keystore::from_json(json)?;
    let crypto = &keystore.crypto;
    if crypto.cipher != CIPHER {
        return Err(CryptoError::InvalidKeystore(format!(
            "unsupported cipher {}",
            crypto.cipher
        )));
    }
    crypto.kdf.check_bounds()?;

    let ciphertext = decode_field("ciphertext", &crypto.ciphertext)?;
    let iv = decode_field("iv", &crypto.cipherparams.iv)?;
    let mac = decode_field("mac", &crypto.mac)?;

    let derived = crypto.kdf.derive(password)?;
    let expected = keccak256_concat(&[&derived[16..32], &ciphertext]);
    if expected[..] != mac[..] {
        return Err(CryptoError::WrongPassphrase);
    }

    let mut plaintext = Zeroizing::new(ciphertext);
    let mut cipher = Aes128Ctr::new_from_slices(&derived[..16], &iv)
        .map_err(|e| CryptoError::InvalidKeystore(e.to_string()))?;
    cipher.apply_keystream(&mut plaintext);

    let bytes: [u8; 32] = plaintext
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidPrivateKey)?;
    PrivateKey::from_bytes(bytes)
}

/// Encrypt a private key into a V3 keystore document.
pub fn encrypt_keystore(
    key: &PrivateKey,
    password: &str,
    kdf: KdfParams,
) -> Result<String, CryptoError> {
    let mut iv = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut iv);

    let derived = kdf.derive(password)?;
    let mut ciphertext = key.as_bytes().to_vec();
    let mut cipher = Aes128Ctr::new_from_slices(&derived[..16], &iv)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    cipher.apply_keystream(&mut ciphertext);
    let mac = keccak256_concat(&[&derived[16..32], &ciphertext]);

    let address = key.address()?;
    Keystore {
        version: KEYSTORE_VERSION,
        id: Some(uuid::Uuid::new_v4().to_string()),
        address: Some(hex::encode(address.as_bytes())),
        crypto: KeystoreCrypto {
            cipher: CIPHER.to_string(),
            cipherparams: CipherParams { iv: hex::encode(iv) },
            ciphertext: hex::encode(ciphertext),
            kdf,
            mac: hex::encode(mac),
        },
    }
    .to_json()
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, CryptoError> {
    decode_hex(value).map_err(|e| CryptoError::InvalidKeystore(format!("{name}: {e}")))
}
