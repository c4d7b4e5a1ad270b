//! # Vault Plaintext
//!
//! The serialized keyring sequence the crypto provider encrypts:
//!
//! ```json
//! [
//!   { "type": "HD Key Tree",
//!     "data": { "mnemonic": "…", "hdPath": "m/44'/60'/0'/0",
//!               "accountIndices": [0, 1], "nextIndex": 2 } },
//!   { "type": "Simple Key Pair", "data": ["<hex private key>"] }
//! ]
//! ```

use crate::domain::errors::KeyringError;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Persisted form of an HD keyring.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct HdKeyringData {
    pub mnemonic: String,
    pub hd_path: String,
    pub account_indices: Vec<u32>,
    pub next_index: u32,
}

/// Persisted form of a simple keyring: hex private keys without `0x`.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SimpleKeyringData(pub Vec<String>);

/// One vault entry.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SerializedKeyring {
    #[serde(rename = "HD Key Tree")]
    Hd(HdKeyringData),
    #[serde(rename = "Simple Key Pair")]
    Simple(SimpleKeyringData),
}

/// JSON text of the vault plaintext.
pub fn encode_vault(entries: &[SerializedKeyring]) -> Result<Zeroizing<String>, KeyringError> {
    serde_json::to_string(entries)
        .map(Zeroizing::new)
        .map_err(|e| KeyringError::Crypto(format!("Failed to serialize vault: {e}")))
}

/// Parse decrypted vault plaintext.
pub fn decode_vault(plaintext: &[u8]) -> Result<Vec<SerializedKeyring>, KeyringError> {
    serde_json::from_slice(plaintext)
        .map_err(|e| KeyringError::Crypto(format!("Invalid vault: {e}")))
}
