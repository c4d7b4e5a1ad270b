//! # Domain Entities
//!
//! Public, secret-free data structures of the keyring controller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::Address;
use std::fmt;

// =============================================================================
// Keyring Types
// =============================================================================

/// Strategy tag of a keyring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyringType {
    /// BIP-32/BIP-44 tree derived from a mnemonic
    #[serde(rename = "HD Key Tree")]
    Hd,
    /// Individually imported private keys
    #[serde(rename = "Simple Key Pair")]
    Simple,
}

impl KeyringType {
    /// Every strategy the controller knows.
    pub const ALL: [KeyringType; 2] = [KeyringType::Hd, KeyringType::Simple];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hd => "HD Key Tree",
            Self::Simple => "Simple Key Pair",
        }
    }
}

impl fmt::Display for KeyringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Public State
// =============================================================================

/// One keyring as seen from outside.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyringSnapshot {
    #[serde(rename = "type")]
    pub keyring_type: KeyringType,
    pub accounts: Vec<Address>,
}

/// Externally visible controller state.
///
/// Always an owned snapshot; changing it never affects the controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicState {
    pub is_unlocked: bool,
    pub keyring_types: Vec<KeyringType>,
    pub keyrings: Vec<KeyringSnapshot>,
}

impl PublicState {
    /// State of a locked controller.
    pub fn locked() -> Self {
        Self {
            is_unlocked: false,
            keyring_types: KeyringType::ALL.to_vec(),
            keyrings: Vec::new(),
        }
    }

    /// All accounts in keyring order.
    pub fn accounts(&self) -> Vec<Address> {
        self.keyrings
            .iter()
            .flat_map(|keyring| keyring.accounts.iter().copied())
            .collect()
    }
}

impl Default for PublicState {
    fn default() -> Self {
        Self::locked()
    }
}

/// Persisted controller state: the encrypted vault blob.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultState {
    pub vault: Option<String>,
}

// =============================================================================
// Operation Parameters
// =============================================================================

/// Import strategies for `import_account_with_strategy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportStrategy {
    /// `args = [hex private key]`
    PrivateKey,
    /// `args = [V3 keystore JSON, password]`
    Json,
}

/// Typed-message encodings for `sign_typed_message`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypedDataVersion {
    V1,
    V3,
    V4,
}

impl TypedDataVersion {
    pub(crate) fn metric_label(self) -> &'static str {
        match self {
            Self::V1 => "typed_v1",
            Self::V3 => "typed_v3",
            Self::V4 => "typed_v4",
        }
    }
}

/// Parameters of `sign_message` and `sign_personal_message`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageParams {
    pub from: Address,
    /// Hex (`0x…`) bytes; personal messages also accept plain UTF-8 text.
    pub data: String,
}

/// Parameters of `sign_typed_message`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypedMessageParams {
    pub from: Address,
    /// V1: array of `{type, name, value}`. V3/V4: EIP-712 document, either as
    /// an object or a JSON string.
    pub data: Value,
}
