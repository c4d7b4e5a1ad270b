//! # Keyrings
//!
//! The closed set of keyring strategies behind one account/signing surface.

use crate::domain::entities::{KeyringSnapshot, KeyringType};
use crate::domain::errors::KeyringError;
use crate::domain::hd_keyring::HdKeyring;
use crate::domain::simple_keyring::SimpleKeyring;
use crate::domain::vault::SerializedKeyring;
use crate::ports::outbound::CryptoProvider;
use shared_crypto::PrivateKey;
use shared_types::Address;

#[derive(Clone, Debug)]
pub enum Keyring {
    Hd(HdKeyring),
    Simple(SimpleKeyring),
}

impl Keyring {
    pub fn keyring_type(&self) -> KeyringType {
        match self {
            Self::Hd(_) => KeyringType::Hd,
            Self::Simple(_) => KeyringType::Simple,
        }
    }

    pub fn accounts(&self) -> Vec<Address> {
        match self {
            Self::Hd(keyring) => keyring.accounts(),
            Self::Simple(keyring) => keyring.accounts(),
        }
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.key_for(address).is_some()
    }

    pub fn key_for(&self, address: &Address) -> Option<&PrivateKey> {
        match self {
            Self::Hd(keyring) => keyring.key_for(address),
            Self::Simple(keyring) => keyring.key_for(address),
        }
    }

    pub fn remove_account(&mut self, address: &Address) -> bool {
        match self {
            Self::Hd(keyring) => keyring.remove_account(address),
            Self::Simple(keyring) => keyring.remove_account(address),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts().is_empty()
    }

    pub fn snapshot(&self) -> KeyringSnapshot {
        KeyringSnapshot {
            keyring_type: self.keyring_type(),
            accounts: self.accounts(),
        }
    }

    pub fn serialize(&self) -> SerializedKeyring {
        match self {
            Self::Hd(keyring) => SerializedKeyring::Hd(keyring.serialize()),
            Self::Simple(keyring) => SerializedKeyring::Simple(keyring.serialize()),
        }
    }

    pub fn restore(
        provider: &dyn CryptoProvider,
        entry: &SerializedKeyring,
    ) -> Result<Self, KeyringError> {
        match entry {
            SerializedKeyring::Hd(data) => Ok(Self::Hd(HdKeyring::restore(provider, data)?)),
            SerializedKeyring::Simple(data) => {
                Ok(Self::Simple(SimpleKeyring::restore(provider, data)?))
            }
        }
    }
}

/// Operations over the ordered keyring sequence.
pub trait KeyringSet {
    /// Every account, in keyring order.
    fn all_accounts(&self) -> Vec<Address>;

    /// Position of the keyring owning `address`.
    fn position_of(&self, address: &Address) -> Option<usize>;

    /// Signing key of `address`.
    fn key_for(&self, address: &Address) -> Result<&PrivateKey, KeyringError>;

    /// Reject addresses that some keyring already holds.
    fn ensure_new(&self, address: &Address) -> Result<(), KeyringError> {
        match self.position_of(address) {
            Some(_) => Err(KeyringError::duplicate_account()),
            None => Ok(()),
        }
    }
}

impl KeyringSet for [Keyring] {
    fn all_accounts(&self) -> Vec<Address> {
        self.iter().flat_map(Keyring::accounts).collect()
    }

    fn position_of(&self, address: &Address) -> Option<usize> {
        self.iter().position(|keyring| keyring.contains(address))
    }

    fn key_for(&self, address: &Address) -> Result<&PrivateKey, KeyringError> {
        self.iter()
            .find_map(|keyring| keyring.key_for(address))
            .ok_or_else(KeyringError::unknown_account)
    }
}
