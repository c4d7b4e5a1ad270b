//! # Simple Keyring
//!
//! Individually imported private keys.

use crate::domain::errors::KeyringError;
use crate::domain::vault::SimpleKeyringData;
use crate::ports::outbound::CryptoProvider;
use shared_crypto::PrivateKey;
use shared_types::Address;
use std::fmt;

#[derive(Clone, Default)]
pub struct SimpleKeyring {
    accounts: Vec<(Address, PrivateKey)>,
}

impl SimpleKeyring {
    /// Keyring holding one imported key.
    pub fn with_key(
        provider: &dyn CryptoProvider,
        key: PrivateKey,
    ) -> Result<Self, KeyringError> {
        let address = provider.address_of(&key)?;
        Ok(Self {
            accounts: vec![(address, key)],
        })
    }

    pub fn restore(
        provider: &dyn CryptoProvider,
        data: &SimpleKeyringData,
    ) -> Result<Self, KeyringError> {
        let mut accounts = Vec::with_capacity(data.0.len());
        for encoded in &data.0 {
            let key = PrivateKey::from_hex(encoded)?;
            accounts.push((provider.address_of(&key)?, key));
        }
        Ok(Self { accounts })
    }

    pub fn accounts(&self) -> Vec<Address> {
        self.accounts.iter().map(|(address, _)| *address).collect()
    }

    pub fn key_for(&self, address: &Address) -> Option<&PrivateKey> {
        self.accounts
            .iter()
            .find(|(candidate, _)| candidate == address)
            .map(|(_, key)| key)
    }

    pub fn remove_account(&mut self, address: &Address) -> bool {
        let before = self.accounts.len();
        self.accounts.retain(|(candidate, _)| candidate != address);
        self.accounts.len() != before
    }

    pub fn serialize(&self) -> SimpleKeyringData {
        SimpleKeyringData(
            self.accounts
                .iter()
                .map(|(_, key)| key.to_hex().to_string())
                .collect(),
        )
    }
}

impl fmt::Debug for SimpleKeyring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleKeyring")
            .field("accounts", &self.accounts())
            .finish()
    }
}
