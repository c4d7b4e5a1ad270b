//! # HD Keyring
//!
//! Accounts derived from one mnemonic along `<hd_path>/<index>`.

use crate::domain::errors::KeyringError;
use crate::domain::vault::HdKeyringData;
use crate::ports::outbound::CryptoProvider;
use shared_crypto::{DerivationPath, PrivateKey};
use shared_types::Address;
use std::fmt;
use zeroize::Zeroizing;

#[derive(Clone)]
struct HdAccount {
    index: u32,
    address: Address,
    key: PrivateKey,
}

/// Mnemonic-backed keyring.
///
/// Removing an account never frees its index: `next_index` only grows, so a
/// removed account is not silently re-derived by the next `add_account`.
#[derive(Clone)]
pub struct HdKeyring {
    mnemonic: Zeroizing<String>,
    seed: Zeroizing<Vec<u8>>,
    hd_path: DerivationPath,
    accounts: Vec<HdAccount>,
    next_index: u32,
}

impl HdKeyring {
    /// Keyring with no accounts yet.
    pub fn from_mnemonic(
        provider: &dyn CryptoProvider,
        mnemonic: Zeroizing<String>,
        hd_path: DerivationPath,
    ) -> Result<Self, KeyringError> {
        let seed = provider.mnemonic_to_seed(&mnemonic)?;
        Ok(Self {
            mnemonic,
            seed,
            hd_path,
            accounts: Vec::new(),
            next_index: 0,
        })
    }

    /// Rebuild from vault data, re-deriving every recorded account.
    pub fn restore(
        provider: &dyn CryptoProvider,
        data: &HdKeyringData,
    ) -> Result<Self, KeyringError> {
        let hd_path: DerivationPath = data.hd_path.parse()?;
        let mut keyring =
            Self::from_mnemonic(provider, Zeroizing::new(data.mnemonic.clone()), hd_path)?;
        for &index in &data.account_indices {
            keyring.derive(provider, index)?;
        }
        let highest = data.account_indices.iter().max().map_or(0, |i| i.saturating_add(1));
        keyring.next_index = data.next_index.max(highest);
        Ok(keyring)
    }

    /// Derive the next account. Returns its address.
    pub fn add_account(&mut self, provider: &dyn CryptoProvider) -> Result<Address, KeyringError> {
        self.add_account_skipping(provider, |_| false)
    }

    /// Derive the next account whose address `owned` does not claim.
    ///
    /// Indices whose address is owned elsewhere are consumed, not retried.
    pub fn add_account_skipping<F>(
        &mut self,
        provider: &dyn CryptoProvider,
        owned: F,
    ) -> Result<Address, KeyringError>
    where
        F: Fn(&Address) -> bool,
    {
        loop {
            let index = self.next_index;
            let key = provider.derive_account(&self.seed, &self.hd_path, index)?;
            let address = provider.address_of(&key)?;
            self.next_index = index
                .checked_add(1)
                .ok_or_else(|| KeyringError::State("HD keyring index space exhausted".into()))?;
            if owned(&address) {
                continue;
            }
            self.accounts.push(HdAccount {
                index,
                address,
                key,
            });
            return Ok(address);
        }
    }

    fn derive(&mut self, provider: &dyn CryptoProvider, index: u32) -> Result<Address, KeyringError> {
        let key = provider.derive_account(&self.seed, &self.hd_path, index)?;
        let address = provider.address_of(&key)?;
        self.accounts.push(HdAccount {
            index,
            address,
            key,
        });
        Ok(address)
    }

    pub fn accounts(&self) -> Vec<Address> {
        self.accounts.iter().map(|account| account.address).collect()
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn hd_path(&self) -> &DerivationPath {
        &self.hd_path
    }

    pub fn key_for(&self, address: &Address) -> Option<&PrivateKey> {
        self.accounts
            .iter()
            .find(|account| account.address == *address)
            .map(|account| &account.key)
    }

    /// Drop `address`; false if it is not in this keyring.
    pub fn remove_account(&mut self, address: &Address) -> bool {
        let before = self.accounts.len();
        self.accounts.retain(|account| account.address != *address);
        self.accounts.len() != before
    }

    pub fn serialize(&self) -> HdKeyringData {
        HdKeyringData {
            mnemonic: self.mnemonic.to_string(),
            hd_path: self.hd_path.to_string(),
            account_indices: self.accounts.iter().map(|account| account.index).collect(),
            next_index: self.next_index,
        }
    }
}

impl fmt::Debug for HdKeyring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdKeyring")
            .field("hd_path", &self.hd_path.to_string())
            .field("accounts", &self.accounts())
            .field("next_index", &self.next_index)
            .finish_non_exhaustive()
    }
}
