//! # Unlocked Session
//!
//! The cached password and live keyrings. Exists only while unlocked;
//! dropping it zeroizes every secret it owns.

use crate::domain::entities::{PublicState, KeyringType};
use crate::domain::keyring::Keyring;
use std::fmt;
use zeroize::Zeroizing;

pub struct Session {
    password: Zeroizing<String>,
    keyrings: Vec<Keyring>,
}

impl Session {
    pub fn new(password: Zeroizing<String>, keyrings: Vec<Keyring>) -> Self {
        Self { password, keyrings }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn keyrings(&self) -> &[Keyring] {
        &self.keyrings
    }

    /// Working copy for a mutating operation.
    pub fn stage(&self) -> Vec<Keyring> {
        self.keyrings.clone()
    }

    /// Replace the live keyrings with a persisted staged copy.
    pub fn commit(&mut self, staged: Vec<Keyring>) {
        self.keyrings = staged;
    }

    pub fn public_state(&self) -> PublicState {
        PublicState {
            is_unlocked: !self.keyrings.is_empty(),
            keyring_types: KeyringType::ALL.to_vec(),
            keyrings: self.keyrings.iter().map(Keyring::snapshot).collect(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("keyrings", &self.keyrings)
            .finish_non_exhaustive()
    }
}
