//! # Controller Configuration

use crate::ports::outbound::CryptoProvider;
use shared_crypto::{Cipher, DerivationPath, DEFAULT_KDF_ITERATIONS};
use std::fmt;
use std::sync::Arc;

/// Construction options of a [`crate::KeyringController`].
#[derive(Clone)]
pub struct KeyringConfig {
    /// Crypto backend. `None` selects [`crate::DefaultCryptoProvider`].
    pub encryptor: Option<Arc<dyn CryptoProvider>>,

    /// Vault blob persisted by a previous session.
    pub initial_vault: Option<String>,

    /// Base path of HD keyrings created by this controller.
    pub hd_path: DerivationPath,

    /// PBKDF2 iterations of the default provider.
    pub kdf_iterations: u32,

    /// Vault cipher of the default provider.
    pub cipher: Cipher,
}

impl Default for KeyringConfig {
    fn default() -> Self {
        Self {
            encryptor: None,
            initial_vault: None,
            hd_path: DerivationPath::default(),
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            cipher: Cipher::default(),
        }
    }
}

impl KeyringConfig {
    pub fn with_encryptor(mut self, encryptor: Arc<dyn CryptoProvider>) -> Self {
        self.encryptor = Some(encryptor);
        self
    }

    pub fn with_vault(mut self, vault: impl Into<String>) -> Self {
        self.initial_vault = Some(vault.into());
        self
    }
}

impl fmt::Debug for KeyringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyringConfig")
            .field("custom_encryptor", &self.encryptor.is_some())
            .field("has_vault", &self.initial_vault.is_some())
            .field("hd_path", &self.hd_path.to_string())
            .field("kdf_iterations", &self.kdf_iterations)
            .field("cipher", &self.cipher)
            .finish()
    }
}
