//! # Integration Flows
//!
//! Shared fixtures for the cross-crate tests.

pub mod concurrency;
pub mod flows;
pub mod persistence;
pub mod signing;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod fixtures {
    use kv_01_keyring_controller::{KeyringApi, KeyringConfig, KeyringController};
    use shared_types::Address;
    use std::sync::Arc;

    /// Password used by every fixture vault.
    pub const PASSWORD: &str = "correct horse battery staple";

    /// BIP-39 reference mnemonic.
    pub const ABANDON: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    /// First BIP-44 account of [`ABANDON`].
    pub const ABANDON_FIRST: &str = "0x9858effd232b4033e47d90003d41ec34ecaeda94";

    /// `keccak256("cow")`, the key behind the EIP-712 reference signer.
    pub const COW_KEY: &str = "c85ef7d79691fe79573b1a7064c19c1a9819ebdbd1faaab1a8ec92344438aaf4";
    pub const COW_ADDRESS: &str = "0xcd2a3d9f938e13cd947ec05abc7fe734df8dd826";

    /// Controller config with a light KDF so tests stay fast.
    pub fn fast_config() -> KeyringConfig {
        KeyringConfig {
            kdf_iterations: 1_000,
            ..Default::default()
        }
    }

    /// Controller unlocked on a vault restored from [`ABANDON`].
    pub async fn restored_controller() -> Arc<KeyringController> {
        let controller = Arc::new(KeyringController::new(fast_config()));
        controller
            .create_new_vault_and_restore(PASSWORD, ABANDON)
            .await
            .unwrap();
        controller
    }

    pub fn address(s: &str) -> Address {
        s.parse().unwrap()
    }
}
