//! # Keyring Controller (KV-01)
//!
//! Custody of an encrypted vault of keyrings: HD trees derived from a
//! mnemonic and imported single keys.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Keyrings, vault encoding, session, errors
//! - **Ports Layer** (`ports/`): `KeyringApi` (inbound) and `CryptoProvider` (outbound)
//! - **Adapters** (`adapters/`): `DefaultCryptoProvider` backed by `shared-crypto`
//! - **Service Layer** (`service.rs`): `KeyringController`
//!
//! ## Security Notes
//!
//! - **Secrets at rest**: The vault is only ever stored encrypted
//! - **Secrets in memory**: Password, mnemonics, seeds and keys are zeroized on lock
//! - **Atomic mutations**: A failed persist leaves keyrings and vault untouched

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::default_provider::DefaultCryptoProvider;
pub use config::KeyringConfig;
pub use domain::entities::{
    ImportStrategy, KeyringSnapshot, KeyringType, MessageParams, PublicState, TypedDataVersion,
    TypedMessageParams, VaultState,
};
pub use domain::errors::{ErrorKind, KeyringError, TYPED_MESSAGE_PREFIX};
pub use ports::inbound::KeyringApi;
pub use ports::outbound::CryptoProvider;
pub use service::{KeyringController, CONTROLLER_NAME};
