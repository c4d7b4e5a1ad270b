//! # Domain Layer
//!
//! Keyring strategies, vault plaintext and public state. No I/O; all
//! cryptography goes through the outbound `CryptoProvider` port.

pub mod entities;
pub mod errors;
pub mod hd_keyring;
pub mod keyring;
pub mod session;
pub mod simple_keyring;
pub mod vault;
