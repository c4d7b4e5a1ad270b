//! # Shared Types Crate
//!
//! Value types shared across the KeyVault workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Address` is defined once and used by the
//!   crypto layer, the stores and the keyring controller alike.
//! - **Lowercase on the wire**: addresses serialize as lowercase `0x`-prefixed
//!   hex; EIP-55 checksums are available for display only.

pub mod encoding;
pub mod entities;
pub mod errors;

pub use encoding::{decode_hex, encode_hex_prefixed, strip_hex_prefix};
pub use entities::Address;
pub use errors::TypeError;
