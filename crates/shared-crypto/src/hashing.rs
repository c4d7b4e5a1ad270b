//! # Hashing
//!
//! Keccak-256 and the EIP-191 personal message digest.

use sha3::{Digest, Keccak256};

/// A 32-byte digest.
pub type Hash = [u8; 32];

/// Compute Keccak256 hash.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Keccak256 over several slices without concatenating them first.
pub fn keccak256_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// EIP-191 version `0x45` digest:
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`.
pub fn personal_message_hash(message: &[u8]) -> Hash {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    keccak256_concat(&[prefix.as_bytes(), message])
}
