//! # BIP-39 Mnemonics
//!
//! Generation, normalization and seed derivation for the English wordlist.
//! Phrases and seeds are returned in zeroizing wrappers.

use crate::CryptoError;
use bip39::Mnemonic;
use zeroize::Zeroizing;

/// Entropy for a 12-word phrase.
pub const DEFAULT_ENTROPY_BYTES: usize = 16;

/// Generate a fresh 12-word mnemonic from OS randomness.
pub fn generate_mnemonic() -> Result<Zeroizing<String>, CryptoError> {
    let mut entropy = Zeroizing::new([0u8; DEFAULT_ENTROPY_BYTES]);
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut entropy[..]);
    let mnemonic = Mnemonic::from_entropy(&entropy[..])
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Lowercase the phrase and collapse runs of whitespace.
pub fn normalize_phrase(phrase: &str) -> Zeroizing<String> {
    Zeroizing::new(
        phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Check a phrase against the wordlist and its checksum.
pub fn validate_mnemonic(phrase: &str) -> Result<(), CryptoError> {
    let normalized = normalize_phrase(phrase);
    Mnemonic::parse_normalized(&normalized)
        .map(|_| ())
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))
}

/// PBKDF2-HMAC-SHA512 seed (empty passphrase).
pub fn mnemonic_to_seed(phrase: &str) -> Result<Zeroizing<[u8; 64]>, CryptoError> {
    let normalized = normalize_phrase(phrase);
    let mnemonic = Mnemonic::parse_normalized(&normalized)
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed_normalized("")))
}
