//! # ECDSA Signatures (secp256k1)
//!
//! Recoverable secp256k1 signing in the Ethereum `r || s || v` convention.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization (EIP-2), with the recovery id flipped to match
//! - Private key bytes are zeroized on drop and never printed by `Debug`

use crate::hashing::{keccak256, Hash};
use crate::CryptoError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use shared_types::{decode_hex, encode_hex_prefixed, Address};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// secp256k1 private key (32 bytes).
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Create from raw bytes, rejecting zero and out-of-range scalars.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self(bytes))
    }

    /// Parse 64 hex digits, optionally `0x`-prefixed.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let decoded = Zeroizing::new(decode_hex(input).map_err(|_| CryptoError::InvalidPrivateKey)?);
        let bytes: [u8; 32] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidPrivateKey)?;
        Self::from_bytes(bytes)
    }

    /// Generate a random key.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self(signing_key.to_bytes().into())
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0))
    }

    /// Account address of this key.
    pub fn address(&self) -> Result<Address, CryptoError> {
        Ok(address_from_pubkey(self.signing_key()?.verifying_key()))
    }

    /// Compressed SEC1 public key (33 bytes).
    pub fn public_key_compressed(&self) -> Result<[u8; 33], CryptoError> {
        let point = self.signing_key()?.verifying_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        Ok(out)
    }

    /// Sign a 32-byte digest (no further hashing).
    pub fn sign_digest(&self, digest: &Hash) -> Result<RecoverableSignature, CryptoError> {
        let (sig, recid) = self
            .signing_key()?
            .sign_prehash_recoverable(digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        // Normalize S to low value (EIP-2)
        let (sig, recid) = match sig.normalize_s() {
            Some(normalized) => {
                let flipped = RecoveryId::from_byte(recid.to_byte() ^ 1)
                    .ok_or(CryptoError::InvalidRecoveryId(recid.to_byte()))?;
                (normalized, flipped)
            }
            None => (sig, recid),
        };

        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Ok(RecoverableSignature {
            r,
            s,
            v: recid.to_byte() + 27,
        })
    }

    fn signing_key(&self) -> Result<SigningKey, CryptoError> {
        SigningKey::from_bytes((&self.0).into()).map_err(|_| CryptoError::InvalidPrivateKey)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// ECDSA signature with recovery id, `v` in the 27/28 convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverableSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (27 or 28)
    pub v: u8,
}

impl RecoverableSignature {
    /// `r || s || v` (65 bytes).
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Parse `r || s || v`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 65 {
            return Err(CryptoError::InvalidSignature);
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    /// `0x`-prefixed hex of `r || s || v`.
    pub fn to_hex(&self) -> String {
        encode_hex_prefixed(self.to_bytes())
    }

    /// Recovery id as 0 or 1.
    pub fn recovery_id(&self) -> Result<u8, CryptoError> {
        match self.v {
            0 | 27 => Ok(0),
            1 | 28 => Ok(1),
            v => Err(CryptoError::InvalidRecoveryId(v)),
        }
    }
}

/// Derive an address from a public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);
    // Keccak256 of the uncompressed key without the 0x04 prefix
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}

/// Recover the signer's address from a digest and signature.
pub fn recover_address(
    digest: &Hash,
    signature: &RecoverableSignature,
) -> Result<Address, CryptoError> {
    let recovery_id = RecoveryId::try_from(signature.recovery_id()?)
        .map_err(|_| CryptoError::InvalidRecoveryId(signature.v))?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&sig_bytes).map_err(|_| CryptoError::InvalidSignature)?;

    let recovered = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| CryptoError::InvalidSignature)?;

    Ok(address_from_pubkey(&recovered))
}
