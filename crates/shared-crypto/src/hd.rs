//! BIP-32 hierarchical deterministic key derivation (secp256k1).
//!
//! Accounts are derived as `<base path>/<index>` with a non-hardened final
//! component, the BIP-44 layout used by Ethereum wallets
//! (`m/44'/60'/0'/0/i`).
//!
//! Reference: <https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki>

use crate::ecdsa::PrivateKey;
use crate::CryptoError;
use hmac::{Hmac, Mac};
use k256::elliptic_curve::ff::{Field, PrimeField};
use k256::{FieldBytes, Scalar};
use sha2::Sha512;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// HMAC-SHA512 type alias used throughout BIP-32.
type HmacSha512 = Hmac<Sha512>;

/// The hardened index offset (0x80000000).
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for master key generation.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Default account path for Ethereum HD wallets.
pub const DEFAULT_HD_PATH: &str = "m/44'/60'/0'/0";

/// A parsed BIP-32 path. Hardened components carry the offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// Path extended by one non-hardened index.
    pub fn child(&self, index: u32) -> Self {
        let mut components = self.0.clone();
        components.push(index);
        Self(components)
    }

    /// Raw components.
    pub fn components(&self) -> &[u32] {
        &self.0
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        vec![44 | HARDENED_OFFSET, 60 | HARDENED_OFFSET, HARDENED_OFFSET, 0].into()
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(components: Vec<u32>) -> Self {
        Self(components)
    }
}

impl FromStr for DerivationPath {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(CryptoError::InvalidPath(format!("{s}: must start with m")));
        }

        let mut components = Vec::new();
        for part in parts {
            let (digits, hardened) = match part.strip_suffix('\'').or_else(|| part.strip_suffix('h')) {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            let index: u32 = digits
                .parse()
                .map_err(|_| CryptoError::InvalidPath(format!("{s}: bad component {part}")))?;
            if index >= HARDENED_OFFSET {
                return Err(CryptoError::InvalidPath(format!("{s}: index {index} out of range")));
            }
            components.push(if hardened { index | HARDENED_OFFSET } else { index });
        }
        Ok(Self(components))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for component in &self.0 {
            if component & HARDENED_OFFSET != 0 {
                write!(f, "/{}'", component & !HARDENED_OFFSET)?;
            } else {
                write!(f, "/{component}")?;
            }
        }
        Ok(())
    }
}

/// Private key plus chain code.
struct ExtendedKey {
    key: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
}

impl ExtendedKey {
    fn master(seed: &[u8]) -> Result<Self, CryptoError> {
        let i = hmac_sha512(MASTER_HMAC_KEY, seed)?;
        let extended = Self::split(&i);
        // IL must be a valid non-zero scalar
        PrivateKey::from_bytes(*extended.key).map_err(|_| CryptoError::DerivationFailed(0))?;
        Ok(extended)
    }

    fn derive_child(&self, index: u32) -> Result<Self, CryptoError> {
        let mut data = Zeroizing::new(Vec::with_capacity(37));
        if index & HARDENED_OFFSET != 0 {
            data.push(0u8);
            data.extend_from_slice(&self.key[..]);
        } else {
            let parent = PrivateKey::from_bytes(*self.key)?;
            data.extend_from_slice(&parent.public_key_compressed()?);
        }
        data.extend_from_slice(&index.to_be_bytes());

        let i = hmac_sha512(&self.chain_code[..], &data)?;
        let tweak = to_scalar(&i[..32]).ok_or(CryptoError::DerivationFailed(index))?;
        let parent = to_scalar(&self.key[..]).ok_or(CryptoError::DerivationFailed(index))?;

        let child = tweak + parent;
        if bool::from(child.is_zero()) {
            return Err(CryptoError::DerivationFailed(index));
        }

        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(&i[32..]);
        Ok(Self {
            key: Zeroizing::new(child.to_repr().into()),
            chain_code,
        })
    }

    fn split(i: &[u8; 64]) -> Self {
        let mut key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&i[..32]);
        chain_code.copy_from_slice(&i[32..]);
        Self { key, chain_code }
    }
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<Zeroizing<[u8; 64]>, CryptoError> {
    let mut mac =
        HmacSha512::new_from_slice(key).map_err(|e| CryptoError::InvalidInput(e.to_string()))?;
    mac.update(data);
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn to_scalar(bytes: &[u8]) -> Option<Scalar> {
    Option::from(Scalar::from_repr(FieldBytes::clone_from_slice(bytes)))
}

/// Derive the private key at `path` from a BIP-39 seed.
pub fn derive_private_key(seed: &[u8], path: &DerivationPath) -> Result<PrivateKey, CryptoError> {
    let mut current = ExtendedKey::master(seed)?;
    for &index in path.components() {
        current = current.derive_child(index)?;
    }
    PrivateKey::from_bytes(*current.key)
}

/// Derive account `index` under `base_path` (`<base_path>/<index>`).
pub fn derive_account_key(
    seed: &[u8],
    base_path: &DerivationPath,
    index: u32,
) -> Result<PrivateKey, CryptoError> {
    if index >= HARDENED_OFFSET {
        return Err(CryptoError::InvalidPath(format!("account index {index} out of range")));
    }
    derive_private_key(seed, &base_path.child(index))
}
