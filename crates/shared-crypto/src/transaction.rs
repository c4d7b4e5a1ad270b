//! # Transaction Signing
//!
//! Signing payloads for legacy (optionally EIP-155 replay-protected) and
//! EIP-1559 dynamic-fee transactions.
//!
//! - Legacy: `keccak(rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0]))`,
//!   `v = recid + 35 + 2 * chainId` (or `recid + 27` without a chain id)
//! - EIP-1559: `keccak(0x02 || rlp([chainId, nonce, maxPriorityFeePerGas,
//!   maxFeePerGas, gas, to, value, data, accessList]))`, `v = y_parity`

use crate::ecdsa::{PrivateKey, RecoverableSignature};
use crate::hashing::{keccak256, Hash};
use crate::CryptoError;
use primitive_types::{H160, H256, U256};
use rlp::RlpStream;
use shared_types::{encode_hex_prefixed, Address};

/// EIP-2718 type byte of dynamic-fee transactions.
const EIP1559_TX_TYPE: u8 = 0x02;

/// Pre-1559 transaction.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    /// EIP-155 chain id; `None` signs without replay protection.
    pub chain_id: Option<u64>,
}

/// Access list entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessListItem {
    pub address: Address,
    pub storage_keys: Vec<[u8; 32]>,
}

/// EIP-1559 transaction.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Eip1559Transaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
    pub gas_limit: u64,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub access_list: Vec<AccessListItem>,
}

/// Unsigned transaction handed to the signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionRequest {
    Legacy(LegacyTransaction),
    Eip1559(Eip1559Transaction),
}

/// Signed transaction ready for broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Serialized transaction (typed envelope for EIP-1559).
    pub raw: Vec<u8>,
    /// `keccak(raw)`.
    pub hash: Hash,
    pub v: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl SignedTransaction {
    /// `0x`-prefixed hex of the raw transaction.
    pub fn raw_hex(&self) -> String {
        encode_hex_prefixed(&self.raw)
    }
}

impl TransactionRequest {
    /// Digest the sender signs.
    pub fn signing_hash(&self) -> Hash {
        match self {
            Self::Legacy(tx) => {
                let mut stream = RlpStream::new_list(if tx.chain_id.is_some() { 9 } else { 6 });
                append_legacy_fields(&mut stream, tx);
                if let Some(chain_id) = tx.chain_id {
                    stream.append(&chain_id);
                    stream.append(&0u8);
                    stream.append(&0u8);
                }
                keccak256(stream.as_raw())
            }
            Self::Eip1559(tx) => {
                let mut stream = RlpStream::new_list(9);
                append_eip1559_fields(&mut stream, tx);
                let mut payload = vec![EIP1559_TX_TYPE];
                payload.extend_from_slice(stream.as_raw());
                keccak256(&payload)
            }
        }
    }

    /// Attach a signature over [`Self::signing_hash`].
    pub fn encode_signed(
        &self,
        signature: &RecoverableSignature,
    ) -> Result<SignedTransaction, CryptoError> {
        let recovery_id = u64::from(signature.recovery_id()?);
        let r = U256::from_big_endian(&signature.r);
        let s = U256::from_big_endian(&signature.s);

        let (raw, v) = match self {
            Self::Legacy(tx) => {
                let v = match tx.chain_id {
                    Some(chain_id) => recovery_id + 35 + 2 * chain_id,
                    None => recovery_id + 27,
                };
                let mut stream = RlpStream::new_list(9);
                append_legacy_fields(&mut stream, tx);
                stream.append(&v);
                stream.append(&r);
                stream.append(&s);
                (stream.as_raw().to_vec(), v)
            }
            Self::Eip1559(tx) => {
                let mut stream = RlpStream::new_list(12);
                append_eip1559_fields(&mut stream, tx);
                stream.append(&recovery_id);
                stream.append(&r);
                stream.append(&s);
                let mut raw = vec![EIP1559_TX_TYPE];
                raw.extend_from_slice(stream.as_raw());
                (raw, recovery_id)
            }
        };

        Ok(SignedTransaction {
            hash: keccak256(&raw),
            raw,
            v,
            r: signature.r,
            s: signature.s,
        })
    }
}

fn append_to(stream: &mut RlpStream, to: &Option<Address>) {
    match to {
        Some(address) => {
            stream.append(&H160(address.0));
        }
        None => {
            stream.append_empty_data();
        }
    }
}

fn append_legacy_fields(stream: &mut RlpStream, tx: &LegacyTransaction) {
    stream.append(&tx.nonce);
    stream.append(&tx.gas_price);
    stream.append(&tx.gas_limit);
    append_to(stream, &tx.to);
    stream.append(&tx.value);
    stream.append(&tx.data);
}

fn append_eip1559_fields(stream: &mut RlpStream, tx: &Eip1559Transaction) {
    stream.append(&tx.chain_id);
    stream.append(&tx.nonce);
    stream.append(&tx.max_priority_fee_per_gas);
    stream.append(&tx.max_fee_per_gas);
    stream.append(&tx.gas_limit);
    append_to(stream, &tx.to);
    stream.append(&tx.value);
    stream.append(&tx.data);
    stream.begin_list(tx.access_list.len());
    for item in &tx.access_list {
        stream.begin_list(2);
        stream.append(&H160(item.address.0));
        stream.begin_list(item.storage_keys.len());
        for key in &item.storage_keys {
            stream.append(&H256(*key));
        }
    }
}

/// Sign `tx` with `key`.
pub fn sign_transaction(
    key: &PrivateKey,
    tx: &TransactionRequest,
) -> Result<SignedTransaction, CryptoError> {
    let signature = key.sign_digest(&tx.signing_hash())?;
    tx.encode_signed(&signature)
}
