//! # Typed Data Hashing
//!
//! - **V1**: legacy array of `{type, name, value}` entries, hashed as
//!   `keccak(keccak(packed schema) || keccak(packed values))`.
//! - **V3 / V4**: EIP-712 structured data. V4 adds arrays and encodes a
//!   missing struct value as 32 zero bytes.
//!
//! Reference: <https://eips.ethereum.org/EIPS/eip-712>

use crate::hashing::{keccak256, keccak256_concat, Hash};
use crate::CryptoError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{decode_hex, Address};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the domain type.
pub const EIP712_DOMAIN: &str = "EIP712Domain";

/// EIP-712 encoding rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eip712Version {
    V3,
    V4,
}

/// One entry of a V1 typed message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypedDataV1Entry {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub value: Value,
}

/// A member of a struct type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDataField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Struct type definitions keyed by type name.
pub type Types = BTreeMap<String, Vec<TypedDataField>>;

/// An EIP-712 message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub types: Types,
    pub primary_type: String,
    pub domain: serde_json::Map<String, Value>,
    pub message: serde_json::Map<String, Value>,
}

impl TypedData {
    /// Parse from a JSON value, or from a JSON string holding the document.
    pub fn from_value(value: &Value) -> Result<Self, CryptoError> {
        let parsed: Self = match value {
            Value::String(json) => serde_json::from_str(json),
            other => serde_json::from_value(other.clone()),
        }
        .map_err(|e| CryptoError::InvalidTypedData(format!("Invalid typed data: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> Result<(), CryptoError> {
        if self.primary_type != EIP712_DOMAIN && !self.types.contains_key(&self.primary_type) {
            return Err(CryptoError::InvalidTypedData(format!(
                "No type definition specified: {}",
                self.primary_type
            )));
        }
        Ok(())
    }

    /// Types with an empty `EIP712Domain` added when absent.
    fn sanitized_types(&self) -> Types {
        let mut types = self.types.clone();
        types.entry(EIP712_DOMAIN.to_string()).or_default();
        types
    }

    /// `hashStruct(domain)`.
    pub fn domain_separator(&self, version: Eip712Version) -> Result<Hash, CryptoError> {
        let domain = Value::Object(self.domain.clone());
        hash_struct(EIP712_DOMAIN, &domain, &self.sanitized_types(), version)
    }

    /// `hashStruct(message)` for the primary type.
    pub fn message_hash(&self, version: Eip712Version) -> Result<Hash, CryptoError> {
        let message = Value::Object(self.message.clone());
        hash_struct(&self.primary_type, &message, &self.sanitized_types(), version)
    }
}

/// Final EIP-712 digest: `keccak(0x19 0x01 || domainSeparator || hashStruct(message))`.
///
/// The message hash is omitted when the primary type is the domain itself.
pub fn hash_typed_data(data: &TypedData, version: Eip712Version) -> Result<Hash, CryptoError> {
    let domain_separator = data.domain_separator(version)?;
    if data.primary_type == EIP712_DOMAIN {
        return Ok(keccak256_concat(&[&[0x19, 0x01], &domain_separator]));
    }
    let message_hash = data.message_hash(version)?;
    Ok(keccak256_concat(&[&[0x19, 0x01], &domain_separator, &message_hash]))
}

/// `encodeType`: the primary type followed by its dependencies in name order.
pub fn encode_type(primary_type: &str, types: &Types) -> Result<String, CryptoError> {
    let mut deps = BTreeSet::new();
    find_dependencies(primary_type, types, &mut deps);
    deps.remove(primary_type);

    let mut encoded = String::new();
    for name in std::iter::once(primary_type).chain(deps.iter().map(String::as_str)) {
        let fields = types.get(name).ok_or_else(|| {
            CryptoError::InvalidTypedData(format!("No type definition specified: {name}"))
        })?;
        let members: Vec<String> = fields
            .iter()
            .map(|field| format!("{} {}", field.kind, field.name))
            .collect();
        encoded.push_str(&format!("{name}({})", members.join(",")));
    }
    Ok(encoded)
}

/// `keccak(encodeType(type))`.
pub fn type_hash(primary_type: &str, types: &Types) -> Result<Hash, CryptoError> {
    Ok(keccak256(encode_type(primary_type, types)?.as_bytes()))
}

/// `keccak(typeHash || encodeData(data))`.
pub fn hash_struct(
    primary_type: &str,
    data: &Value,
    types: &Types,
    version: Eip712Version,
) -> Result<Hash, CryptoError> {
    Ok(keccak256(&encode_data(primary_type, data, types, version)?))
}

fn find_dependencies(kind: &str, types: &Types, found: &mut BTreeSet<String>) {
    let base = strip_array(kind);
    if found.contains(base) {
        return;
    }
    let Some(fields) = types.get(base) else {
        return;
    };
    found.insert(base.to_string());
    for field in fields {
        find_dependencies(&field.kind, types, found);
    }
}

fn strip_array(kind: &str) -> &str {
    kind.find('[').map_or(kind, |idx| &kind[..idx])
}

fn encode_data(
    primary_type: &str,
    data: &Value,
    types: &Types,
    version: Eip712Version,
) -> Result<Vec<u8>, CryptoError> {
    let fields = types.get(primary_type).ok_or_else(|| {
        CryptoError::InvalidTypedData(format!("No type definition specified: {primary_type}"))
    })?;
    let object = data.as_object().ok_or_else(|| {
        CryptoError::InvalidTypedData(format!("Expected object for type {primary_type}"))
    })?;

    let mut encoded = Vec::with_capacity(32 * (fields.len() + 1));
    encoded.extend_from_slice(&type_hash(primary_type, types)?);
    for field in fields {
        let value = object.get(&field.name).filter(|v| !v.is_null());
        encoded.extend_from_slice(&encode_field(types, &field.name, &field.kind, value, version)?);
    }
    Ok(encoded)
}

fn encode_field(
    types: &Types,
    name: &str,
    kind: &str,
    value: Option<&Value>,
    version: Eip712Version,
) -> Result<[u8; 32], CryptoError> {
    if types.contains_key(kind) {
        return match (value, version) {
            (None, Eip712Version::V4) => Ok([0u8; 32]),
            (None, Eip712Version::V3) => Err(missing_value(name, kind)),
            (Some(value), _) => hash_struct(kind, value, types, version),
        };
    }

    let value = value.ok_or_else(|| missing_value(name, kind))?;

    if let Some(element) = kind.strip_suffix(']').and_then(|k| k.rfind('[').map(|i| &k[..i])) {
        if version == Eip712Version::V3 {
            return Err(CryptoError::InvalidTypedData(
                "Arrays are unimplemented in encodeData; use V4 extension".into(),
            ));
        }
        let items = value.as_array().ok_or_else(|| {
            CryptoError::InvalidTypedData(format!("Expected array for field {name} of type {kind}"))
        })?;
        let mut encoded = Vec::with_capacity(32 * items.len());
        for item in items {
            let item = (!item.is_null()).then_some(item);
            encoded.extend_from_slice(&encode_field(types, name, element, item, version)?);
        }
        return Ok(keccak256(&encoded));
    }

    match kind {
        "string" => Ok(keccak256(value_as_str(name, value)?.as_bytes())),
        "bytes" => Ok(keccak256(&value_as_bytes(name, value)?)),
        _ => {
            let atomic = AtomicType::parse(kind)?;
            atomic.encode_word(name, value)
        }
    }
}

fn missing_value(name: &str, kind: &str) -> CryptoError {
    CryptoError::InvalidTypedData(format!("missing value for field {name} of type {kind}"))
}

/// Legacy V1 typed message hash.
pub fn hash_typed_data_v1(entries: &[TypedDataV1Entry]) -> Result<Hash, CryptoError> {
    if entries.is_empty() {
        return Err(CryptoError::InvalidTypedData(
            "Expect argument to be non-empty array".into(),
        ));
    }

    let mut schema = Vec::new();
    let mut values = Vec::new();
    for entry in entries {
        schema.extend_from_slice(format!("{} {}", entry.kind, entry.name).as_bytes());
        match entry.kind.as_str() {
            "string" => values.extend_from_slice(value_as_str(&entry.name, &entry.value)?.as_bytes()),
            "bytes" => values.extend_from_slice(&value_as_bytes(&entry.name, &entry.value)?),
            kind => {
                let atomic = AtomicType::parse(kind)?;
                values.extend_from_slice(&atomic.encode_packed(&entry.name, &entry.value)?);
            }
        }
    }
    Ok(keccak256_concat(&[&keccak256(&schema), &keccak256(&values)]))
}

/// Fixed-size Solidity types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AtomicType {
    Address,
    Bool,
    FixedBytes(usize),
    Uint(usize),
    Int(usize),
}

impl AtomicType {
    fn parse(kind: &str) -> Result<Self, CryptoError> {
        let unsupported = || CryptoError::InvalidTypedData(format!("Unsupported or invalid type: {kind}"));
        let bits = |digits: &str| -> Result<usize, CryptoError> {
            if digits.is_empty() {
                return Ok(256);
            }
            match digits.parse::<usize>() {
                Ok(bits) if bits > 0 && bits <= 256 && bits % 8 == 0 => Ok(bits),
                _ => Err(unsupported()),
            }
        };

        match kind {
            "address" => Ok(Self::Address),
            "bool" => Ok(Self::Bool),
            _ => {
                if let Some(size) = kind.strip_prefix("bytes") {
                    match size.parse::<usize>() {
                        Ok(size) if (1..=32).contains(&size) => Ok(Self::FixedBytes(size)),
                        _ => Err(unsupported()),
                    }
                } else if let Some(digits) = kind.strip_prefix("uint") {
                    Ok(Self::Uint(bits(digits)?))
                } else if let Some(digits) = kind.strip_prefix("int") {
                    Ok(Self::Int(bits(digits)?))
                } else {
                    Err(unsupported())
                }
            }
        }
    }

    /// ABI encoding as one 32-byte word.
    fn encode_word(self, name: &str, value: &Value) -> Result<[u8; 32], CryptoError> {
        let mut word = [0u8; 32];
        match self {
            Self::Address => word[12..].copy_from_slice(value_as_address(name, value)?.as_bytes()),
            Self::Bool => word[31] = u8::from(value_as_bool(name, value)?),
            Self::FixedBytes(size) => {
                let bytes = value_as_fixed_bytes(name, value, size)?;
                word[..bytes.len()].copy_from_slice(&bytes);
            }
            Self::Uint(bits) | Self::Int(bits) => {
                let number = self.integer(name, value, bits)?;
                number.to_big_endian(&mut word);
            }
        }
        Ok(word)
    }

    /// Solidity packed encoding (natural width, no padding).
    fn encode_packed(self, name: &str, value: &Value) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Address => Ok(value_as_address(name, value)?.as_bytes().to_vec()),
            Self::Bool => Ok(vec![u8::from(value_as_bool(name, value)?)]),
            Self::FixedBytes(size) => {
                let mut bytes = value_as_fixed_bytes(name, value, size)?;
                bytes.resize(size, 0);
                Ok(bytes)
            }
            Self::Uint(bits) | Self::Int(bits) => {
                let mut word = [0u8; 32];
                self.integer(name, value, bits)?.to_big_endian(&mut word);
                Ok(word[32 - bits / 8..].to_vec())
            }
        }
    }

    /// Parsed integer in 256-bit two's complement.
    fn integer(self, name: &str, value: &Value, bits: usize) -> Result<U256, CryptoError> {
        let (magnitude, negative) = value_as_integer(name, value)?;
        let out_of_range =
            || CryptoError::InvalidTypedData(format!("Value for field {name} out of range"));
        match self {
            Self::Uint(_) => {
                if negative || magnitude.bits() > bits {
                    return Err(out_of_range());
                }
                Ok(magnitude)
            }
            _ => {
                // |min| of intN is 2^(bits-1), max is 2^(bits-1) - 1
                let limit = U256::one() << (bits - 1);
                if magnitude > limit || (!negative && magnitude == limit) {
                    return Err(out_of_range());
                }
                if negative {
                    Ok((!magnitude).overflowing_add(U256::one()).0)
                } else {
                    Ok(magnitude)
                }
            }
        }
    }
}

fn invalid_value(name: &str, expected: &str) -> CryptoError {
    CryptoError::InvalidTypedData(format!("Invalid value for field {name}: expected {expected}"))
}

fn value_as_str<'a>(name: &str, value: &'a Value) -> Result<&'a str, CryptoError> {
    value.as_str().ok_or_else(|| invalid_value(name, "string"))
}

fn value_as_bytes(name: &str, value: &Value) -> Result<Vec<u8>, CryptoError> {
    match value {
        Value::String(s) if s.starts_with("0x") => {
            decode_hex(s).map_err(|_| invalid_value(name, "hex bytes"))
        }
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| invalid_value(name, "byte array"))
            })
            .collect(),
        _ => Err(invalid_value(name, "bytes")),
    }
}

fn value_as_fixed_bytes(name: &str, value: &Value, size: usize) -> Result<Vec<u8>, CryptoError> {
    let bytes = value_as_bytes(name, value)?;
    if bytes.len() > size {
        return Err(invalid_value(name, &format!("at most {size} bytes")));
    }
    Ok(bytes)
}

fn value_as_address(name: &str, value: &Value) -> Result<Address, CryptoError> {
    value_as_str(name, value)?
        .parse()
        .map_err(|_| invalid_value(name, "address"))
}

fn value_as_bool(name: &str, value: &Value) -> Result<bool, CryptoError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_u64() == Some(0) => Ok(false),
        Value::Number(n) if n.as_u64() == Some(1) => Ok(true),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        _ => Err(invalid_value(name, "bool")),
    }
}

/// Magnitude and sign of a JSON number or decimal/hex string.
fn value_as_integer(name: &str, value: &Value) -> Result<(U256, bool), CryptoError> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok((U256::from(u), false))
            } else if let Some(i) = n.as_i64() {
                Ok((U256::from(i.unsigned_abs()), i < 0))
            } else {
                Err(invalid_value(name, "integer"))
            }
        }
        Value::String(s) => {
            let s = s.trim();
            let (digits, negative) = match s.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (s, false),
            };
            let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
                Some(hex) => U256::from_str_radix(hex, 16).ok(),
                None => U256::from_dec_str(digits).ok(),
            }
            .ok_or_else(|| invalid_value(name, "integer"))?;
            Ok((magnitude, negative && !magnitude.is_zero()))
        }
        _ => Err(invalid_value(name, "integer")),
    }
}
