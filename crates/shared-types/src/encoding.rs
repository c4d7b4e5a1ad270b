//! # Hex Encoding Helpers
//!
//! The controller API accepts hex with or without a `0x` prefix and always
//! emits the prefixed lowercase form.

use crate::errors::TypeError;

/// Strip a leading `0x` / `0X` if present.
pub fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decode optionally-prefixed hex into bytes.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, TypeError> {
    hex::decode(strip_hex_prefix(input)).map_err(|e| TypeError::InvalidHex(e.to_string()))
}

/// Encode bytes as lowercase `0x`-prefixed hex.
pub fn encode_hex_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}
