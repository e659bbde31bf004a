//! Ethereum hex address primitives.
//!
//! The canonical, system-wide comparison form is the lower-case
//! `0x`-prefixed hex rendering produced by [`encode_lower`]. EIP-55
//! mixed-case rendering is provided for display only.

use haqqcore_crypto::hash::keccak256;
use haqqcore_types::{HaqqCoreError, Result};

/// Byte length of an Ethereum address.
pub const ADDRESS_LEN: usize = 20;

/// Decodes a `0x`-prefixed hex address into its 20 raw bytes.
///
/// Uniformly lower- or upper-case input is accepted as-is; mixed-case
/// input must carry a valid EIP-55 checksum.
///
/// # Errors
///
/// Returns [`HaqqCoreError::InvalidAddress`] if the prefix is missing,
/// the length is wrong, a character is not hex, or a mixed-case input
/// fails its EIP-55 checksum.
pub fn decode(address: &str) -> Result<[u8; ADDRESS_LEN]> {
    let body = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| HaqqCoreError::InvalidAddress {
            reason: "missing 0x prefix".into(),
        })?;

    if body.len() != ADDRESS_LEN * 2 {
        return Err(HaqqCoreError::InvalidAddress {
            reason: format!("expected 40 hex characters, got {}", body.len()),
        });
    }

    let mut bytes = [0u8; ADDRESS_LEN];
    hex::decode_to_slice(body, &mut bytes).map_err(|_| HaqqCoreError::InvalidAddress {
        reason: "invalid hex encoding".into(),
    })?;

    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower && to_eip55(&bytes) != format!("0x{body}") {
        return Err(HaqqCoreError::InvalidAddress {
            reason: "EIP-55 checksum mismatch".into(),
        });
    }

    Ok(bytes)
}

/// Encodes 20 address bytes in the canonical lower-case hex form.
pub fn encode_lower(bytes: &[u8; ADDRESS_LEN]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Encodes 20 address bytes with the EIP-55 mixed-case checksum.
///
/// A hex digit is upper-cased when the corresponding nibble of
/// `keccak256(lower_hex_ascii)` is ≥ 8.
pub fn to_eip55(bytes: &[u8; ADDRESS_LEN]) -> String {
    let lower = hex::encode(bytes);
    let digest = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(2 + ADDRESS_LEN * 2);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            digest[i / 2] >> 4
        } else {
            digest[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Whether `address` decodes as an Ethereum hex address.
pub fn is_hex_address(address: &str) -> bool {
    decode(address).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
