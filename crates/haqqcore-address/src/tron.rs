//! Tron base58check address primitives.
//!
//! A Tron address is the same 20-byte key-hash body as an Ethereum
//! address, prefixed with the `0x41` network byte and rendered as
//! base58check:
//!
//! ```text
//! payload  = 0x41 ‖ body(20)
//! checksum = SHA-256(SHA-256(payload))[0..4]
//! address  = base58(payload ‖ checksum)        // always starts with 'T'
//! ```

use haqqcore_crypto::hash::sha256d;
use haqqcore_types::{HaqqCoreError, Result};

/// Tron mainnet address prefix byte.
pub const TRON_PREFIX: u8 = 0x41;

/// Length of the base58check checksum suffix.
const CHECKSUM_LEN: usize = 4;

/// Decoded payload length: prefix + 20-byte body.
const PAYLOAD_LEN: usize = 21;

/// Decodes a Tron base58check address into its 20-byte body.
///
/// # Errors
///
/// Returns [`HaqqCoreError::InvalidAddress`] if the input is not
/// base58, has the wrong length, the wrong network prefix, or a
/// checksum mismatch.
pub fn decode(address: &str) -> Result<[u8; 20]> {
    let raw = bs58::decode(address)
        .into_vec()
        .map_err(|e| HaqqCoreError::InvalidAddress {
            reason: format!("invalid base58: {e}"),
        })?;

    if raw.len() != PAYLOAD_LEN + CHECKSUM_LEN {
        return Err(HaqqCoreError::InvalidAddress {
            reason: format!("expected 25 decoded bytes, got {}", raw.len()),
        });
    }

    let (payload, checksum) = raw.split_at(PAYLOAD_LEN);

    if payload[0] != TRON_PREFIX {
        return Err(HaqqCoreError::InvalidAddress {
            reason: format!("expected 0x41 network prefix, got 0x{:02x}", payload[0]),
        });
    }

    let expected = sha256d(payload);
    if checksum != &expected[..CHECKSUM_LEN] {
        return Err(HaqqCoreError::InvalidAddress {
            reason: "base58check checksum mismatch".into(),
        });
    }

    let mut body = [0u8; 20];
    body.copy_from_slice(&payload[1..]);
    Ok(body)
}

/// Encodes a 20-byte address body as a Tron base58check address.
pub fn encode(body: &[u8; 20]) -> String {
    let mut payload = [0u8; PAYLOAD_LEN + CHECKSUM_LEN];
    payload[0] = TRON_PREFIX;
    payload[1..PAYLOAD_LEN].copy_from_slice(body);

    let checksum = sha256d(&payload[..PAYLOAD_LEN]);
    payload[PAYLOAD_LEN..].copy_from_slice(&checksum[..CHECKSUM_LEN]);

    bs58::encode(&payload).into_string()
}

/// Whether `address` decodes as a Tron base58check address.
pub fn is_tron_address(address: &str) -> bool {
    decode(address).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
