//! Haqq bech32 address primitives.
//!
//! Account addresses use the `haqq` human-readable part over the same
//! 20-byte body as the Ethereum form. Validator operator addresses use
//! the `haqqvaloper` HRP and are a distinct namespace — they are never
//! convertible to a spendable account address.

use bech32::{FromBase32, ToBase32, Variant};
use haqqcore_types::{HaqqCoreError, Result};

/// Human-readable part of Haqq account addresses.
pub const HRP_ACCOUNT: &str = "haqq";

/// Human-readable part of Haqq validator operator addresses.
pub const HRP_VALIDATOR: &str = "haqqvaloper";

/// Decodes a `haqq1…` account address into its 20-byte body.
///
/// # Errors
///
/// Returns [`HaqqCoreError::InvalidAddress`] if the input is not valid
/// bech32, carries a different HRP (including `haqqvaloper`), or does
/// not hold exactly 20 bytes.
pub fn decode(address: &str) -> Result<[u8; 20]> {
    let (hrp, data, _variant) =
        bech32::decode(address).map_err(|e| HaqqCoreError::InvalidAddress {
            reason: format!("bech32 decoding failed: {e}"),
        })?;

    if hrp != HRP_ACCOUNT {
        return Err(HaqqCoreError::InvalidAddress {
            reason: format!("expected HRP '{HRP_ACCOUNT}', got '{hrp}'"),
        });
    }

    let bytes = Vec::<u8>::from_base32(&data).map_err(|e| HaqqCoreError::InvalidAddress {
        reason: format!("bech32 base32 conversion failed: {e}"),
    })?;

    if bytes.len() != 20 {
        return Err(HaqqCoreError::InvalidAddress {
            reason: format!("expected 20 bytes, got {}", bytes.len()),
        });
    }

    let mut body = [0u8; 20];
    body.copy_from_slice(&bytes);
    Ok(body)
}

/// Encodes a 20-byte address body as a `haqq1…` account address.
///
/// # Errors
///
/// Returns [`HaqqCoreError::InvalidAddress`] if bech32 encoding fails
/// (cannot happen for a fixed valid HRP, but propagated rather than
/// unwrapped).
pub fn encode(body: &[u8; 20]) -> Result<String> {
    bech32::encode(HRP_ACCOUNT, body.to_base32(), Variant::Bech32).map_err(|e| {
        HaqqCoreError::InvalidAddress {
            reason: format!("bech32 encoding failed: {e}"),
        }
    })
}

/// Whether `address` is a well-formed `haqqvaloper1…` validator address.
pub fn is_validator_address(address: &str) -> bool {
    match bech32::decode(address) {
        Ok((hrp, _, _)) => hrp == HRP_VALIDATOR,
        Err(_) => false,
    }
}

/// Whether `address` decodes as a `haqq1…` account address.
pub fn is_account_address(address: &str) -> bool {
    decode(address).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() -> Result<()> {
        let body = [0x5Au8; 20];
        let encoded = encode(&body)?;
        assert!(encoded.starts_with("haqq1"));
        assert_eq!(decode(&encoded)?, body);
        Ok(())
    }

    #[test]
    fn validator_hrp_not_an_account_address() -> Result<()> {
        let body = [0x01u8; 20];
        let validator = bech32::encode(HRP_VALIDATOR, body.to_base32(), Variant::Bech32)
            .map_err(|e| HaqqCoreError::InvalidAddress {
                reason: e.to_string(),
            })?;
        assert!(is_validator_address(&validator));
        assert!(!is_account_address(&validator));
        assert!(decode(&validator).is_err());
        Ok(())
    }

    #[test]
    fn foreign_hrp_rejected() -> Result<()> {
        let body = [0x01u8; 20];
        let cosmoshub = bech32::encode("cosmos", body.to_base32(), Variant::Bech32)
            .map_err(|e| HaqqCoreError::InvalidAddress {
                reason: e.to_string(),
            })?;
        assert!(decode(&cosmoshub).is_err());
        Ok(())
    }

    #[test]
    fn corrupted_checksum_rejected() -> Result<()> {
        let mut encoded = encode(&[0x07u8; 20])?;
        // Flip the last data character.
        let last = encoded.pop().expect("non-empty");
        encoded.push(if last == 'q' { 'p' } else { 'q' });
        assert!(decode(&encoded).is_err());
        Ok(())
    }

    #[test]
    fn garbage_is_neither_kind() {
        assert!(!is_account_address("not-an-address"));
        assert!(!is_validator_address("haqqvaloper-but-not-bech32"));
    }
}
