//! HMAC-SHA256 message authentication codes.
//!
//! Keyed HMAC-SHA256 computation and verification for tamper
//! detection. Used by the encrypted store to authenticate records
//! before decryption (Encrypt-then-MAC).

use haqqcore_types::{HaqqCoreError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// HMAC-SHA256 type alias.
type HmacSha256 = Hmac<Sha256>;

/// Fixed output length of HMAC-SHA256 in bytes.
pub const HMAC_SHA256_LEN: usize = 32;

/// Computes HMAC-SHA256 over `data` using `key`.
///
/// # Errors
///
/// Returns [`HaqqCoreError::CryptoError`] if HMAC initialisation fails
/// (should not happen with SHA-256, but we avoid `unwrap`).
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| HaqqCoreError::CryptoError {
        reason: format!("HMAC-SHA256 key init failed: {e}"),
    })?;
    mac.update(data);
    let result = mac.finalize().into_bytes();

    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    Ok(output)
}

/// Verifies an HMAC-SHA256 tag in constant time.
///
/// # Errors
///
/// Returns [`HaqqCoreError::CryptoError`] if initialisation fails or
/// the computed tag does not match `expected` (tamper detected).
pub fn verify_hmac_sha256(key: &[u8], data: &[u8], expected: &[u8; 32]) -> Result<()> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| HaqqCoreError::CryptoError {
        reason: format!("HMAC-SHA256 key init failed: {e}"),
    })?;
    mac.update(data);
    mac.verify_slice(expected)
        .map_err(|_| HaqqCoreError::CryptoError {
            reason: "HMAC-SHA256 verification failed".into(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_and_verify() -> Result<()> {
        let tag = hmac_sha256(b"key", b"message")?;
        verify_hmac_sha256(b"key", b"message", &tag)
    }

    #[test]
    fn wrong_key_rejected() -> Result<()> {
        let tag = hmac_sha256(b"key", b"message")?;
        assert!(verify_hmac_sha256(b"other", b"message", &tag).is_err());
        Ok(())
    }

    #[test]
    fn wrong_data_rejected() -> Result<()> {
        let tag = hmac_sha256(b"key", b"message")?;
        assert!(verify_hmac_sha256(b"key", b"tampered", &tag).is_err());
        Ok(())
    }
}
