//! HKDF-SHA256 key expansion (RFC 5869).
//!
//! Expands a master secret into domain-separated sub-keys: the
//! encrypted store derives its encryption and MAC keys this way, and
//! the cached-pin store derives its wrapping key from the host's
//! device secret.

use haqqcore_types::{HaqqCoreError, Result};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum output length in bytes.
///
/// HKDF-SHA256 can produce up to 255 × 32 = 8160 bytes, but we cap at
/// 64 to prevent misuse. Typical usage is 32 bytes (one XChaCha20 key).
const MAX_OUTPUT_LEN: usize = 64;

// ---------------------------------------------------------------------------
// HkdfOutput
// ---------------------------------------------------------------------------

/// Variable-length key material derived by HKDF-SHA256.
///
/// Automatically zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HkdfOutput {
    bytes: Vec<u8>,
}

impl HkdfOutput {
    /// Returns the derived key material.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copies the output into a fixed 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`HaqqCoreError::CryptoError`] if the output is not
    /// exactly 32 bytes long.
    pub fn to_key32(&self) -> Result<[u8; 32]> {
        if self.bytes.len() != 32 {
            return Err(HaqqCoreError::CryptoError {
                reason: format!("expected 32-byte HKDF output, got {}", self.bytes.len()),
            });
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.bytes);
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derives `output_len` bytes from `ikm` via HKDF-SHA256.
///
/// # Parameters
///
/// - `ikm` — input key material (master secret).
/// - `salt` — non-secret randomizer; a fixed application constant is
///   acceptable here.
/// - `info` — domain-separation context string.
/// - `output_len` — number of bytes to derive (1..=64).
///
/// # Errors
///
/// Returns [`HaqqCoreError::ConfigError`] if `output_len` is zero or
/// exceeds the cap.
pub fn hkdf_sha256(ikm: &[u8], salt: &[u8], info: &[u8], output_len: usize) -> Result<HkdfOutput> {
    if output_len == 0 || output_len > MAX_OUTPUT_LEN {
        return Err(HaqqCoreError::ConfigError {
            reason: format!("HKDF output length must be 1..={MAX_OUTPUT_LEN}, got {output_len}"),
        });
    }

    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut output = vec![0u8; output_len];
    hk.expand(info, &mut output)
        .map_err(|e| HaqqCoreError::CryptoError {
            reason: format!("HKDF expansion failed: {e}"),
        })?;

    Ok(HkdfOutput { bytes: output })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
