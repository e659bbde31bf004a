//! Argon2id key derivation for PIN-encrypted vaults.
//!
//! Derives a 256-bit encryption key from the user's PIN and a random
//! salt using Argon2id (memory-hard, GPU-resistant). The PIN is short
//! and low-entropy, so the memory cost is the security parameter that
//! matters here.

use haqqcore_types::{HaqqCoreError, Result};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

// ---------------------------------------------------------------------------
// KdfParams
// ---------------------------------------------------------------------------

/// Configurable parameters for the Argon2id key derivation function.
///
/// Stored alongside each vault blob so that old vaults remain
/// decryptable after the defaults are raised.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB. Must be ≥ 8 × `p_cost`.
    pub m_cost: u32,
    /// Time cost (number of passes). Must be ≥ 1.
    pub t_cost: u32,
    /// Parallelism degree. Must be ≥ 1.
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: 65_536, // 64 MiB
            t_cost: 3,
            p_cost: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// DerivedKey
// ---------------------------------------------------------------------------

/// 256-bit key derived by Argon2id.
///
/// Automatically zeroized when dropped to minimize the time sensitive
/// material resides in memory.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; 32]);

impl DerivedKey {
    /// Fixed byte length of the derived key.
    pub const LEN: usize = 32;

    /// Returns the raw 32-byte key material.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// DerivedKey does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

/// Minimum acceptable salt length.
const MIN_SALT_LEN: usize = 8;

/// Derives a 256-bit key from a PIN and salt using Argon2id.
///
/// # Errors
///
/// - [`HaqqCoreError::ConfigError`] if parameters are invalid (salt
///   too short, zero time cost, memory cost below the Argon2 minimum).
/// - [`HaqqCoreError::CryptoError`] if the underlying Argon2
///   computation fails.
pub fn derive_pin_key(pin: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    if salt.len() < MIN_SALT_LEN {
        return Err(HaqqCoreError::ConfigError {
            reason: format!(
                "salt must be at least {MIN_SALT_LEN} bytes, got {}",
                salt.len()
            ),
        });
    }

    let argon2_params = argon2::Params::new(
        params.m_cost,
        params.t_cost,
        params.p_cost,
        Some(DerivedKey::LEN),
    )
    .map_err(|e| HaqqCoreError::ConfigError {
        reason: format!("invalid Argon2 parameters: {e}"),
    })?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut output = [0u8; 32];
    argon2
        .hash_password_into(pin, salt, &mut output)
        .map_err(|e| HaqqCoreError::CryptoError {
            reason: format!("Argon2id derivation failed: {e}"),
        })?;

    Ok(DerivedKey(output))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
