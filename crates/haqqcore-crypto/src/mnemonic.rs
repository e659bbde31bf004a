//! BIP39 mnemonic validation and seed derivation.
//!
//! Thin wrapper over the `bip39` crate: phrase validation (wordlist +
//! checksum) and the PBKDF2-HMAC-SHA512 seed derivation, with the
//! resulting seed held in a zeroize-on-drop container.

use haqqcore_types::{HaqqCoreError, Result};
use zeroize::{Zeroize, ZeroizeOnDrop};

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// 64-byte BIP39 seed.
///
/// Automatically zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 64]);

impl Seed {
    /// Fixed byte length of a BIP39 seed.
    pub const LEN: usize = 64;

    /// Creates a [`Seed`] from raw bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Returns the raw seed material.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

// Seed does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Validation / seed derivation
// ---------------------------------------------------------------------------

/// Validates a BIP39 mnemonic phrase (wordlist membership + checksum).
///
/// # Errors
///
/// Returns [`HaqqCoreError::CryptoError`] if the phrase is not a valid
/// English BIP39 mnemonic.
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    bip39::Mnemonic::parse_normalized(phrase)
        .map(|_| ())
        .map_err(|e| HaqqCoreError::CryptoError {
            reason: format!("invalid mnemonic: {e}"),
        })
}

/// Derives the 64-byte BIP39 seed from a mnemonic phrase.
///
/// # Parameters
///
/// - `phrase` — validated BIP39 mnemonic.
/// - `passphrase` — optional BIP39 passphrase (use `""` for none).
///
/// # Errors
///
/// Returns [`HaqqCoreError::CryptoError`] if the phrase is invalid.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Seed> {
    let mnemonic =
        bip39::Mnemonic::parse_normalized(phrase).map_err(|e| HaqqCoreError::CryptoError {
            reason: format!("invalid mnemonic: {e}"),
        })?;
    Ok(Seed(mnemonic.to_seed_normalized(passphrase)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// BIP39 mnemonic from all-zero 128-bit entropy.
    const MNEMONIC_12: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn valid_mnemonic_accepted() -> Result<()> {
        validate_mnemonic(MNEMONIC_12)
    }

    #[test]
    fn bad_checksum_rejected() {
        // Last word altered: checksum no longer matches.
        let phrase =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(validate_mnemonic(phrase).is_err());
    }

    #[test]
    fn non_wordlist_word_rejected() {
        assert!(validate_mnemonic("not a real bip39 phrase at all").is_err());
    }

    #[test]
    fn seed_matches_reference_vector() -> Result<()> {
        // Trezor BIP39 test vector for all-zero entropy + "TREZOR" passphrase.
        let seed = mnemonic_to_seed(MNEMONIC_12, "TREZOR")?;
        assert_eq!(
            hex::encode(seed.as_bytes()),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
        Ok(())
    }

    #[test]
    fn empty_passphrase_differs_from_passphrase() -> Result<()> {
        let a = mnemonic_to_seed(MNEMONIC_12, "")?;
        let b = mnemonic_to_seed(MNEMONIC_12, "TREZOR")?;
        assert_ne!(a.as_bytes(), b.as_bytes());
        Ok(())
    }
}
