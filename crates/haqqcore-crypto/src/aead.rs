//! XChaCha20-Poly1305 authenticated encryption with associated data.
//!
//! All symmetric encryption in haqqcore uses XChaCha20-Poly1305 with
//! 192-bit (24-byte) nonces. Nonces are generated from OS entropy and
//! **must never be reused** with the same key.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use haqqcore_types::{HaqqCoreError, Result};
use rand::rngs::OsRng;
use rand::RngCore;

// ---------------------------------------------------------------------------
// AeadNonce
// ---------------------------------------------------------------------------

/// 192-bit (24-byte) nonce for XChaCha20-Poly1305.
///
/// Must be unique per encryption operation under a given key. The
/// 192-bit space makes accidental collision of random nonces
/// negligible.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AeadNonce([u8; 24]);

impl AeadNonce {
    /// Fixed byte length of an XChaCha20-Poly1305 nonce.
    pub const LEN: usize = 24;

    /// Creates an [`AeadNonce`] from raw bytes.
    pub fn from_bytes(bytes: [u8; 24]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 24-byte array.
    pub fn as_bytes(&self) -> &[u8; 24] {
        &self.0
    }
}

/// Generates a fresh 192-bit random nonce from OS entropy.
pub fn generate_aead_nonce() -> AeadNonce {
    let mut bytes = [0u8; 24];
    OsRng.fill_bytes(&mut bytes);
    AeadNonce(bytes)
}

// ---------------------------------------------------------------------------
// Encrypt / Decrypt
// ---------------------------------------------------------------------------

/// Encrypts `plaintext` with XChaCha20-Poly1305.
///
/// The returned ciphertext has the 16-byte Poly1305 authentication tag
/// appended. The nonce is not included; callers store it alongside.
///
/// # Errors
///
/// Returns [`HaqqCoreError::CryptoError`] if encryption fails.
pub fn encrypt_xchacha20(
    key: &[u8; 32],
    nonce: &AeadNonce,
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .encrypt(
            XNonce::from_slice(nonce.as_bytes()),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| HaqqCoreError::CryptoError {
            reason: "XChaCha20-Poly1305 encryption failed".into(),
        })
}

/// Decrypts and authenticates `ciphertext` with XChaCha20-Poly1305.
///
/// # Errors
///
/// Returns [`HaqqCoreError::CryptoError`] if authentication fails.
/// Wrong key, wrong nonce, wrong AAD, and tampered ciphertext are
/// indistinguishable from one another.
pub fn decrypt_xchacha20(
    key: &[u8; 32],
    nonce: &AeadNonce,
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(
            XNonce::from_slice(nonce.as_bytes()),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| HaqqCoreError::CryptoError {
            reason: "XChaCha20-Poly1305 decryption failed: authentication error".into(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x42; 32];
    const AAD: &[u8] = b"haqqcore-test";

    #[test]
    fn roundtrip() -> Result<()> {
        let nonce = generate_aead_nonce();
        let ciphertext = encrypt_xchacha20(&KEY, &nonce, b"secret pin", AAD)?;
        assert_ne!(ciphertext.as_slice(), b"secret pin");
        assert_eq!(ciphertext.len(), b"secret pin".len() + 16);

        let plaintext = decrypt_xchacha20(&KEY, &nonce, &ciphertext, AAD)?;
        assert_eq!(plaintext, b"secret pin");
        Ok(())
    }

    #[test]
    fn wrong_key_fails() -> Result<()> {
        let nonce = generate_aead_nonce();
        let ciphertext = encrypt_xchacha20(&KEY, &nonce, b"secret", AAD)?;
        let wrong_key = [0x43u8; 32];
        assert!(decrypt_xchacha20(&wrong_key, &nonce, &ciphertext, AAD).is_err());
        Ok(())
    }

    #[test]
    fn wrong_aad_fails() -> Result<()> {
        let nonce = generate_aead_nonce();
        let ciphertext = encrypt_xchacha20(&KEY, &nonce, b"secret", AAD)?;
        assert!(decrypt_xchacha20(&KEY, &nonce, &ciphertext, b"other-context").is_err());
        Ok(())
    }

    #[test]
    fn tampered_ciphertext_fails() -> Result<()> {
        let nonce = generate_aead_nonce();
        let mut ciphertext = encrypt_xchacha20(&KEY, &nonce, b"secret", AAD)?;
        ciphertext[0] ^= 0x01;
        assert!(decrypt_xchacha20(&KEY, &nonce, &ciphertext, AAD).is_err());
        Ok(())
    }
}
