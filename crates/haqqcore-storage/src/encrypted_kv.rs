//! Sled-backed encrypted secure store.
//!
//! Reference [`SecureKv`] implementation for desktop hosts. Every
//! stored value follows the Encrypt-then-MAC pattern:
//!
//! ```text
//! [nonce 24B] [ciphertext variable] [hmac 32B]
//! ```
//!
//! On read, the HMAC is verified **before** any decryption attempt.
//! The encryption and MAC keys are domain-separated expansions of a
//! 32-byte master key via HKDF-SHA256; the master key is zeroized on
//! drop. Writes flush sled before returning, so a completed `set` or
//! `remove` survives an immediate crash.

use std::path::Path;

use haqqcore_crypto::aead::{decrypt_xchacha20, encrypt_xchacha20, generate_aead_nonce, AeadNonce};
use haqqcore_crypto::hkdf::hkdf_sha256;
use haqqcore_crypto::mac::{hmac_sha256, verify_hmac_sha256};
use haqqcore_types::{HaqqCoreError, Result, SecureKv};
use zeroize::{Zeroize, ZeroizeOnDrop};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// HKDF salt for deriving sub-keys from the master key.
const HKDF_SALT: &[u8] = b"haqqcore-secure-kv";

/// HKDF info for the encryption sub-key.
const HKDF_INFO_ENC: &[u8] = b"encryption";

/// HKDF info for the HMAC sub-key.
const HKDF_INFO_MAC: &[u8] = b"hmac";

/// Size of the XChaCha20-Poly1305 nonce.
const NONCE_LEN: usize = 24;

/// Size of the HMAC-SHA256 tag.
const HMAC_LEN: usize = 32;

/// Minimum stored value size: nonce + AEAD tag (16) + HMAC.
const MIN_VALUE_LEN: usize = NONCE_LEN + 16 + HMAC_LEN;

// ---------------------------------------------------------------------------
// DerivedKeys
// ---------------------------------------------------------------------------

/// Pair of domain-separated keys expanded from the master key.
#[derive(Zeroize, ZeroizeOnDrop)]
struct DerivedKeys {
    enc_key: [u8; 32],
    mac_key: [u8; 32],
}

impl DerivedKeys {
    fn derive(master_key: &[u8; 32]) -> Result<Self> {
        let enc_key = hkdf_sha256(master_key, HKDF_SALT, HKDF_INFO_ENC, 32)?.to_key32()?;
        let mac_key = hkdf_sha256(master_key, HKDF_SALT, HKDF_INFO_MAC, 32)?.to_key32()?;
        Ok(Self { enc_key, mac_key })
    }
}

// ---------------------------------------------------------------------------
// EncryptedKv
// ---------------------------------------------------------------------------

/// Encrypted, durable key/value store over a sled database.
pub struct EncryptedKv {
    db: sled::Db,
    keys: DerivedKeys,
}

impl EncryptedKv {
    /// Opens (or creates) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HaqqCoreError::StorageError`] if sled fails to open,
    /// or [`HaqqCoreError::CryptoError`] if key expansion fails.
    pub fn open(path: impl AsRef<Path>, master_key: &[u8; 32]) -> Result<Self> {
        let db = sled::open(path).map_err(|e| HaqqCoreError::StorageError {
            reason: format!("sled open failed: {e}"),
        })?;
        let keys = DerivedKeys::derive(master_key)?;
        Ok(Self { db, keys })
    }

    /// Encrypts a value: encrypt → HMAC → pack.
    fn encrypt_value(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = generate_aead_nonce();
        let ciphertext = encrypt_xchacha20(&self.keys.enc_key, &nonce, plaintext, &[])?;

        let mut mac_input = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        mac_input.extend_from_slice(nonce.as_bytes());
        mac_input.extend_from_slice(&ciphertext);
        let tag = hmac_sha256(&self.keys.mac_key, &mac_input)?;

        let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len() + HMAC_LEN);
        output.extend_from_slice(nonce.as_bytes());
        output.extend_from_slice(&ciphertext);
        output.extend_from_slice(&tag);
        Ok(output)
    }

    /// Decrypts a value: unpack → HMAC verify → decrypt.
    fn decrypt_value(&self, raw: &[u8]) -> Result<Vec<u8>> {
        if raw.len() < MIN_VALUE_LEN {
            return Err(HaqqCoreError::StorageError {
                reason: format!(
                    "stored value too short: expected at least {MIN_VALUE_LEN} bytes, got {}",
                    raw.len()
                ),
            });
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(&raw[..NONCE_LEN]);

        let hmac_start = raw.len() - HMAC_LEN;
        let mut expected = [0u8; HMAC_LEN];
        expected.copy_from_slice(&raw[hmac_start..]);

        let ciphertext = &raw[NONCE_LEN..hmac_start];

        let mut mac_input = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        mac_input.extend_from_slice(&nonce_bytes);
        mac_input.extend_from_slice(ciphertext);
        verify_hmac_sha256(&self.keys.mac_key, &mac_input, &expected).map_err(|_| {
            HaqqCoreError::StorageError {
                reason: "HMAC verification failed: stored value may be tampered".into(),
            }
        })?;

        decrypt_xchacha20(
            &self.keys.enc_key,
            &AeadNonce::from_bytes(nonce_bytes),
            ciphertext,
            &[],
        )
    }

    /// Flushes sled so the preceding mutation is on disk.
    fn flush(&self) -> Result<()> {
        self.db.flush().map_err(|e| HaqqCoreError::StorageError {
            reason: format!("sled flush failed: {e}"),
        })?;
        Ok(())
    }
}

impl SecureKv for EncryptedKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let raw = self.db.get(key).map_err(|e| HaqqCoreError::StorageError {
            reason: format!("sled get failed: {e}"),
        })?;
        match raw {
            None => Ok(None),
            Some(bytes) => Ok(Some(self.decrypt_value(&bytes)?)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let encrypted = self.encrypt_value(value)?;
        self.db
            .insert(key, encrypted)
            .map_err(|e| HaqqCoreError::StorageError {
                reason: format!("sled insert failed: {e}"),
            })?;
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key)
            .map_err(|e| HaqqCoreError::StorageError {
                reason: format!("sled remove failed: {e}"),
            })?;
        self.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// RAII guard that removes a temporary database directory on drop.
    struct TempDir(std::path::PathBuf);

    impl TempDir {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "haqqcore_kv_{name}_{}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&path);
            Self(path)
        }

        fn path(&self) -> &std::path::Path {
            &self.0
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    const MASTER_KEY: [u8; 32] = [0x42; 32];

    #[test]
    fn roundtrip_and_overwrite() -> Result<()> {
        let dir = TempDir::new("roundtrip");
        let kv = EncryptedKv::open(dir.path(), &MASTER_KEY)?;

        kv.set("pin.rotation.cached", b"value-1")?;
        assert_eq!(kv.get("pin.rotation.cached")?, Some(b"value-1".to_vec()));

        kv.set("pin.rotation.cached", b"value-2")?;
        assert_eq!(kv.get("pin.rotation.cached")?, Some(b"value-2".to_vec()));

        kv.remove("pin.rotation.cached")?;
        assert_eq!(kv.get("pin.rotation.cached")?, None);
        Ok(())
    }

    #[test]
    fn values_are_not_plaintext_on_disk() -> Result<()> {
        let dir = TempDir::new("opaque");
        let kv = EncryptedKv::open(dir.path(), &MASTER_KEY)?;
        kv.set("k", b"super-secret-pin")?;

        let raw = kv.db.get("k").expect("sled get").expect("present");
        assert!(!raw
            .windows(b"super-secret-pin".len())
            .any(|w| w == b"super-secret-pin"));
        Ok(())
    }

    #[test]
    fn tampered_value_fails_before_decryption() -> Result<()> {
        let dir = TempDir::new("tamper");
        let kv = EncryptedKv::open(dir.path(), &MASTER_KEY)?;
        kv.set("k", b"value")?;

        let mut raw = kv.db.get("k").expect("sled get").expect("present").to_vec();
        let mid = raw.len() / 2;
        raw[mid] ^= 0x01;
        kv.db.insert("k", raw).expect("sled insert");

        assert!(matches!(
            kv.get("k"),
            Err(HaqqCoreError::StorageError { .. })
        ));
        Ok(())
    }

    #[test]
    fn survives_reopen_with_same_key() -> Result<()> {
        let dir = TempDir::new("reopen");
        {
            let kv = EncryptedKv::open(dir.path(), &MASTER_KEY)?;
            kv.set("persisted", b"across-restart")?;
        }
        let kv = EncryptedKv::open(dir.path(), &MASTER_KEY)?;
        assert_eq!(kv.get("persisted")?, Some(b"across-restart".to_vec()));
        Ok(())
    }

    #[test]
    fn wrong_master_key_cannot_read() -> Result<()> {
        let dir = TempDir::new("wrongkey");
        {
            let kv = EncryptedKv::open(dir.path(), &MASTER_KEY)?;
            kv.set("k", b"value")?;
        }
        let kv = EncryptedKv::open(dir.path(), &[0x43u8; 32])?;
        assert!(kv.get("k").is_err());
        Ok(())
    }
}
