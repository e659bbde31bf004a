//! The encrypted pending-PIN value.
//!
//! Written before any provider is touched, cleared only at commit or
//! after a completed rollback. Its presence without a commit is the
//! signature of an in-flight or crashed rotation, and it is the only
//! way to authenticate a rollback: by the time rollback is needed, the
//! "current" PIN is already the new one for every marked provider.
//!
//! The PIN is wrapped with XChaCha20-Poly1305 under a key expanded
//! (HKDF-SHA256) from a host-supplied device secret, so a leaked
//! store dump alone does not reveal the pending PIN.

use haqqcore_crypto::aead::{decrypt_xchacha20, encrypt_xchacha20, generate_aead_nonce, AeadNonce};
use haqqcore_crypto::hkdf::hkdf_sha256;
use haqqcore_types::{HaqqCoreError, Result, SecureKv};
use zeroize::Zeroizing;

/// Secure-store key holding the encrypted pending PIN.
const CACHED_PIN_KEY: &str = "pin.rotation.cached";

/// HKDF salt for the wrapping key.
const HKDF_SALT: &[u8] = b"haqqcore-cached-pin";

/// HKDF info for the wrapping key.
const HKDF_INFO: &[u8] = b"wrap";

/// AAD binding ciphertexts to this store.
const PIN_AAD: &[u8] = b"haqqcore-cached-pin-v1";

// ---------------------------------------------------------------------------
// CachedPinStore
// ---------------------------------------------------------------------------

/// Encrypted store for the pending new PIN of an in-flight rotation.
pub struct CachedPinStore<'a> {
    kv: &'a dyn SecureKv,
    wrap_key: [u8; 32],
}

impl<'a> CachedPinStore<'a> {
    /// Creates the store, expanding the wrapping key from the host's
    /// device secret.
    ///
    /// # Errors
    ///
    /// Returns [`HaqqCoreError::CryptoError`] if key expansion fails.
    pub fn new(kv: &'a dyn SecureKv, device_secret: &[u8]) -> Result<Self> {
        let wrap_key = hkdf_sha256(device_secret, HKDF_SALT, HKDF_INFO, 32)?.to_key32()?;
        Ok(Self { kv, wrap_key })
    }

    /// Encrypts and persists `pin` as the pending value.
    ///
    /// Must be called **before** any provider is touched: a crash at
    /// any later point can then still authenticate a rollback.
    pub fn save(&self, pin: &str) -> Result<()> {
        let nonce = generate_aead_nonce();
        let ciphertext = encrypt_xchacha20(&self.wrap_key, &nonce, pin.as_bytes(), PIN_AAD)?;

        let mut record = Vec::with_capacity(AeadNonce::LEN + ciphertext.len());
        record.extend_from_slice(nonce.as_bytes());
        record.extend_from_slice(&ciphertext);
        self.kv.set(CACHED_PIN_KEY, &record)
    }

    /// Loads and decrypts the pending PIN, if one is cached.
    ///
    /// # Errors
    ///
    /// Returns [`HaqqCoreError::CryptoError`] if a record exists but
    /// does not authenticate under this device secret — a corrupt
    /// cache cannot authenticate a rollback and must surface loudly.
    pub fn load(&self) -> Result<Option<Zeroizing<String>>> {
        let record = match self.kv.get(CACHED_PIN_KEY)? {
            None => return Ok(None),
            Some(record) => record,
        };

        if record.len() < AeadNonce::LEN {
            return Err(HaqqCoreError::StorageError {
                reason: "cached pin record too short".into(),
            });
        }

        let mut nonce_bytes = [0u8; AeadNonce::LEN];
        nonce_bytes.copy_from_slice(&record[..AeadNonce::LEN]);

        let plaintext = decrypt_xchacha20(
            &self.wrap_key,
            &AeadNonce::from_bytes(nonce_bytes),
            &record[AeadNonce::LEN..],
            PIN_AAD,
        )?;

        let pin = String::from_utf8(plaintext).map_err(|_| HaqqCoreError::StorageError {
            reason: "cached pin is not valid UTF-8".into(),
        })?;
        Ok(Some(Zeroizing::new(pin)))
    }

    /// Whether a pending PIN is cached, without decrypting it.
    pub fn is_present(&self) -> Result<bool> {
        Ok(self.kv.get(CACHED_PIN_KEY)?.is_some())
    }

    /// Removes the pending value.
    pub fn clear(&self) -> Result<()> {
        self.kv.remove(CACHED_PIN_KEY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    const DEVICE_SECRET: &[u8] = b"device-uid-0001";

    #[test]
    fn save_load_clear_cycle() -> Result<()> {
        let kv = MemoryKv::new();
        let store = CachedPinStore::new(&kv, DEVICE_SECRET)?;

        assert!(store.load()?.is_none());
        assert!(!store.is_present()?);

        store.save("123456")?;
        assert!(store.is_present()?);
        let pin = store.load()?.expect("cached pin present");
        assert_eq!(pin.as_str(), "123456");

        store.clear()?;
        assert!(store.load()?.is_none());
        assert!(!store.is_present()?);
        Ok(())
    }

    #[test]
    fn save_overwrites_previous_value() -> Result<()> {
        let kv = MemoryKv::new();
        let store = CachedPinStore::new(&kv, DEVICE_SECRET)?;
        store.save("111111")?;
        store.save("222222")?;
        let pin = store.load()?.expect("cached pin present");
        assert_eq!(pin.as_str(), "222222");
        Ok(())
    }

    #[test]
    fn wrong_device_secret_cannot_decrypt() -> Result<()> {
        let kv = MemoryKv::new();
        CachedPinStore::new(&kv, DEVICE_SECRET)?.save("123456")?;

        let other = CachedPinStore::new(&kv, b"different-device")?;
        assert!(other.load().is_err());
        Ok(())
    }

    #[test]
    fn pin_is_not_stored_in_plaintext() -> Result<()> {
        use haqqcore_types::SecureKv as _;
        let kv = MemoryKv::new();
        CachedPinStore::new(&kv, DEVICE_SECRET)?.save("123456")?;

        let raw = kv.get(CACHED_PIN_KEY)?.expect("present");
        assert!(!raw.windows(6).any(|w| w == b"123456"));
        Ok(())
    }
}
