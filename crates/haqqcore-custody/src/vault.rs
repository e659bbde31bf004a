//! PIN-encrypted vault blob shared by the reference providers.
//!
//! Key material at rest is an Argon2id + XChaCha20-Poly1305 envelope:
//!
//! ```text
//! key        = Argon2id(pin, salt)
//! ciphertext = XChaCha20-Poly1305(key, nonce, plaintext, aad)
//! blob       = bincode { salt, nonce, kdf params, ciphertext }
//! ```
//!
//! A fresh salt and nonce are generated on every seal, so re-wrapping
//! under a new PIN never reuses either. The KDF parameters travel with
//! the blob so old vaults stay readable after defaults change.

use haqqcore_crypto::aead::{decrypt_xchacha20, encrypt_xchacha20, generate_aead_nonce, AeadNonce};
use haqqcore_crypto::kdf::{derive_pin_key, KdfParams};
use haqqcore_types::{ProviderError, SecureKv};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Length of the per-blob Argon2id salt.
const SALT_LEN: usize = 16;

// ---------------------------------------------------------------------------
// VaultBlob
// ---------------------------------------------------------------------------

/// Serialized envelope around PIN-encrypted key material.
#[derive(Serialize, Deserialize)]
pub struct VaultBlob {
    /// Per-blob random Argon2id salt.
    salt: [u8; SALT_LEN],
    /// Per-blob random XChaCha20-Poly1305 nonce.
    nonce: [u8; 24],
    /// Argon2id parameters this blob was sealed with.
    kdf: KdfParams,
    /// AEAD ciphertext with the Poly1305 tag appended.
    ciphertext: Vec<u8>,
}

impl VaultBlob {
    /// Seals `plaintext` under `pin` with a fresh salt and nonce.
    pub fn seal(
        pin: &str,
        plaintext: &[u8],
        aad: &[u8],
        kdf: KdfParams,
    ) -> Result<Self, ProviderError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let nonce = generate_aead_nonce();

        let key = derive_pin_key(pin.as_bytes(), &salt, &kdf).map_err(internal)?;
        let ciphertext =
            encrypt_xchacha20(key.as_bytes(), &nonce, plaintext, aad).map_err(internal)?;

        Ok(Self {
            salt,
            nonce: *nonce.as_bytes(),
            kdf,
            ciphertext,
        })
    }

    /// Opens the vault with `pin`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::IncorrectPin`] on AEAD authentication failure.
    /// A wrong PIN and a tampered blob are indistinguishable; both
    /// refuse to yield key material.
    pub fn open(&self, pin: &str, aad: &[u8]) -> Result<Zeroizing<Vec<u8>>, ProviderError> {
        let key = derive_pin_key(pin.as_bytes(), &self.salt, &self.kdf).map_err(internal)?;
        let plaintext = decrypt_xchacha20(
            key.as_bytes(),
            &AeadNonce::from_bytes(self.nonce),
            &self.ciphertext,
            aad,
        )
        .map_err(|_| ProviderError::IncorrectPin)?;
        Ok(Zeroizing::new(plaintext))
    }
}

// ---------------------------------------------------------------------------
// Store access
// ---------------------------------------------------------------------------

/// Loads and deserializes a vault blob from the secure store.
///
/// # Errors
///
/// [`ProviderError::Internal`] if the key is absent or the blob does
/// not deserialize.
pub fn load_blob(kv: &dyn SecureKv, key: &str) -> Result<VaultBlob, ProviderError> {
    let raw = kv
        .get(key)
        .map_err(internal)?
        .ok_or_else(|| ProviderError::Internal {
            reason: format!("vault not found: {key}"),
        })?;
    bincode::deserialize(&raw).map_err(|e| ProviderError::Internal {
        reason: format!("corrupt vault {key}: {e}"),
    })
}

/// Serializes and writes a vault blob to the secure store.
pub fn store_blob(kv: &dyn SecureKv, key: &str, blob: &VaultBlob) -> Result<(), ProviderError> {
    let raw = bincode::serialize(blob).map_err(|e| ProviderError::Internal {
        reason: format!("vault serialization failed: {e}"),
    })?;
    kv.set(key, &raw).map_err(internal)
}

/// Re-wraps the vault at `key`: open under `pin`, seal under
/// `new_pin` with a fresh salt and nonce, write back.
///
/// The plaintext key material is untouched — only its encryption
/// changes — which is what keeps the derived address PIN-invariant.
/// The blob's own KDF parameters are preserved across the re-wrap.
pub fn reseal_blob(
    kv: &dyn SecureKv,
    key: &str,
    pin: &str,
    new_pin: &str,
    aad: &[u8],
) -> Result<(), ProviderError> {
    let blob = load_blob(kv, key)?;
    let plaintext = blob.open(pin, aad)?;
    let resealed = VaultBlob::seal(new_pin, &plaintext, aad, blob.kdf)?;
    store_blob(kv, key, &resealed)
}

/// Maps an internal core error into the provider taxonomy.
fn internal(e: haqqcore_types::HaqqCoreError) -> ProviderError {
    ProviderError::Internal {
        reason: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
