//! Threshold/social-recovery custody: a 2-of-2 share split of the
//! wallet seed.
//!
//! The seed is split into a device share and a cloud share by XOR with
//! a random pad; both are required to reconstruct. Only the device
//! share is PIN-encrypted and participates in PIN rotation — the cloud
//! share belongs to the remote share service and is opaque to
//! rotation. An absent cloud share is reported as
//! [`ProviderError::Unavailable`], the transient failure class, since
//! it models the share service being unreachable.

use std::sync::Arc;

use haqqcore_address::eth;
use haqqcore_crypto::hd_derive::{derive_eth_key, eth_address_bytes};
use haqqcore_crypto::kdf::KdfParams;
use haqqcore_crypto::mnemonic::Seed;
use haqqcore_types::{AccountInfo, ProviderError, SecureKv};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::provider::CredentialProvider;
use crate::vault::{load_blob, reseal_blob, store_blob, VaultBlob};

/// AAD binding device-share ciphertexts to this custody kind and format.
const VAULT_AAD: &[u8] = b"haqqcore-sss-device-v1";

/// Length of each share (matches the BIP39 seed length).
const SHARE_LEN: usize = 64;

/// Secure-store key for an account's PIN-encrypted device share.
fn device_key(account_id: &str) -> String {
    format!("custody.sss.device.{account_id}")
}

/// Secure-store key standing in for the remote share service.
fn cloud_key(account_id: &str) -> String {
    format!("custody.sss.cloud.{account_id}")
}

// ---------------------------------------------------------------------------
// SssProvider
// ---------------------------------------------------------------------------

/// Credential provider over a two-share split seed.
pub struct SssProvider {
    account_id: String,
    kv: Arc<dyn SecureKv>,
    pin: Zeroizing<String>,
}

impl SssProvider {
    /// Creates a provider bound to `pin` for the given account.
    pub fn new(kv: Arc<dyn SecureKv>, account_id: impl Into<String>, pin: &str) -> Self {
        Self {
            account_id: account_id.into(),
            kv,
            pin: Zeroizing::new(pin.to_string()),
        }
    }

    /// Splits `seed` into shares and stores both.
    ///
    /// The device share is sealed under `pin`; the cloud share is
    /// written as-is to the slot standing in for the remote service.
    pub fn init_account(
        kv: &dyn SecureKv,
        account_id: &str,
        seed: &[u8; SHARE_LEN],
        pin: &str,
        kdf: KdfParams,
    ) -> Result<(), ProviderError> {
        let mut pad = [0u8; SHARE_LEN];
        OsRng.fill_bytes(&mut pad);

        let mut device_share = [0u8; SHARE_LEN];
        for i in 0..SHARE_LEN {
            device_share[i] = seed[i] ^ pad[i];
        }

        let blob = VaultBlob::seal(pin, &device_share, VAULT_AAD, kdf)?;
        device_share.zeroize();

        store_blob(kv, &device_key(account_id), &blob)?;
        kv.set(&cloud_key(account_id), &pad)
            .map_err(|e| ProviderError::Internal {
                reason: e.to_string(),
            })
    }

    /// Reconstructs the seed from the two shares.
    fn reconstruct_seed(&self) -> Result<Seed, ProviderError> {
        let blob = load_blob(self.kv.as_ref(), &device_key(&self.account_id))?;
        let device_share = blob.open(&self.pin, VAULT_AAD)?;

        let cloud_share = self
            .kv
            .get(&cloud_key(&self.account_id))
            .map_err(|e| ProviderError::Internal {
                reason: e.to_string(),
            })?
            .ok_or_else(|| ProviderError::Unavailable {
                reason: "cloud share service unreachable".into(),
            })?;

        if device_share.len() != SHARE_LEN || cloud_share.len() != SHARE_LEN {
            return Err(ProviderError::Internal {
                reason: "share length mismatch".into(),
            });
        }

        let mut seed_bytes = [0u8; SHARE_LEN];
        for i in 0..SHARE_LEN {
            seed_bytes[i] = device_share[i] ^ cloud_share[i];
        }
        let seed = Seed::from_bytes(seed_bytes);
        seed_bytes.zeroize();
        Ok(seed)
    }
}

impl CredentialProvider for SssProvider {
    fn account_info(&self, hd_path: &str) -> Result<AccountInfo, ProviderError> {
        let seed = self.reconstruct_seed()?;
        let key = derive_eth_key(&seed, hd_path).map_err(|e| ProviderError::Internal {
            reason: e.to_string(),
        })?;
        Ok(AccountInfo {
            address: eth::encode_lower(&eth_address_bytes(&key)),
        })
    }

    fn update_pin(&self, new_pin: &str) -> Result<(), ProviderError> {
        // Only the device share is re-wrapped; the cloud share is not ours.
        reseal_blob(
            self.kv.as_ref(),
            &device_key(&self.account_id),
            &self.pin,
            new_pin,
            VAULT_AAD,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
