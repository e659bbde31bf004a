//! Hot-key custody: one raw secp256k1 private key in a PIN-encrypted vault.

use std::sync::Arc;

use haqqcore_address::eth;
use haqqcore_crypto::hd_derive::{eth_address_bytes, signing_key_from_bytes};
use haqqcore_crypto::kdf::KdfParams;
use haqqcore_types::{AccountInfo, ProviderError, SecureKv};
use zeroize::Zeroizing;

use crate::provider::CredentialProvider;
use crate::vault::{load_blob, reseal_blob, store_blob, VaultBlob};

/// AAD binding vault ciphertexts to this custody kind and format.
const VAULT_AAD: &[u8] = b"haqqcore-hot-vault-v1";

/// Secure-store key for an account's hot-key vault.
fn vault_key(account_id: &str) -> String {
    format!("custody.hot.{account_id}")
}

// ---------------------------------------------------------------------------
// HotProvider
// ---------------------------------------------------------------------------

/// Credential provider over a single PIN-encrypted private key.
///
/// Hot wallets hold one imported key; no hierarchy applies, so the
/// derivation path is accepted and ignored.
pub struct HotProvider {
    account_id: String,
    kv: Arc<dyn SecureKv>,
    pin: Zeroizing<String>,
}

impl HotProvider {
    /// Creates a provider bound to `pin` for the given account.
    pub fn new(kv: Arc<dyn SecureKv>, account_id: impl Into<String>, pin: &str) -> Self {
        Self {
            account_id: account_id.into(),
            kv,
            pin: Zeroizing::new(pin.to_string()),
        }
    }

    /// Creates the account's vault from raw 32-byte key material.
    pub fn init_account(
        kv: &dyn SecureKv,
        account_id: &str,
        private_key: &[u8; 32],
        pin: &str,
        kdf: KdfParams,
    ) -> Result<(), ProviderError> {
        // Reject invalid scalars up front rather than at first use.
        signing_key_from_bytes(private_key).map_err(|e| ProviderError::Internal {
            reason: e.to_string(),
        })?;
        let blob = VaultBlob::seal(pin, private_key, VAULT_AAD, kdf)?;
        store_blob(kv, &vault_key(account_id), &blob)
    }
}

impl CredentialProvider for HotProvider {
    fn account_info(&self, _hd_path: &str) -> Result<AccountInfo, ProviderError> {
        let blob = load_blob(self.kv.as_ref(), &vault_key(&self.account_id))?;
        let plaintext = blob.open(&self.pin, VAULT_AAD)?;

        let key = signing_key_from_bytes(&plaintext).map_err(|e| ProviderError::Internal {
            reason: e.to_string(),
        })?;

        Ok(AccountInfo {
            address: eth::encode_lower(&eth_address_bytes(&key)),
        })
    }

    fn update_pin(&self, new_pin: &str) -> Result<(), ProviderError> {
        reseal_blob(
            self.kv.as_ref(),
            &vault_key(&self.account_id),
            &self.pin,
            new_pin,
            VAULT_AAD,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
