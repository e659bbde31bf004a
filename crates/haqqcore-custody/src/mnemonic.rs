//! Seed-phrase custody: a BIP39 mnemonic at rest in a PIN-encrypted vault.

use std::sync::Arc;

use haqqcore_address::eth;
use haqqcore_crypto::hd_derive::{derive_eth_key, eth_address_bytes};
use haqqcore_crypto::kdf::KdfParams;
use haqqcore_crypto::mnemonic::{mnemonic_to_seed, validate_mnemonic};
use haqqcore_types::{AccountInfo, ProviderError, SecureKv};
use zeroize::Zeroizing;

use crate::provider::CredentialProvider;
use crate::vault::{load_blob, reseal_blob, store_blob, VaultBlob};

/// AAD binding vault ciphertexts to this custody kind and format.
const VAULT_AAD: &[u8] = b"haqqcore-mnemonic-vault-v1";

/// Secure-store key for an account's mnemonic vault.
fn vault_key(account_id: &str) -> String {
    format!("custody.mnemonic.{account_id}")
}

// ---------------------------------------------------------------------------
// MnemonicProvider
// ---------------------------------------------------------------------------

/// Credential provider over a PIN-encrypted BIP39 mnemonic.
pub struct MnemonicProvider {
    account_id: String,
    kv: Arc<dyn SecureKv>,
    pin: Zeroizing<String>,
}

impl MnemonicProvider {
    /// Creates a provider bound to `pin` for the given account.
    pub fn new(kv: Arc<dyn SecureKv>, account_id: impl Into<String>, pin: &str) -> Self {
        Self {
            account_id: account_id.into(),
            kv,
            pin: Zeroizing::new(pin.to_string()),
        }
    }

    /// Creates the account's vault: validates the phrase and seals it
    /// under `pin`.
    pub fn init_account(
        kv: &dyn SecureKv,
        account_id: &str,
        phrase: &str,
        pin: &str,
        kdf: KdfParams,
    ) -> Result<(), ProviderError> {
        validate_mnemonic(phrase).map_err(|e| ProviderError::Internal {
            reason: e.to_string(),
        })?;
        let blob = VaultBlob::seal(pin, phrase.as_bytes(), VAULT_AAD, kdf)?;
        store_blob(kv, &vault_key(account_id), &blob)
    }
}

impl CredentialProvider for MnemonicProvider {
    fn account_info(&self, hd_path: &str) -> Result<AccountInfo, ProviderError> {
        let blob = load_blob(self.kv.as_ref(), &vault_key(&self.account_id))?;
        let plaintext = blob.open(&self.pin, VAULT_AAD)?;

        let phrase = std::str::from_utf8(&plaintext).map_err(|_| ProviderError::Internal {
            reason: "decrypted vault is not valid UTF-8".into(),
        })?;

        let seed = mnemonic_to_seed(phrase, "").map_err(|e| ProviderError::Internal {
            reason: e.to_string(),
        })?;
        let key = derive_eth_key(&seed, hd_path).map_err(|e| ProviderError::Internal {
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
