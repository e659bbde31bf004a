//! The credential-provider capability contract.

use haqqcore_types::{AccountInfo, ProviderError};

/// Capability contract over a wallet's key custody.
///
/// One instance exists per wallet step and is bound at construction to
/// the PIN it authenticates with; instances are never shared or reused
/// concurrently. Calls are genuine suspension points: they may block
/// on hardware transport or network I/O, and rotation processes one
/// wallet at a time.
///
/// How key material is re-wrapped under a new PIN is opaque to
/// callers. The one observable invariant every implementation must
/// uphold: `update_pin` changes only the *encryption* of key material,
/// never the material itself, so the address derived via
/// [`account_info`](CredentialProvider::account_info) is PIN-invariant.
pub trait CredentialProvider: Send {
    /// Derives the account at `hd_path` and returns its address.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::IncorrectPin`] if the bound PIN does not
    ///   authenticate the stored key material.
    /// - [`ProviderError::Unavailable`] on transient transport failure.
    /// - [`ProviderError::Internal`] on corrupt or missing vaults.
    fn account_info(&self, hd_path: &str) -> Result<AccountInfo, ProviderError>;

    /// Re-wraps the stored key material under `new_pin`.
    ///
    /// Authenticates with the PIN the provider was bound to at
    /// construction. Success means the vault now opens under
    /// `new_pin` — it does **not** by itself prove the key material
    /// survived intact; callers re-derive and compare the address.
    fn update_pin(&self, new_pin: &str) -> Result<(), ProviderError>;
}
