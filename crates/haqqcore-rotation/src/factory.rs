//! Provider-construction seam.
//!
//! The coordinator never constructs custody providers directly: it
//! goes through [`ProviderFactory`], so tests can drive the saga
//! against scripted providers and force a failure at any wallet.

use std::sync::Arc;

use haqqcore_custody::{build_rotation_provider, CredentialProvider};
use haqqcore_types::{SecureKv, WalletRecord};

/// Builds the credential provider for one wallet step, bound to `pin`.
///
/// `None` means the wallet's custody kind does not participate in PIN
/// rotation and the step is skipped.
pub trait ProviderFactory: Send + Sync {
    /// Builds a provider for `wallet` authenticated by `pin`.
    fn build(&self, wallet: &WalletRecord, pin: &str) -> Option<Box<dyn CredentialProvider>>;
}

/// Default factory over the reference custody implementations.
pub struct CustodyFactory {
    kv: Arc<dyn SecureKv>,
}

impl CustodyFactory {
    /// Creates the factory over the secure store holding the vaults.
    pub fn new(kv: Arc<dyn SecureKv>) -> Self {
        Self { kv }
    }
}

impl ProviderFactory for CustodyFactory {
    fn build(&self, wallet: &WalletRecord, pin: &str) -> Option<Box<dyn CredentialProvider>> {
        build_rotation_provider(wallet, self.kv.clone(), pin)
    }
}
