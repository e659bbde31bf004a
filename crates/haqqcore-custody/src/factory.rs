//! Provider construction over the closed custody enumeration.

use std::sync::Arc;

use haqqcore_types::{CustodyKind, SecureKv, WalletRecord};

use crate::hot::HotProvider;
use crate::mnemonic::MnemonicProvider;
use crate::provider::CredentialProvider;
use crate::sss::SssProvider;

/// Builds the credential provider for a wallet's PIN-rotation step,
/// bound to `pin`.
///
/// Returns `None` for custody kinds that do not participate in PIN
/// rotation: hardware wallets keep key material behind the device's
/// own PIN, and watch-only wallets hold none at all. The match is
/// exhaustive over [`CustodyKind`], so adding a kind forces a decision
/// here.
pub fn build_rotation_provider(
    wallet: &WalletRecord,
    kv: Arc<dyn SecureKv>,
    pin: &str,
) -> Option<Box<dyn CredentialProvider>> {
    match wallet.custody {
        CustodyKind::Mnemonic => Some(Box::new(MnemonicProvider::new(
            kv,
            wallet.account_id.clone(),
            pin,
        ))),
        CustodyKind::Hot => Some(Box::new(HotProvider::new(
            kv,
            wallet.account_id.clone(),
            pin,
        ))),
        CustodyKind::Sss => Some(Box::new(SssProvider::new(
            kv,
            wallet.account_id.clone(),
            pin,
        ))),
        CustodyKind::LedgerBle | CustodyKind::KeystoneQr | CustodyKind::WatchOnly => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
