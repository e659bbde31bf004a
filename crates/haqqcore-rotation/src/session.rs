//! The reified per-attempt rotation state.

use haqqcore_types::WalletRecord;
use zeroize::Zeroizing;

/// State of one rotation attempt, threaded explicitly through the
/// coordinator's operations.
///
/// The wallet set is snapshotted when the attempt begins: wallets
/// added while the attempt is in flight are untouched by it and join
/// the next one. Both PINs are held zeroize-on-drop.
pub struct RotationSession {
    wallets: Vec<WalletRecord>,
    old_pin: Zeroizing<String>,
    new_pin: Zeroizing<String>,
}

impl RotationSession {
    /// Begins a session over a snapshot of the wallet set.
    pub fn begin(wallets: Vec<WalletRecord>, old_pin: String, new_pin: String) -> Self {
        Self {
            wallets,
            old_pin: Zeroizing::new(old_pin),
            new_pin: Zeroizing::new(new_pin),
        }
    }

    /// The snapshotted wallets, in directory enumeration order.
    pub fn wallets(&self) -> &[WalletRecord] {
        &self.wallets
    }

    /// The PIN every provider is currently bound to.
    pub fn old_pin(&self) -> &str {
        &self.old_pin
    }

    /// The PIN being rotated in.
    pub fn new_pin(&self) -> &str {
        &self.new_pin
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
