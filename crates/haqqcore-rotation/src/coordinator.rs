//! The PIN rotation saga.
//!
//! State machine: `Idle → InProgress → {Committed, RolledBack,
//! ManualRecoveryRequired}`.
//!
//! Ordering rules, all load-bearing:
//!
//! 1. The new PIN is encrypted and persisted **before** any provider
//!    is touched, so a crash at any later point can still authenticate
//!    a rollback.
//! 2. A wallet is recorded in the ledger the moment its provider's
//!    update returns — the ledger tracks providers actually mutated,
//!    which is exactly the set a rollback must cover. The step counts
//!    as complete only after the account address re-derived under the
//!    new PIN matches the wallet's recorded address; a provider's own
//!    success return is never trusted alone.
//! 3. Commit order: new PIN becomes the PIN of record, then progress
//!    is cleared, then the cached PIN is cleared.
//! 4. Rollback replays inverse updates over exactly the recorded
//!    wallets, in the order forward progress recorded them,
//!    authenticating with the cached new PIN; entries clear one by one
//!    as each compensating step succeeds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use haqqcore_address::AddressResolver;
use haqqcore_custody::CredentialProvider;
use haqqcore_storage::{CachedPinStore, RotationLedger};
use haqqcore_types::{
    HaqqCoreError, PinVault, Result, SecureKv, WalletDirectory, WalletRecord,
};

use crate::factory::ProviderFactory;
use crate::session::RotationSession;

// ---------------------------------------------------------------------------
// RotationOutcome
// ---------------------------------------------------------------------------

/// Terminal state of a rotation (or recovery) attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RotationOutcome {
    /// Every wallet verified under the new PIN; it is now the PIN of
    /// record.
    Committed,
    /// The attempt was abandoned and every mutated provider verified
    /// back on the old PIN.
    RolledBack,
    /// Rollback itself failed partway. Terminal and distinct from
    /// transient failure: explicit user re-authentication or support
    /// intervention is required.
    ManualRecoveryRequired,
}

impl std::fmt::Display for RotationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Committed => write!(f, "committed"),
            Self::RolledBack => write!(f, "rolled-back"),
            Self::ManualRecoveryRequired => write!(f, "manual-recovery-required"),
        }
    }
}

// ---------------------------------------------------------------------------
// RotationCoordinator
// ---------------------------------------------------------------------------

/// Orchestrates the PIN change saga across every wallet's provider.
pub struct RotationCoordinator {
    directory: Arc<dyn WalletDirectory>,
    kv: Arc<dyn SecureKv>,
    pin_vault: Arc<dyn PinVault>,
    factory: Arc<dyn ProviderFactory>,
    resolver: AddressResolver,
    device_secret: Vec<u8>,
    in_flight: AtomicBool,
}

impl RotationCoordinator {
    /// Creates a coordinator over the injected collaborators.
    ///
    /// `device_secret` keys the cached-pin encryption; it must be
    /// stable across restarts of the same installation.
    pub fn new(
        directory: Arc<dyn WalletDirectory>,
        kv: Arc<dyn SecureKv>,
        pin_vault: Arc<dyn PinVault>,
        factory: Arc<dyn ProviderFactory>,
        device_secret: &[u8],
    ) -> Self {
        let resolver = AddressResolver::new(directory.clone());
        Self {
            directory,
            kv,
            pin_vault,
            factory,
            resolver,
            device_secret: device_secret.to_vec(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether an interrupted rotation is recorded and recovery must
    /// run before any other credential operation.
    pub fn has_pending_rotation(&self) -> Result<bool> {
        RotationLedger::new(self.kv.as_ref()).has_pending_rotation()
    }

    /// Changes the application PIN across every wallet's provider.
    ///
    /// Strictly sequential over the directory snapshot; only one
    /// attempt may be in flight per session — a concurrent call fails
    /// with [`HaqqCoreError::RotationInProgress`]. A pending
    /// interrupted attempt is recovered first; the new attempt
    /// proceeds only if that recovery fully rolled back.
    pub fn change_pin(&self, new_pin: &str) -> Result<RotationOutcome> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let ledger = RotationLedger::new(self.kv.as_ref());
        let pin_cache = CachedPinStore::new(self.kv.as_ref(), &self.device_secret)?;

        if ledger.has_pending_rotation()? {
            tracing::warn!("interrupted rotation recorded, recovering before new attempt");
            let recovered = self.run_rollback(&ledger, &pin_cache)?;
            if recovered == RotationOutcome::ManualRecoveryRequired {
                return Ok(recovered);
            }
        }

        let old_pin = self.pin_vault.current_pin()?;

        // Cache the new PIN before any provider is touched.
        pin_cache.save(new_pin)?;

        let session =
            RotationSession::begin(self.directory.get_all(), old_pin, new_pin.to_string());

        match self.run_forward(&session, &ledger) {
            Ok(()) => {
                self.pin_vault.set_pin(session.new_pin())?;
                ledger.clear_all()?;
                pin_cache.clear()?;
                tracing::info!(wallets = session.wallets().len(), "pin rotation committed");
                Ok(RotationOutcome::Committed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "pin rotation failed, rolling back");
                self.run_rollback(&ledger, &pin_cache)
            }
        }
    }

    /// Startup orphan recovery.
    ///
    /// If a prior attempt was interrupted (non-empty progress record),
    /// executes the rollback path; returns `None` when there is
    /// nothing pending.
    pub fn recover_pending(&self) -> Result<Option<RotationOutcome>> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let ledger = RotationLedger::new(self.kv.as_ref());
        if !ledger.has_pending_rotation()? {
            return Ok(None);
        }

        tracing::warn!("interrupted pin rotation found at startup, rolling back");
        let pin_cache = CachedPinStore::new(self.kv.as_ref(), &self.device_secret)?;
        self.run_rollback(&ledger, &pin_cache).map(Some)
    }

    // -- Forward pass -----------------------------------------------------

    /// Processes every not-yet-completed wallet, one at a time, in
    /// directory enumeration order. A wallet's update-plus-verify step
    /// is never interrupted partway.
    fn run_forward(&self, session: &RotationSession, ledger: &RotationLedger) -> Result<()> {
        for wallet in session.wallets() {
            if ledger.is_marked(&wallet.account_id)? {
                continue;
            }

            let Some(provider) = self.factory.build(wallet, session.old_pin()) else {
                tracing::debug!(
                    address = %wallet.address,
                    custody = %wallet.custody,
                    "custody kind not rotatable, skipping"
                );
                continue;
            };

            tracing::info!(address = %wallet.address, "updating provider pin");
            provider
                .update_pin(session.new_pin())
                .map_err(HaqqCoreError::from)?;

            // The provider is mutated now; record that before trusting
            // anything else, so a rollback covers this wallet even if
            // verification fails.
            ledger.mark(&wallet.account_id)?;

            // Integrity gate: the provider's success return is not
            // trusted on its own.
            self.verify_wallet(wallet, session.new_pin())?;

            tracing::info!(address = %wallet.address, "provider pin updated and verified");
        }
        Ok(())
    }

    /// Re-derives the wallet's account under `pin` and compares it,
    /// via the resolver, against the wallet's recorded address.
    fn verify_wallet(&self, wallet: &WalletRecord, pin: &str) -> Result<()> {
        let provider =
            self.factory
                .build(wallet, pin)
                .ok_or(HaqqCoreError::UnsupportedCustody {
                    kind: wallet.custody,
                })?;

        let info = provider.account_info(&wallet.verification_path())?;

        if !self.resolver.equals(&info.address, &wallet.address) {
            return Err(HaqqCoreError::VerificationMismatch {
                account_id: wallet.account_id.clone(),
            });
        }
        Ok(())
    }

    // -- Rollback pass ----------------------------------------------------

    /// Runs the compensating pass, mapping a partial rollback into the
    /// terminal [`RotationOutcome::ManualRecoveryRequired`] state.
    fn run_rollback(
        &self,
        ledger: &RotationLedger,
        pin_cache: &CachedPinStore,
    ) -> Result<RotationOutcome> {
        match self.try_rollback(ledger, pin_cache) {
            Ok(()) => Ok(RotationOutcome::RolledBack),
            Err(e @ HaqqCoreError::RollbackIncomplete { .. }) => {
                tracing::error!(error = %e, "rollback incomplete, manual recovery required");
                Ok(RotationOutcome::ManualRecoveryRequired)
            }
            Err(e) => Err(e),
        }
    }

    /// Replays the inverse PIN update over every recorded wallet.
    ///
    /// Each provider is authenticated with the cached new PIN — by the
    /// time rollback runs, every recorded provider is already on the
    /// new PIN. Entries are unmarked one by one as compensating steps
    /// verify, so an interrupted rollback retains exactly the
    /// unresolved accounts.
    fn try_rollback(&self, ledger: &RotationLedger, pin_cache: &CachedPinStore) -> Result<()> {
        let marked = ledger.marked()?;
        if marked.is_empty() {
            pin_cache.clear()?;
            tracing::info!("no provider was mutated, rotation rolled back clean");
            return Ok(());
        }

        let cached_pin = pin_cache.load()?.ok_or_else(|| {
            HaqqCoreError::RollbackIncomplete {
                account_id: marked[0].clone(),
                reason: "cached pin missing, cannot authenticate rollback".into(),
            }
        })?;

        let old_pin = self.pin_vault.current_pin()?;
        let wallets = self.directory.get_all();

        for account_id in &marked {
            let wallet = wallets
                .iter()
                .find(|w| &w.account_id == account_id)
                .ok_or_else(|| HaqqCoreError::RollbackIncomplete {
                    account_id: account_id.clone(),
                    reason: "marked wallet missing from directory".into(),
                })?;

            let provider = self.factory.build(wallet, &cached_pin).ok_or_else(|| {
                HaqqCoreError::RollbackIncomplete {
                    account_id: account_id.clone(),
                    reason: "no provider for marked wallet".into(),
                }
            })?;

            provider
                .update_pin(&old_pin)
                .map_err(|e| HaqqCoreError::RollbackIncomplete {
                    account_id: account_id.clone(),
                    reason: e.to_string(),
                })?;

            self.verify_wallet(wallet, &old_pin).map_err(|e| {
                HaqqCoreError::RollbackIncomplete {
                    account_id: account_id.clone(),
                    reason: e.to_string(),
                }
            })?;

            ledger.unmark(account_id)?;
            tracing::info!(account_id = %account_id, "provider restored to previous pin");
        }

        pin_cache.clear()?;
        tracing::info!(restored = marked.len(), "pin rotation rolled back");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// InFlightGuard
// ---------------------------------------------------------------------------

/// RAII guard enforcing one rotation attempt per device session.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| HaqqCoreError::RotationInProgress)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
