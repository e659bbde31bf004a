//! Crash-safe PIN rotation for the haqqcore wallet core.
//!
//! Each custody provider's PIN update is independently neither atomic
//! nor composable with the others — hardware providers can disconnect
//! mid-update, social-recovery providers depend on network
//! availability. The coordinator therefore implements an explicit saga
//! with compensating actions: the new PIN is durably cached before any
//! provider is touched, every forward step is verified and recorded,
//! and any failure replays inverse updates over exactly the recorded
//! steps.
//!
//! # Modules
//!
//! - [`session`] — the reified per-attempt state
//! - [`factory`] — provider-construction seam
//! - [`coordinator`] — the saga itself
//!
//! The central invariant: the system is never left, across a completed
//! recovery pass, with some wallets on the old PIN and others on the
//! new PIN without that fact being recorded and resolved before any
//! further credential operation proceeds.

pub mod coordinator;
pub mod factory;
pub mod session;

pub use coordinator::{RotationCoordinator, RotationOutcome};
pub use factory::{CustodyFactory, ProviderFactory};
pub use session::RotationSession;
