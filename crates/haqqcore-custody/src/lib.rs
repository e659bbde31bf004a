//! Credential providers for the haqqcore wallet core.
//!
//! A credential provider is the abstraction over how a wallet's key
//! material is protected: it can derive the wallet's account address
//! and re-wrap its key material under a new PIN. The PIN rotation
//! coordinator consumes providers solely through the
//! [`CredentialProvider`] contract; the per-kind implementations here
//! are the reference custody backends for the three PIN-rotatable
//! kinds (seed-phrase, hot-key, threshold/social-recovery).
//!
//! # Modules
//!
//! - [`provider`] — the [`CredentialProvider`] contract
//! - [`vault`] — the shared PIN-encrypted vault blob format
//! - [`mnemonic`] — BIP39 seed-phrase custody
//! - [`hot`] — single raw private key custody
//! - [`sss`] — two-share threshold custody (device + cloud share)
//! - [`factory`] — provider construction over the closed custody enum

pub mod factory;
pub mod hot;
pub mod mnemonic;
pub mod provider;
pub mod sss;
pub mod vault;

pub use factory::build_rotation_provider;
pub use provider::CredentialProvider;
