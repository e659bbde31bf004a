//! Durable bookkeeping for the haqqcore wallet core.
//!
//! The host is expected to provide a secure key/value capability (the
//! [`haqqcore_types::SecureKv`] contract); everything in this crate is
//! layered over it. The Progress Ledger and Cached-Pin Store are the
//! crash-safety backbone of PIN rotation: together they make an
//! interrupted attempt detectable and reversible at next start.
//!
//! # Modules
//!
//! - [`kv`] — in-memory [`MemoryKv`] for tests and platform-store hosts
//! - [`encrypted_kv`] — sled-backed encrypted reference store
//! - [`ledger`] — per-wallet rotation progress
//! - [`pin_cache`] — the encrypted pending-PIN value

pub mod encrypted_kv;
pub mod kv;
pub mod ledger;
pub mod pin_cache;

pub use encrypted_kv::EncryptedKv;
pub use kv::MemoryKv;
pub use ledger::RotationLedger;
pub use pin_cache::CachedPinStore;
