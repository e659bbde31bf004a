//! Address-space resolver for the haqqcore wallet core.
//!
//! Wallet identities appear in three incompatible encodings — Ethereum
//! `0x`-hex, Tron base58check, and Cosmos/Haqq bech32 — plus the
//! validator bech32 namespace. This crate converts and compares across
//! all of them without requiring the caller to know the originating
//! format.
//!
//! # Modules
//!
//! - [`eth`] — Ethereum hex decoding, canonical form, EIP-55 rendering
//! - [`tron`] — Tron base58check encoding/decoding
//! - [`cosmos`] — Haqq account and validator bech32 encoding/decoding
//! - [`resolver`] — the total, directory-aware [`AddressResolver`]
//!
//! The codec modules expose fallible primitives; only the resolver's
//! public operations are total (they degrade to passthrough and log
//! instead of failing, because address formatting sits on UI hot paths
//! that must not crash on malformed data).

pub mod cosmos;
pub mod eth;
pub mod resolver;
pub mod tron;

pub use resolver::{classify, AddressResolver};
