//! Cryptographic primitives for the haqqcore wallet core.
//!
//! This crate is the **sole** location for all cryptographic
//! operations. No other crate in the workspace may perform raw crypto
//! directly.
//!
//! # Modules
//!
//! - [`hash`] — Keccak-256, SHA-256, and double-SHA-256 digests
//! - [`kdf`] — Argon2id key derivation for PIN-encrypted vaults
//! - [`aead`] — XChaCha20-Poly1305 authenticated encryption/decryption
//! - [`mac`] — HMAC-SHA256 computation and verification
//! - [`hkdf`] — HKDF-SHA256 key expansion
//! - [`mnemonic`] — BIP39 mnemonic validation and seed derivation
//! - [`hd_derive`] — BIP-32 secp256k1 hierarchical key derivation

pub mod aead;
pub mod hash;
pub mod hd_derive;
pub mod hkdf;
pub mod kdf;
pub mod mac;
pub mod mnemonic;
