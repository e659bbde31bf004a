//! Total, directory-aware address conversion and comparison.
//!
//! [`AddressResolver`] is the public surface of this crate. Every
//! operation is total: conversion failure is never thrown past this
//! boundary — malformed input degrades to a best-effort passthrough
//! plus one diagnostic log entry, because address formatting underlies
//! pervasive display logic that must never crash.
//!
//! Conversions into Tron and Haqq space consult the Wallet Directory
//! before computing: Tron key derivation for some wallets predates a
//! migration and cannot be reconstructed from the Ethereum-hex form
//! alone, so the provider-stored per-format address is authoritative
//! whenever the input resolves to a known wallet.

use std::sync::Arc;

use haqqcore_types::{AddressKind, WalletDirectory, WalletRecord};

use crate::{cosmos, eth, tron};

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Ordered classification chain: the first decoder that accepts the
/// input wins. Tron is checked first, then the two bech32 namespaces,
/// then Ethereum hex, so a value that is ambiguously valid in two
/// formats is never silently misclassified.
const CLASSIFIERS: &[(AddressKind, fn(&str) -> bool)] = &[
    (AddressKind::TronBase58, tron::is_tron_address),
    (AddressKind::ValidatorBech32, cosmos::is_validator_address),
    (AddressKind::CosmosBech32, cosmos::is_account_address),
    (AddressKind::EthereumHex, eth::is_hex_address),
];

/// Classifies an address string into its encoding namespace.
///
/// Pure and total; anything no decoder accepts is
/// [`AddressKind::Invalid`].
pub fn classify(address: &str) -> AddressKind {
    for (kind, predicate) in CLASSIFIERS {
        if predicate(address) {
            return *kind;
        }
    }
    AddressKind::Invalid
}

// ---------------------------------------------------------------------------
// AddressResolver
// ---------------------------------------------------------------------------

/// Converts and compares wallet identities across encodings.
///
/// Holds a read-only handle to the Wallet Directory for the
/// per-format fallback lookups; directory reads are side-effect-free
/// and require no locking.
pub struct AddressResolver {
    directory: Arc<dyn WalletDirectory>,
}

impl AddressResolver {
    /// Creates a resolver over the given wallet directory.
    pub fn new(directory: Arc<dyn WalletDirectory>) -> Self {
        Self { directory }
    }

    /// Converts any recognized address form to the canonical
    /// lower-case Ethereum-hex form.
    ///
    /// Validator addresses are a distinct namespace and pass through
    /// (lower-cased) unchanged. Unrecognized input passes through
    /// unchanged with a diagnostic log entry.
    pub fn to_eth(&self, address: &str) -> String {
        match classify(address) {
            AddressKind::EthereumHex => address.to_ascii_lowercase(),
            AddressKind::ValidatorBech32 => address.to_ascii_lowercase(),
            AddressKind::TronBase58 => {
                if let Some(wallet) = self.resolve_wallet(address) {
                    return wallet.address;
                }
                match tron::decode(address) {
                    Ok(body) => eth::encode_lower(&body),
                    Err(_) => self.degrade("to_eth", address),
                }
            }
            AddressKind::CosmosBech32 => match cosmos::decode(address) {
                Ok(body) => eth::encode_lower(&body),
                Err(_) => self.degrade("to_eth", address),
            },
            AddressKind::Invalid => self.degrade("to_eth", address),
        }
    }

    /// Converts any recognized address form to the `haqq1…` bech32 form.
    ///
    /// If the input resolves to a known wallet, the directory-stored
    /// `cosmos_address` is returned instead of a freshly computed one.
    pub fn to_haqq(&self, address: &str) -> String {
        if let Some(wallet) = self.resolve_wallet(address) {
            return wallet.cosmos_address;
        }
        match classify(address) {
            AddressKind::CosmosBech32 => address.to_ascii_lowercase(),
            AddressKind::ValidatorBech32 => address.to_ascii_lowercase(),
            AddressKind::EthereumHex => {
                match eth::decode(address).and_then(|body| cosmos::encode(&body)) {
                    Ok(encoded) => encoded,
                    Err(_) => self.degrade("to_haqq", address),
                }
            }
            AddressKind::TronBase58 => {
                match tron::decode(address).and_then(|body| cosmos::encode(&body)) {
                    Ok(encoded) => encoded,
                    Err(_) => self.degrade("to_haqq", address),
                }
            }
            AddressKind::Invalid => self.degrade("to_haqq", address),
        }
    }

    /// Converts any recognized address form to the Tron base58 form.
    ///
    /// Directory precedence is load-bearing here: a known wallet's
    /// stored `tron_address` wins over computation, and a known wallet
    /// without a stored Tron form falls back to computing from its
    /// canonical address.
    pub fn to_tron(&self, address: &str) -> String {
        if let Some(wallet) = self.resolve_wallet(address) {
            if let Some(tron_address) = wallet.tron_address {
                return tron_address;
            }
            if let Ok(body) = eth::decode(&wallet.address) {
                return tron::encode(&body);
            }
        }
        match classify(address) {
            AddressKind::TronBase58 => address.to_string(),
            AddressKind::EthereumHex => match eth::decode(address) {
                Ok(body) => tron::encode(&body),
                Err(_) => self.degrade("to_tron", address),
            },
            AddressKind::CosmosBech32 => match cosmos::decode(address) {
                Ok(body) => tron::encode(&body),
                Err(_) => self.degrade("to_tron", address),
            },
            AddressKind::ValidatorBech32 => self.degrade("to_tron", address),
            AddressKind::Invalid => self.degrade("to_tron", address),
        }
    }

    /// Compares two addresses for identity of the underlying key.
    ///
    /// If either input classifies as Tron, the comparison happens in
    /// Tron space (directory-aware, so legacy wallets compare by their
    /// stored form); otherwise both sides are compared in canonical
    /// Ethereum-hex form. Reflexive and symmetric by construction.
    pub fn equals(&self, a: &str, b: &str) -> bool {
        let tron_space = classify(a) == AddressKind::TronBase58
            || classify(b) == AddressKind::TronBase58;
        if tron_space {
            self.to_tron(a) == self.to_tron(b)
        } else {
            self.to_eth(a) == self.to_eth(b)
        }
    }

    /// Reverse lookup: finds the wallet record matching `address`.
    ///
    /// Tries hex-equality, bech32-equality, or raw Tron-equality
    /// depending on the input's classified kind. Validator and invalid
    /// inputs resolve to nothing.
    pub fn resolve_wallet(&self, address: &str) -> Option<WalletRecord> {
        let kind = classify(address);
        self.directory.get_all().into_iter().find(|wallet| match kind {
            AddressKind::EthereumHex => wallet.address.eq_ignore_ascii_case(address),
            AddressKind::CosmosBech32 => wallet.cosmos_address.eq_ignore_ascii_case(address),
            AddressKind::TronBase58 => {
                wallet.tron_address.as_deref() == Some(address)
            }
            AddressKind::ValidatorBech32 | AddressKind::Invalid => false,
        })
    }

    /// Passthrough for input that cannot be converted. Logged, never
    /// propagated: this sits on UI hot paths.
    fn degrade(&self, op: &str, address: &str) -> String {
        tracing::warn!(%address, op, "address conversion degraded to passthrough");
        address.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
