//! Core shared types for the haqqcore wallet core.
//!
//! This crate defines the data model and the collaborator contracts
//! consumed across the workspace. No other crate should define shared
//! types — everything lives here.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// HD path constants
// ---------------------------------------------------------------------------

/// SLIP-44 coin type segment for Ethereum-space derivation paths.
pub const ETH_COIN_TYPE: &str = "60'";

/// SLIP-44 coin type segment for Tron-space derivation paths.
pub const TRON_COIN_TYPE: &str = "195'";

// ---------------------------------------------------------------------------
// AddressKind
// ---------------------------------------------------------------------------

/// Classified encoding of a wallet address string.
///
/// Classification is an ordered chain of decoders (Tron first, then
/// validator bech32, then haqq bech32, then Ethereum hex); the first
/// successful decode wins. Anything that decodes in no namespace is
/// [`AddressKind::Invalid`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    /// `0x`-prefixed 20-byte hex address (the canonical comparison form).
    EthereumHex,
    /// Base58check Tron address with the `0x41` network prefix.
    TronBase58,
    /// Bech32 address with the `haqq` human-readable part.
    CosmosBech32,
    /// Bech32 address with the `haqqvaloper` human-readable part.
    ///
    /// Validator addresses are a distinct namespace: they are never
    /// convertible to a spendable address form.
    ValidatorBech32,
    /// Decodes in no known namespace.
    Invalid,
}

impl AddressKind {
    /// Returns `true` for every kind except [`AddressKind::Invalid`].
    pub fn is_valid(self) -> bool {
        self != Self::Invalid
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EthereumHex => write!(f, "ethereum-hex"),
            Self::TronBase58 => write!(f, "tron-base58"),
            Self::CosmosBech32 => write!(f, "cosmos-bech32"),
            Self::ValidatorBech32 => write!(f, "validator-bech32"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

// ---------------------------------------------------------------------------
// CustodyKind
// ---------------------------------------------------------------------------

/// How a wallet's private key material is protected and used.
///
/// A closed enumeration: the credential-provider factory dispatches on
/// it, and it determines whether the wallet participates in PIN
/// rotation at all.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CustodyKind {
    /// BIP39 seed phrase held on-device, encrypted under the app PIN.
    Mnemonic,
    /// Single raw private key held on-device, encrypted under the app PIN.
    Hot,
    /// Threshold/social-recovery custody: a device share (PIN-encrypted)
    /// combined with a remotely held share.
    Sss,
    /// Hardware wallet over Bluetooth LE.
    LedgerBle,
    /// Air-gapped hardware wallet driven over QR codes.
    KeystoneQr,
    /// Address-only wallet with no key material.
    WatchOnly,
}

impl CustodyKind {
    /// Whether this custody kind participates in app-PIN rotation.
    ///
    /// Hardware kinds keep key material behind the device's own PIN,
    /// and watch-only wallets hold no key material, so neither is a
    /// rotation target.
    pub fn supports_pin_rotation(self) -> bool {
        matches!(self, Self::Mnemonic | Self::Hot | Self::Sss)
    }
}

impl fmt::Display for CustodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mnemonic => write!(f, "mnemonic"),
            Self::Hot => write!(f, "hot"),
            Self::Sss => write!(f, "sss"),
            Self::LedgerBle => write!(f, "ledger-ble"),
            Self::KeystoneQr => write!(f, "keystone-qr"),
            Self::WatchOnly => write!(f, "watch-only"),
        }
    }
}

// ---------------------------------------------------------------------------
// WalletRecord
// ---------------------------------------------------------------------------

/// One entry of the Wallet Directory.
///
/// # Invariants
///
/// - `address` is the canonical lower-case `0x`-hex form and the
///   system-wide comparison key.
/// - For wallets not imported as watch-only or raw-Tron, all address
///   fields resolve to the same key material. Legacy/imported wallets
///   may violate this for `tron_address`; such violations are resolved
///   via directory lookup, never pure computation.
/// - `tron_address` is `None` for wallets created before the Tron
///   migration: their Tron form cannot be reconstructed from the hex
///   form and must come from the provider when it is re-derived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
    /// Canonical lower-case Ethereum-hex address.
    pub address: String,
    /// Bech32 `haqq1…` form of the same key.
    pub cosmos_address: String,
    /// Provider-stored Tron base58 form, if one was ever derived.
    pub tron_address: Option<String>,
    /// Identifier of the key-custody account backing this wallet.
    pub account_id: String,
    /// BIP-44 derivation path of the wallet's account.
    pub hd_path: String,
    /// Custody kind; selects the credential-provider implementation.
    pub custody: CustodyKind,
    /// User-visible wallet name.
    pub name: String,
    /// Whether the wallet is hidden from the main list.
    pub is_hidden: bool,
}

impl WalletRecord {
    /// Returns the derivation path used for address verification.
    ///
    /// Verification always re-derives in Ethereum space: a Tron-space
    /// path has its coin type rewritten to the Ethereum coin type so
    /// the derived address is comparable with [`WalletRecord::address`].
    pub fn verification_path(&self) -> String {
        self.hd_path.replace(TRON_COIN_TYPE, ETH_COIN_TYPE)
    }
}

// ---------------------------------------------------------------------------
// AccountInfo
// ---------------------------------------------------------------------------

/// Result of a credential provider's account derivation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// The derived address, in the provider's native (Ethereum-hex) form.
    pub address: String,
}

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Failure taxonomy of the credential-provider contract.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transient transport failure (hardware disconnected, share
    /// service unreachable). Forward progress is safe to resume from
    /// recorded state on retry.
    #[error("provider unavailable: {reason}")]
    Unavailable {
        /// Human-readable description of the transport failure.
        reason: String,
    },

    /// The supplied PIN does not authenticate the stored key material.
    #[error("incorrect pin")]
    IncorrectPin,

    /// Internal provider failure (corrupt vault, derivation error).
    #[error("provider error: {reason}")]
    Internal {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl ProviderError {
    /// Whether the failure is transient and forward progress may be
    /// retried from recorded state.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

// ---------------------------------------------------------------------------
// HaqqCoreError
// ---------------------------------------------------------------------------

/// Central error type for the haqqcore workspace.
///
/// All crates convert their internal errors into variants of this
/// enum, ensuring a unified error handling surface.
#[derive(Debug, Error)]
pub enum HaqqCoreError {
    /// The provided address is malformed or fails checksum validation.
    #[error("invalid address: {reason}")]
    InvalidAddress {
        /// Human-readable description of why the address is invalid.
        reason: String,
    },

    /// A cryptographic operation failed (KDF, AEAD, derivation).
    #[error("crypto error: {reason}")]
    CryptoError {
        /// Human-readable description of the cryptographic failure.
        reason: String,
    },

    /// A secure-store read or write failed.
    #[error("storage error: {reason}")]
    StorageError {
        /// Human-readable description of the storage failure.
        reason: String,
    },

    /// A configuration value is invalid or missing.
    #[error("config error: {reason}")]
    ConfigError {
        /// Human-readable description of the configuration problem.
        reason: String,
    },

    /// A credential provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A provider reported success but the re-derived address does not
    /// match the wallet's recorded address.
    #[error("verification mismatch for account {account_id}")]
    VerificationMismatch {
        /// Account whose derived address failed the integrity gate.
        account_id: String,
    },

    /// A rotation attempt is already in flight for this session.
    #[error("a pin rotation is already in progress")]
    RotationInProgress,

    /// Rollback itself failed partway; manual recovery is required.
    #[error("rollback incomplete at account {account_id}: {reason}")]
    RollbackIncomplete {
        /// First account the rollback could not restore.
        account_id: String,
        /// Human-readable description of the rollback failure.
        reason: String,
    },

    /// The custody kind has no credential-provider implementation for
    /// the requested operation.
    #[error("unsupported custody kind: {kind}")]
    UnsupportedCustody {
        /// The offending custody kind.
        kind: CustodyKind,
    },
}

/// Convenience result type using [`HaqqCoreError`].
pub type Result<T> = std::result::Result<T, HaqqCoreError>;

// ---------------------------------------------------------------------------
// Collaborator contracts
// ---------------------------------------------------------------------------

/// Read-only enumeration of known wallets.
///
/// Consumed both as the rotation target list and as the resolver's
/// fallback source for per-format addresses. Enumeration order is
/// stable and defines rotation (and rollback) order.
pub trait WalletDirectory: Send + Sync {
    /// Returns every known wallet, in stable enumeration order.
    fn get_all(&self) -> Vec<WalletRecord>;
}

/// Secure durable key/value capability provided by the host.
///
/// Assumed durable across process restarts (not necessarily across
/// reinstall). Backs the Progress Ledger, the Cached-Pin Store, and
/// the reference credential-provider vaults.
pub trait SecureKv: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// The application's PIN of record.
///
/// Supplies the current PIN for authenticating provider calls before
/// rotation begins, and accepts the new PIN at commit.
pub trait PinVault: Send + Sync {
    /// Returns the current application PIN.
    fn current_pin(&self) -> Result<String>;
    /// Persists `pin` as the new application PIN of record.
    fn set_pin(&self, pin: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custody_kind_rotation_support() {
        assert!(CustodyKind::Mnemonic.supports_pin_rotation());
        assert!(CustodyKind::Hot.supports_pin_rotation());
        assert!(CustodyKind::Sss.supports_pin_rotation());
        assert!(!CustodyKind::LedgerBle.supports_pin_rotation());
        assert!(!CustodyKind::KeystoneQr.supports_pin_rotation());
        assert!(!CustodyKind::WatchOnly.supports_pin_rotation());
    }

    #[test]
    fn custody_kind_display() {
        assert_eq!(CustodyKind::Mnemonic.to_string(), "mnemonic");
        assert_eq!(CustodyKind::LedgerBle.to_string(), "ledger-ble");
        assert_eq!(CustodyKind::WatchOnly.to_string(), "watch-only");
    }

    #[test]
    fn address_kind_validity() {
        assert!(AddressKind::EthereumHex.is_valid());
        assert!(AddressKind::ValidatorBech32.is_valid());
        assert!(!AddressKind::Invalid.is_valid());
    }

    #[test]
    fn verification_path_rewrites_tron_coin_type() {
        let record = WalletRecord {
            address: "0x0000000000000000000000000000000000000001".into(),
            cosmos_address: "haqq1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqpqzsr2cr".into(),
            tron_address: None,
            account_id: "acc-1".into(),
            hd_path: "m/44'/195'/0'/0/0".into(),
            custody: CustodyKind::Mnemonic,
            name: "Main".into(),
            is_hidden: false,
        };
        assert_eq!(record.verification_path(), "m/44'/60'/0'/0/0");
    }

    #[test]
    fn verification_path_leaves_eth_paths_alone() {
        let record = WalletRecord {
            address: "0x0000000000000000000000000000000000000001".into(),
            cosmos_address: "haqq1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqpqzsr2cr".into(),
            tron_address: None,
            account_id: "acc-1".into(),
            hd_path: "m/44'/60'/0'/0/0".into(),
            custody: CustodyKind::Hot,
            name: "Hot".into(),
            is_hidden: false,
        };
        assert_eq!(record.verification_path(), record.hd_path);
    }

    #[test]
    fn wallet_record_serde_roundtrip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = WalletRecord {
            address: "0xabc0000000000000000000000000000000000123".into(),
            cosmos_address: "haqq1...".into(),
            tron_address: Some("TJRabPrwbZy45sbavfcjinPJC18kjpRTv8".into()),
            account_id: "acc-7".into(),
            hd_path: "m/44'/60'/0'/0/0".into(),
            custody: CustodyKind::Sss,
            name: "Savings".into(),
            is_hidden: true,
        };
        let json = serde_json::to_string(&record)?;
        let parsed: WalletRecord = serde_json::from_str(&json)?;
        assert_eq!(record, parsed);
        Ok(())
    }

    #[test]
    fn provider_error_transience() {
        assert!(ProviderError::Unavailable { reason: "ble lost".into() }.is_transient());
        assert!(!ProviderError::IncorrectPin.is_transient());
        assert!(!ProviderError::Internal { reason: "corrupt".into() }.is_transient());
    }

    #[test]
    fn error_display() {
        let err = HaqqCoreError::VerificationMismatch {
            account_id: "acc-3".into(),
        };
        assert!(err.to_string().contains("acc-3"));

        let err = HaqqCoreError::Provider(ProviderError::IncorrectPin);
        assert_eq!(err.to_string(), "incorrect pin");
    }
}
