//! BIP-32 secp256k1 hierarchical deterministic key derivation.
//!
//! Derives Ethereum-space signing keys from a BIP39 seed along
//! BIP-44 paths, supporting both hardened and non-hardened child
//! derivation:
//!
//! ```text
//! m/44'/60'/0'/0/0
//! ```
//!
//! Child keys are produced per BIP-32: hardened children commit to the
//! parent private key, normal children to the compressed parent public
//! key; in both cases the child private key is
//! `parse256(IL) + parent (mod n)`.
//!
//! Reference: <https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki>

use haqqcore_types::{HaqqCoreError, Result};
use hmac::{Hmac, Mac};
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::ops::Reduce;
use k256::{Scalar, U256};
use sha2::Sha512;
use zeroize::Zeroize;

use crate::hash::keccak256;
use crate::mnemonic::Seed;

/// HMAC-SHA512 type alias used throughout BIP-32.
type HmacSha512 = Hmac<Sha512>;

/// The hardened index offset (0x80000000) per BIP-32.
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for master key generation per BIP-32 §Master key generation.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derives a secp256k1 signing key from a BIP39 seed along `path`.
///
/// # Parameters
///
/// - `seed` — 64-byte BIP39 seed (from [`crate::mnemonic::mnemonic_to_seed`]).
/// - `path` — BIP-32 path starting with `m/`; hardened indices carry a
///   trailing `'` (e.g. `m/44'/60'/0'/0/0`).
///
/// # Errors
///
/// - [`HaqqCoreError::ConfigError`] if the path is malformed.
/// - [`HaqqCoreError::CryptoError`] if a derived key falls outside the
///   curve order (probability ≈ 2⁻¹²⁸, but checked rather than assumed).
pub fn derive_eth_key(seed: &Seed, path: &str) -> Result<SigningKey> {
    let indices = parse_derivation_path(path)?;

    let (mut key, mut chain_code) = master_key_from_seed(seed.as_bytes())?;

    for &(index, hardened) in &indices {
        let (child_key, child_chain) = derive_child(&key, &chain_code, index, hardened)?;
        key.zeroize();
        chain_code.zeroize();
        key = child_key;
        chain_code = child_chain;
    }

    let signing_key = SigningKey::from_slice(&key).map_err(|e| HaqqCoreError::CryptoError {
        reason: format!("derived key is not a valid secp256k1 scalar: {e}"),
    });

    key.zeroize();
    chain_code.zeroize();

    signing_key
}

/// Derives a signing key directly from raw 32-byte private key material.
///
/// Used for hot-key custody, where no derivation path applies.
///
/// # Errors
///
/// Returns [`HaqqCoreError::CryptoError`] if the bytes are not a valid
/// non-zero secp256k1 scalar.
pub fn signing_key_from_bytes(bytes: &[u8]) -> Result<SigningKey> {
    SigningKey::from_slice(bytes).map_err(|e| HaqqCoreError::CryptoError {
        reason: format!("invalid secp256k1 private key: {e}"),
    })
}

/// Computes the 20-byte Ethereum address of a signing key.
///
/// `address = keccak256(uncompressed_pubkey[1..])[12..]` — the last 20
/// bytes of the Keccak-256 digest of the 64-byte public key body.
pub fn eth_address_bytes(key: &SigningKey) -> [u8; 20] {
    let encoded = key.verifying_key().to_encoded_point(false);
    // Skip the 0x04 SEC1 tag byte.
    let digest = keccak256(&encoded.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    out
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

/// Generates the master key and chain code from a seed.
///
/// `HMAC-SHA512(key="Bitcoin seed", data=seed)`: left 32 bytes are the
/// master private key, right 32 bytes the master chain code.
fn master_key_from_seed(seed: &[u8; 64]) -> Result<([u8; 32], [u8; 32])> {
    let mut mac =
        HmacSha512::new_from_slice(MASTER_HMAC_KEY).map_err(|e| HaqqCoreError::CryptoError {
            reason: format!("HMAC-SHA512 init failed: {e}"),
        })?;
    mac.update(seed);
    let result = mac.finalize().into_bytes();

    let mut key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    key.copy_from_slice(&result[..32]);
    chain_code.copy_from_slice(&result[32..]);
    Ok((key, chain_code))
}

/// Derives one child key per BIP-32.
///
/// Hardened: `HMAC-SHA512(chain, 0x00 ‖ parent_key ‖ ser32(i + 2³¹))`.
/// Normal:   `HMAC-SHA512(chain, serP(parent_pub) ‖ ser32(i))`.
/// Child private key = `parse256(IL) + parent (mod n)`.
fn derive_child(
    parent_key: &[u8; 32],
    chain_code: &[u8; 32],
    index: u32,
    hardened: bool,
) -> Result<([u8; 32], [u8; 32])> {
    let child_index = if hardened {
        index | HARDENED_OFFSET
    } else {
        index
    };

    let mut mac =
        HmacSha512::new_from_slice(chain_code).map_err(|e| HaqqCoreError::CryptoError {
            reason: format!("HMAC-SHA512 init failed: {e}"),
        })?;

    if hardened {
        mac.update(&[0u8]);
        mac.update(parent_key);
    } else {
        let parent = SigningKey::from_slice(parent_key).map_err(|e| {
            HaqqCoreError::CryptoError {
                reason: format!("invalid parent key: {e}"),
            }
        })?;
        let compressed = parent.verifying_key().to_encoded_point(true);
        mac.update(compressed.as_bytes());
    }
    mac.update(&child_index.to_be_bytes());

    let result = mac.finalize().into_bytes();
    let il = &result[..32];
    let ir = &result[32..];

    // child = parse256(IL) + parent (mod n)
    let parent_scalar: Scalar = <Scalar as Reduce<U256>>::reduce(U256::from_be_slice(parent_key));
    let il_scalar: Scalar = <Scalar as Reduce<U256>>::reduce(U256::from_be_slice(il));
    let child_scalar = parent_scalar + il_scalar;

    let mut child_key = [0u8; 32];
    child_key.copy_from_slice(&child_scalar.to_bytes());

    let mut child_chain = [0u8; 32];
    child_chain.copy_from_slice(ir);

    Ok((child_key, child_chain))
}

/// Parses a BIP-32 derivation path into `(index, hardened)` pairs.
///
/// # Errors
///
/// Returns [`HaqqCoreError::ConfigError`] if the path does not start
/// with `m`, contains a non-numeric segment, or an index ≥ 2³¹.
fn parse_derivation_path(path: &str) -> Result<Vec<(u32, bool)>> {
    let mut segments = path.split('/');

    if segments.next() != Some("m") {
        return Err(HaqqCoreError::ConfigError {
            reason: format!("derivation path must start with 'm/': {path}"),
        });
    }

    let mut indices = Vec::new();
    for segment in segments {
        let (digits, hardened) = match segment.strip_suffix('\'') {
            Some(rest) => (rest, true),
            None => (segment, false),
        };
        let index: u32 = digits.parse().map_err(|_| HaqqCoreError::ConfigError {
            reason: format!("invalid path segment '{segment}' in {path}"),
        })?;
        if index >= HARDENED_OFFSET {
            return Err(HaqqCoreError::ConfigError {
                reason: format!("index {index} out of range in {path}"),
            });
        }
        indices.push((index, hardened));
    }

    Ok(indices)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
