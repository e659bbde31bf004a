//! Keccak-256 and SHA-256 hashing.
//!
//! Keccak-256 (the pre-NIST variant, as used by Ethereum) backs
//! address derivation and EIP-55 checksums. Double-SHA-256 backs the
//! Tron base58check address checksum.

use sha2::{Digest as Sha2Digest, Sha256};
use sha3::{Digest as Sha3Digest, Keccak256};

/// Computes the Keccak-256 hash of arbitrary data.
///
/// Returns a fixed 32-byte digest. Deterministic: identical inputs
/// always produce identical outputs.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

/// Computes the SHA-256 hash of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

/// Computes `SHA-256(SHA-256(data))`.
///
/// Used for base58check checksums: the first four bytes of the double
/// digest are appended to the payload before base58 encoding.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_empty_input() {
        // Keccak-256 of the empty string, as fixed by the Ethereum yellow paper.
        let digest = keccak256(b"");
        assert_eq!(
            hex::encode(digest),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn sha256_abc_vector() {
        // FIPS 180-2 test vector.
        let digest = sha256(b"abc");
        assert_eq!(
            hex::encode(digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256d_is_double_application() {
        let once = sha256(b"haqq");
        assert_eq!(sha256d(b"haqq"), sha256(&once));
    }

    #[test]
    fn deterministic() {
        assert_eq!(keccak256(b"wallet"), keccak256(b"wallet"));
        assert_ne!(keccak256(b"wallet"), keccak256(b"Wallet"));
    }
}
