//! # Hashing
//!
//! SHA3-256 is the only digest the wire format uses directly: transaction
//! hashes, mosaic and namespace id derivation. SHA3-512 and SHA-512 appear
//! only inside the signature schemes (see [`super::keys`]).

use sha3::{Digest, Sha3_256, Sha3_512};

/// SHA3-256 of `data`.
///
/// # Example
///
/// ```
/// use catapult_tx::crypto::sha3_256;
///
/// let digest = sha3_256(b"");
/// assert_eq!(digest[0], 0xA7);
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha3_256::digest(data));
    output
}

/// SHA3-256 over several slices fed in order, without concatenating them
/// first. The transaction hash is computed this way from four slices of
/// the payload.
pub fn sha3_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// SHA3-512 of `data`.
pub fn sha3_512(data: &[u8]) -> [u8; 64] {
    let mut output = [0u8; 64];
    output.copy_from_slice(&Sha3_512::digest(data));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha3_256_empty_vector() {
        assert_eq!(
            hex::encode(sha3_256(b"")),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn sha3_256_abc_vector() {
        assert_eq!(
            hex::encode(sha3_256(b"abc")),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn sha3_512_abc_vector() {
        assert_eq!(
            hex::encode(sha3_512(b"abc")),
            "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e\
             10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0"
        );
    }

    #[test]
    fn multi_matches_concatenation() {
        let whole = sha3_256(b"hello world");
        let parts = sha3_256_multi(&[b"hello", b" ", b"world"]);
        assert_eq!(whole, parts);
    }
}
