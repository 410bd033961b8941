//! Mosaic and namespace identifiers.
//!
//! Both are 64-bit values derived with SHA3-256 and distinguished by the
//! top bit: mosaic ids always have it clear, namespace ids always have it
//! set. Their textual form is 16 big-endian hex digits; on the wire they are
//! 8 little-endian bytes.

use once_cell::sync::Lazy;
use rand::RngCore;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::uint64::Uint64;
use crate::config::{MAX_NAMESPACE_DEPTH, MAX_NAMESPACE_NAME_LENGTH, NAMESPACE_ID_FLAG};
use crate::crypto::{sha3_256, PublicKey};
use crate::error::TransactionError;

static NAMESPACE_PART_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$"));

fn words_from_digest(digest: &[u8; 32]) -> (u32, u32) {
    let low = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let high = u32::from_le_bytes([digest[4], digest[5], digest[6], digest[7]]);
    (low, high)
}

// ---------------------------------------------------------------------------
// MosaicNonce
// ---------------------------------------------------------------------------

/// Four bytes mixed with the owner's key to derive a [`MosaicId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MosaicNonce([u8; 4]);

impl MosaicNonce {
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_le_bytes())
    }

    pub fn random() -> Self {
        let mut bytes = [0u8; 4];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn to_u32(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

// ---------------------------------------------------------------------------
// MosaicId
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MosaicId(Uint64);

impl MosaicId {
    pub const fn new(id: Uint64) -> Self {
        Self(id)
    }

    /// Derives the id a `nonce` and `owner` key produce on chain.
    pub fn from_nonce(nonce: MosaicNonce, owner: &PublicKey) -> Self {
        let mut input = Vec::with_capacity(4 + 32);
        input.extend_from_slice(nonce.as_bytes());
        input.extend_from_slice(owner.as_bytes());
        let (low, high) = words_from_digest(&sha3_256(&input));
        Self(Uint64::from_parts(low, high & !NAMESPACE_ID_FLAG))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        Ok(Self(Uint64::from_hex(hex_str)?))
    }

    pub fn id(&self) -> Uint64 {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Debug for MosaicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MosaicId({})", self.to_hex())
    }
}

impl fmt::Display for MosaicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// NamespaceId
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceId(Uint64);

impl NamespaceId {
    /// Parent of every root namespace.
    pub const ROOT_PARENT: NamespaceId = NamespaceId(Uint64::ZERO);

    pub const fn new(id: Uint64) -> Self {
        Self(id)
    }

    /// The id of the last part of a dotted path such as `"prx.xpx"`.
    pub fn from_name(name: &str) -> Result<Self, TransactionError> {
        let path = Self::path(name)?;
        path.last()
            .copied()
            .ok_or_else(|| TransactionError::InvalidName(name.to_string()))
    }

    /// One id per level of a dotted path, root first.
    pub fn path(name: &str) -> Result<Vec<Self>, TransactionError> {
        let parts: Vec<&str> = name.split('.').collect();
        if name.is_empty() || parts.len() > MAX_NAMESPACE_DEPTH {
            return Err(TransactionError::InvalidName(name.to_string()));
        }

        let mut ids = Vec::with_capacity(parts.len());
        let mut parent = Self::ROOT_PARENT;
        for part in parts {
            parent = Self::child(parent, part)?;
            ids.push(parent);
        }
        Ok(ids)
    }

    /// The id of `part` directly below `parent`.
    pub fn child(parent: NamespaceId, part: &str) -> Result<Self, TransactionError> {
        validate_part(part)?;
        let mut input = Vec::with_capacity(8 + part.len());
        input.extend_from_slice(&parent.0.low().to_le_bytes());
        input.extend_from_slice(&parent.0.high().to_le_bytes());
        input.extend_from_slice(part.as_bytes());
        let (low, high) = words_from_digest(&sha3_256(&input));
        Ok(Self(Uint64::from_parts(low, high | NAMESPACE_ID_FLAG)))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        Ok(Self(Uint64::from_hex(hex_str)?))
    }

    pub fn id(&self) -> Uint64 {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Debug for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamespaceId({})", self.to_hex())
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Checks a single namespace level: lowercase alphanumerics, `_` and `-`,
/// not starting with a separator, at most 64 bytes.
pub fn validate_part(part: &str) -> Result<(), TransactionError> {
    if part.len() > MAX_NAMESPACE_NAME_LENGTH
        || !super::pattern_matches(&NAMESPACE_PART_PATTERN, part)
    {
        return Err(TransactionError::InvalidName(part.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_namespace_ids() {
        assert_eq!(NamespaceId::from_name("nem").unwrap().to_hex(), "84B3552D375FFA4B");
        assert_eq!(NamespaceId::from_name("nem.xem").unwrap().to_hex(), "D525AD41D95FCF29");
        assert_eq!(NamespaceId::from_name("prx.xpx").unwrap().to_hex(), "BFFB42A19116BDF6");
    }

    #[test]
    fn path_lists_every_level() {
        let path = NamespaceId::path("prx.xpx").unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].to_hex(), "B16D77FD8B6FB3BE");
        assert_eq!(path[1], NamespaceId::child(path[0], "xpx").unwrap());
    }

    #[test]
    fn namespace_high_bit_always_set() {
        for name in ["a", "b.c", "z9-_.q.r"] {
            let id = NamespaceId::from_name(name).unwrap();
            assert_ne!(id.id().high() & NAMESPACE_ID_FLAG, 0, "{name}");
        }
    }

    #[test]
    fn invalid_names_rejected() {
        for name in ["", "Upper", "-lead", "a..b", "a.b.c.d", "sp ace"] {
            assert!(
                matches!(NamespaceId::from_name(name), Err(TransactionError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
        let long = "a".repeat(MAX_NAMESPACE_NAME_LENGTH + 1);
        assert!(NamespaceId::from_name(&long).is_err());
    }

    #[test]
    fn mosaic_id_from_nonce_vectors() {
        let zero_owner = PublicKey::from_bytes([0u8; 32]);
        let id = MosaicId::from_nonce(MosaicNonce::from_u32(0), &zero_owner);
        assert_eq!(id.to_hex(), "17F8A9ADC3462D37");

        let mut counting = [0u8; 32];
        for (i, b) in counting.iter_mut().enumerate() {
            *b = i as u8;
        }
        let id = MosaicId::from_nonce(MosaicNonce::from_u32(1), &PublicKey::from_bytes(counting));
        assert_eq!(id.to_hex(), "2FF4074F2176780F");
    }

    #[test]
    fn mosaic_high_bit_always_clear() {
        let owner = PublicKey::from_bytes([0xFF; 32]);
        for nonce in 0..32u32 {
            let id = MosaicId::from_nonce(MosaicNonce::from_u32(nonce), &owner);
            assert_eq!(id.id().high() & NAMESPACE_ID_FLAG, 0);
        }
    }

    #[test]
    fn nonce_is_little_endian() {
        assert_eq!(MosaicNonce::from_u32(1).as_bytes(), &[1, 0, 0, 0]);
        assert_eq!(MosaicNonce::from_bytes([1, 0, 0, 0]).to_u32(), 1);
    }

    #[test]
    fn hex_roundtrip() {
        let id = MosaicId::from_hex("0DC67FBE1CAD29E3").unwrap();
        assert_eq!(id.id().to_le_bytes(), [0xE3, 0x29, 0xAD, 0x1C, 0xBE, 0x7F, 0xC6, 0x0D]);
        assert_eq!(id.to_hex(), "0DC67FBE1CAD29E3");
    }
}
