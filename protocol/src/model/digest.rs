//! Fixed 32-byte digests carried inside transactions: lock hashes, secrets,
//! contract hashes and parent hashes of cosignatures.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::HASH_LENGTH;
use crate::error::TransactionError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash256([u8; HASH_LENGTH]);

impl Hash256 {
    pub const fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        super::decode_fixed_hex::<HASH_LENGTH>("hash", hex_str).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl TryFrom<String> for Hash256 {
    type Error = TransactionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Hash256> for String {
    fn from(hash: Hash256) -> Self {
        hash.to_hex()
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
