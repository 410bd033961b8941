//! Addresses and recipients.
//!
//! A decoded address is 25 bytes whose first byte is the network byte.
//! Users see it as 40 characters of RFC 4648 base32 (`VATNE7...`); the
//! hex form is also accepted. Wherever a recipient is expected the network also accepts a namespace
//! alias, encoded in the same 25 bytes as `0x91 ++ namespace id (LE) ++
//! zero padding`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::NamespaceId;
use super::network::NetworkType;
use crate::error::TransactionError;

/// Length of a decoded address.
pub const ADDRESS_LENGTH: usize = 25;

/// First byte of a recipient that is a namespace alias.
pub const ALIAS_MARKER: u8 = 0x91;

/// Length of the base32 form.
pub const ADDRESS_BASE32_LENGTH: usize = 40;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Sixteen hex digits: a namespace id, not an address.
static ALIAS_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{16}$"));

/// A decoded 25-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses the 50-character hex form. Dashes used for readability are
    /// ignored.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let cleaned: String = hex_str.chars().filter(|c| *c != '-').collect();
        let bytes = super::decode_fixed_hex::<ADDRESS_LENGTH>("address", &cleaned)?;
        Ok(Self(bytes))
    }

    /// Parses the 40-character base32 form, case-insensitively. Dashes
    /// are ignored.
    pub fn from_base32(encoded: &str) -> Result<Self, TransactionError> {
        let cleaned: Vec<u8> = encoded
            .bytes()
            .filter(|c| *c != b'-')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if cleaned.len() != ADDRESS_BASE32_LENGTH {
            return Err(TransactionError::InvalidLength {
                field: "address",
                expected: ADDRESS_BASE32_LENGTH,
                actual: cleaned.len(),
            });
        }

        let mut out = [0u8; ADDRESS_LENGTH];
        let (mut acc, mut bits, mut pos) = (0u32, 0u32, 0usize);
        for c in cleaned {
            let value = BASE32_ALPHABET
                .iter()
                .position(|a| *a == c)
                .ok_or_else(|| {
                    TransactionError::InvalidAddress(format!(
                        "invalid base32 character `{}`",
                        char::from(c)
                    ))
                })?;
            acc = ((acc << 5) | value as u32) & 0xFFFF;
            bits += 5;
            if bits >= 8 {
                bits -= 8;
                out[pos] = (acc >> bits) as u8;
                pos += 1;
            }
        }
        Ok(Self(out))
    }

    /// Either textual form: 40 characters of base32 or 50 of hex.
    pub fn parse(input: &str) -> Result<Self, TransactionError> {
        let len = input.chars().filter(|c| *c != '-').count();
        if len == ADDRESS_BASE32_LENGTH {
            Self::from_base32(input)
        } else {
            Self::from_hex(input)
        }
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// The network encoded in the first byte, if it is a known one.
    pub fn network_type(&self) -> Option<NetworkType> {
        NetworkType::from_u8(self.0[0])
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    pub fn to_base32(&self) -> String {
        let mut out = String::with_capacity(ADDRESS_BASE32_LENGTH);
        let (mut acc, mut bits) = (0u32, 0u32);
        for byte in self.0 {
            acc = ((acc << 8) | u32::from(byte)) & 0xFFFF;
            bits += 8;
            while bits >= 5 {
                bits -= 5;
                out.push(char::from(BASE32_ALPHABET[((acc >> bits) & 0x1F) as usize]));
            }
        }
        out
    }
}

impl TryFrom<String> for Address {
    type Error = TransactionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_hex()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Either a concrete address or a namespace that aliases one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Recipient {
    Address(Address),
    Alias(NamespaceId),
}

impl Recipient {
    /// Sixteen hex digits are read as a namespace id (big-endian text);
    /// anything else must be a full address, base32 or hex.
    pub fn parse(input: &str) -> Result<Self, TransactionError> {
        if super::pattern_matches(&ALIAS_PATTERN, input) {
            Ok(Self::Alias(NamespaceId::from_hex(input)?))
        } else {
            Ok(Self::Address(Address::parse(input)?))
        }
    }

    /// The 25-byte wire form.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        match self {
            Self::Address(address) => *address.as_bytes(),
            Self::Alias(namespace_id) => {
                let mut out = [0u8; ADDRESS_LENGTH];
                out[0] = ALIAS_MARKER;
                out[1..9].copy_from_slice(&namespace_id.id().to_le_bytes());
                out
            }
        }
    }
}

impl From<Address> for Recipient {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl From<NamespaceId> for Recipient {
    fn from(namespace_id: NamespaceId) -> Self {
        Self::Alias(namespace_id)
    }
}

impl TryFrom<String> for Recipient {
    type Error = TransactionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Recipient> for String {
    fn from(recipient: Recipient) -> Self {
        match recipient {
            Recipient::Address(address) => address.to_hex(),
            Recipient::Alias(namespace_id) => namespace_id.to_hex(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS_HEX: &str = "A826D27E1D0A26CA4E316F901E23E55C8711DB20DF11A7B2C1";

    #[test]
    fn address_hex_roundtrip() {
        let address = Address::from_hex(ADDRESS_HEX).unwrap();
        assert_eq!(address.to_hex(), ADDRESS_HEX);
        assert_eq!(address.network_type(), Some(NetworkType::TestNet));
    }

    #[test]
    fn address_ignores_dashes() {
        let dashed = "A826D2-7E1D0A-26CA4E-316F90-1E23E5-5C8711-DB20DF-11A7B2-C1";
        assert_eq!(
            Address::from_hex(dashed).unwrap(),
            Address::from_hex(ADDRESS_HEX).unwrap()
        );
    }

    #[test]
    fn short_address_rejected() {
        assert!(matches!(
            Address::from_hex("A826D27E"),
            Err(TransactionError::InvalidLength { expected: 25, .. })
        ));
    }

    const ADDRESS_BASE32: &str = "VATNE7Q5BITMUTRRN6IB4I7FLSDRDWZA34I2PMWB";

    #[test]
    fn base32_matches_hex() {
        let address = Address::from_base32(ADDRESS_BASE32).unwrap();
        assert_eq!(address.to_hex(), ADDRESS_HEX);
        assert_eq!(address.to_base32(), ADDRESS_BASE32);
    }

    #[test]
    fn base32_is_case_and_dash_insensitive() {
        let pretty = "VATNE7-Q5BITM-UTRRN6-IB4I7F-LSDRDW-ZA34I2-PMWB";
        assert_eq!(
            Address::from_base32(&pretty.to_lowercase()).unwrap(),
            Address::from_hex(ADDRESS_HEX).unwrap()
        );
    }

    #[test]
    fn base32_rejects_bad_input() {
        assert!(matches!(
            Address::from_base32("VATNE7Q5"),
            Err(TransactionError::InvalidLength { expected: 40, actual: 8, .. })
        ));
        assert!(matches!(
            Address::from_base32("1ATNE7Q5BITMUTRRN6IB4I7FLSDRDWZA34I2PMWB"),
            Err(TransactionError::InvalidAddress(_))
        ));
    }

    #[test]
    fn recipient_accepts_either_address_form() {
        assert_eq!(
            Recipient::parse(ADDRESS_BASE32).unwrap(),
            Recipient::parse(ADDRESS_HEX).unwrap()
        );
        let json = format!("\"{ADDRESS_BASE32}\"");
        let address: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(address.to_hex(), ADDRESS_HEX);
    }

    #[test]
    fn sixteen_hex_digits_is_alias() {
        let recipient = Recipient::parse("85BBEA6CC462B244").unwrap();
        assert!(matches!(recipient, Recipient::Alias(_)));

        let bytes = recipient.to_bytes();
        assert_eq!(bytes[0], ALIAS_MARKER);
        // Little-endian on the wire.
        assert_eq!(&bytes[1..9], &[0x44, 0xB2, 0x62, 0xC4, 0x6C, 0xEA, 0xBB, 0x85]);
        assert!(bytes[9..].iter().all(|b| *b == 0));
    }

    #[test]
    fn full_hex_is_address() {
        let recipient = Recipient::parse(ADDRESS_HEX).unwrap();
        assert_eq!(recipient.to_bytes(), *Address::from_hex(ADDRESS_HEX).unwrap().as_bytes());
    }

    #[test]
    fn recipient_serde_roundtrip() {
        let alias = Recipient::parse("85BBEA6CC462B244").unwrap();
        let json = serde_json::to_string(&alias).unwrap();
        assert_eq!(json, "\"85BBEA6CC462B244\"");
        let back: Recipient = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alias);
    }
}
