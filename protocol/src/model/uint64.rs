//! Exact unsigned 64-bit quantities.
//!
//! Fees, amounts, deadlines and ids travel through JSON APIs as a pair of
//! 32-bit words (`[low, high]`) because JSON numbers stop being exact at
//! 2^53. [`Uint64`] keeps that pair as its representation so DTOs round-trip
//! bit-for-bit, and offers the decimal, hex and compact forms the rest of
//! the ecosystem expects.
//!
//! Invariant: `value == low + high * 2^32`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::MAX_SAFE_INTEGER;

/// Errors from parsing or narrowing a [`Uint64`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Uint64Error {
    #[error("`{0}` is not an unsigned decimal integer")]
    InvalidDecimal(String),

    #[error("decimal `{0}` does not fit in 64 bits")]
    DecimalOverflow(String),

    #[error("`{0}` is not 16 hex characters")]
    InvalidHex(String),

    #[error("value {0} exceeds the compact range (2^53 - 1)")]
    NotCompact(u64),

    #[error("arithmetic overflow")]
    Overflow,
}

/// An unsigned 64-bit integer stored as `(low, high)` 32-bit words.
///
/// Serializes as the DTO array `[low, high]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Uint64 {
    low: u32,
    high: u32,
}

impl Uint64 {
    pub const ZERO: Uint64 = Uint64 { low: 0, high: 0 };
    pub const MAX: Uint64 = Uint64 {
        low: u32::MAX,
        high: u32::MAX,
    };

    pub const fn from_parts(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    pub const fn from_u64(value: u64) -> Self {
        Self {
            low: value as u32,
            high: (value >> 32) as u32,
        }
    }

    pub const fn low(&self) -> u32 {
        self.low
    }

    pub const fn high(&self) -> u32 {
        self.high
    }

    pub const fn to_u64(&self) -> u64 {
        ((self.high as u64) << 32) | self.low as u64
    }

    /// Big-integer form.
    pub const fn to_u128(&self) -> u128 {
        self.to_u64() as u128
    }

    pub const fn is_zero(&self) -> bool {
        self.low == 0 && self.high == 0
    }

    /// The DTO form, `[low, high]`.
    pub const fn to_dto(&self) -> [u32; 2] {
        [self.low, self.high]
    }

    pub const fn from_dto(dto: [u32; 2]) -> Self {
        Self {
            low: dto[0],
            high: dto[1],
        }
    }

    /// Parses exactly 16 hex digits (either case). The hex form is
    /// big-endian: the first two digits are the most significant byte.
    pub fn from_hex(hex_str: &str) -> Result<Self, Uint64Error> {
        if hex_str.len() != 16 {
            return Err(Uint64Error::InvalidHex(hex_str.to_string()));
        }
        let mut bytes = [0u8; 8];
        hex::decode_to_slice(hex_str, &mut bytes)
            .map_err(|_| Uint64Error::InvalidHex(hex_str.to_string()))?;
        Ok(Self::from_u64(u64::from_be_bytes(bytes)))
    }

    /// 16 uppercase hex digits, zero-padded, big-endian.
    pub fn to_hex(&self) -> String {
        format!("{:08X}{:08X}", self.high, self.low)
    }

    /// The value as a plain number, provided it is exactly representable as
    /// an IEEE double (at most 2^53 - 1).
    pub fn to_compact(&self) -> Result<u64, Uint64Error> {
        let value = self.to_u64();
        if value > MAX_SAFE_INTEGER {
            return Err(Uint64Error::NotCompact(value));
        }
        Ok(value)
    }

    /// Wire form: `low` little-endian followed by `high` little-endian.
    pub fn to_le_bytes(&self) -> [u8; 8] {
        self.to_u64().to_le_bytes()
    }

    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self::from_u64(u64::from_le_bytes(bytes))
    }

    pub fn checked_add(self, rhs: Uint64) -> Result<Uint64, Uint64Error> {
        self.to_u64()
            .checked_add(rhs.to_u64())
            .map(Self::from_u64)
            .ok_or(Uint64Error::Overflow)
    }

    pub fn checked_sub(self, rhs: Uint64) -> Result<Uint64, Uint64Error> {
        self.to_u64()
            .checked_sub(rhs.to_u64())
            .map(Self::from_u64)
            .ok_or(Uint64Error::Overflow)
    }

    pub fn checked_mul(self, rhs: Uint64) -> Result<Uint64, Uint64Error> {
        self.to_u64()
            .checked_mul(rhs.to_u64())
            .map(Self::from_u64)
            .ok_or(Uint64Error::Overflow)
    }
}

impl PartialOrd for Uint64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uint64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_u64().cmp(&other.to_u64())
    }
}

impl From<u64> for Uint64 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<Uint64> for u64 {
    fn from(value: Uint64) -> Self {
        value.to_u64()
    }
}

impl From<Uint64> for u128 {
    fn from(value: Uint64) -> Self {
        value.to_u128()
    }
}

impl From<[u32; 2]> for Uint64 {
    fn from(dto: [u32; 2]) -> Self {
        Self::from_dto(dto)
    }
}

impl From<Uint64> for [u32; 2] {
    fn from(value: Uint64) -> Self {
        value.to_dto()
    }
}

impl FromStr for Uint64 {
    type Err = Uint64Error;

    /// Parses a plain decimal string: digits only, no sign, no whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Uint64Error::InvalidDecimal(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self::from_u64)
            .map_err(|_| Uint64Error::DecimalOverflow(s.to_string()))
    }
}

impl fmt::Display for Uint64 {
    /// Decimal form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u64())
    }
}

impl fmt::Debug for Uint64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint64([{}, {}] = {})", self.low, self.high, self.to_u64())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
