//! Mosaics (fungible assets) and their properties.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use super::ids::MosaicId;
use super::uint64::Uint64;
use crate::error::TransactionError;

/// An amount of a given mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mosaic {
    pub id: MosaicId,
    pub amount: Uint64,
}

impl Mosaic {
    pub fn new(id: MosaicId, amount: impl Into<Uint64>) -> Self {
        Self {
            id,
            amount: amount.into(),
        }
    }
}

/// Bit set of mosaic capabilities.
///
/// Deserializing rejects reserved bits instead of masking them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MosaicFlags(u8);

impl MosaicFlags {
    pub const NONE: MosaicFlags = MosaicFlags(0x00);
    pub const SUPPLY_MUTABLE: MosaicFlags = MosaicFlags(0x01);
    pub const TRANSFERABLE: MosaicFlags = MosaicFlags(0x02);
    pub const LEVY_MUTABLE: MosaicFlags = MosaicFlags(0x04);

    const ALL_BITS: u8 = 0x07;

    /// Unknown bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL_BITS)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: MosaicFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl TryFrom<u8> for MosaicFlags {
    type Error = TransactionError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        if bits & !Self::ALL_BITS != 0 {
            return Err(TransactionError::OutOfRange {
                field: "flags",
                value: i64::from(bits),
                max: i64::from(Self::ALL_BITS),
            });
        }
        Ok(Self(bits))
    }
}

impl From<MosaicFlags> for u8 {
    fn from(flags: MosaicFlags) -> Self {
        flags.0
    }
}

impl BitOr for MosaicFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MosaicFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MosaicFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::SUPPLY_MUTABLE) {
            names.push("SUPPLY_MUTABLE");
        }
        if self.contains(Self::TRANSFERABLE) {
            names.push("TRANSFERABLE");
        }
        if self.contains(Self::LEVY_MUTABLE) {
            names.push("LEVY_MUTABLE");
        }
        write!(f, "MosaicFlags({})", names.join(" | "))
    }
}

/// Direction of a supply change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MosaicSupplyType {
    Decrease,
    Increase,
}

impl MosaicSupplyType {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Decrease => 0,
            Self::Increase => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine_and_test() {
        let flags = MosaicFlags::SUPPLY_MUTABLE | MosaicFlags::LEVY_MUTABLE;
        assert_eq!(flags.bits(), 0x05);
        assert!(flags.contains(MosaicFlags::SUPPLY_MUTABLE));
        assert!(!flags.contains(MosaicFlags::TRANSFERABLE));
        assert!(flags.contains(MosaicFlags::NONE));
    }

    #[test]
    fn from_bits_masks_unknown() {
        assert_eq!(MosaicFlags::from_bits(0xFF).bits(), 0x07);
    }

    #[test]
    fn reserved_bits_rejected_on_deserialize() {
        assert!(serde_json::from_str::<MosaicFlags>("255").is_err());
        assert!(serde_json::from_str::<MosaicFlags>("8").is_err());
        let flags: MosaicFlags = serde_json::from_str("3").unwrap();
        assert_eq!(flags, MosaicFlags::SUPPLY_MUTABLE | MosaicFlags::TRANSFERABLE);
        assert_eq!(serde_json::to_string(&flags).unwrap(), "3");
    }

    #[test]
    fn try_from_reports_out_of_range() {
        assert!(matches!(
            MosaicFlags::try_from(0x10),
            Err(TransactionError::OutOfRange { field: "flags", value: 16, max: 7 })
        ));
    }

    #[test]
    fn debug_names_members() {
        let flags = MosaicFlags::SUPPLY_MUTABLE | MosaicFlags::TRANSFERABLE;
        assert_eq!(format!("{flags:?}"), "MosaicFlags(SUPPLY_MUTABLE | TRANSFERABLE)");
    }
}
