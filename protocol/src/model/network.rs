//! Network identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The network a transaction is bound to. Its byte is the top byte of the
/// wire `version` field and the first byte of every address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    MainNet,
    TestNet,
    Private,
    PrivateTest,
    Mijin,
    MijinTest,
}

impl NetworkType {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::MainNet => 0xB8,
            Self::TestNet => 0xA8,
            Self::Private => 0xC8,
            Self::PrivateTest => 0xB0,
            Self::Mijin => 0x60,
            Self::MijinTest => 0x90,
        }
    }

    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0xB8 => Some(Self::MainNet),
            0xA8 => Some(Self::TestNet),
            0xC8 => Some(Self::Private),
            0xB0 => Some(Self::PrivateTest),
            0x60 => Some(Self::Mijin),
            0x90 => Some(Self::MijinTest),
            _ => None,
        }
    }

    /// Packs the network byte and an entity version into the wire `version`
    /// field.
    pub const fn version_field(self, entity_version: u8) -> u32 {
        ((self.to_u8() as u32) << 24) | entity_version as u32
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainNet => write!(f, "MainNet"),
            Self::TestNet => write!(f, "TestNet"),
            Self::Private => write!(f, "Private"),
            Self::PrivateTest => write!(f, "PrivateTest"),
            Self::Mijin => write!(f, "Mijin"),
            Self::MijinTest => write!(f, "MijinTest"),
        }
    }
}
