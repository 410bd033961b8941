//! Transaction type codes and entity versions.
//!
//! Every transaction carries its type as a `u16` at offset 104 and its
//! entity version in the low byte of the `version` field.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Transfer,
    RegisterNamespace,
    AddressAlias,
    MosaicAlias,
    MosaicDefinition,
    MosaicSupplyChange,
    ModifyMultisigAccount,
    AggregateComplete,
    AggregateBonded,
    HashLock,
    SecretLock,
    SecretProof,
    AccountPropertyAddress,
    AccountPropertyMosaic,
    AccountPropertyEntityType,
    AccountLink,
    AccountMetadata,
    MosaicMetadata,
    NamespaceMetadata,
    ModifyContract,
    ChainConfig,
    ChainUpgrade,
    AddExchangeOffer,
    ExchangeOffer,
    RemoveExchangeOffer,
    PlaceSdaExchangeOffer,
    RemoveSdaExchangeOffer,
}

impl TransactionType {
    pub const ALL: [TransactionType; 27] = [
        Self::Transfer,
        Self::RegisterNamespace,
        Self::AddressAlias,
        Self::MosaicAlias,
        Self::MosaicDefinition,
        Self::MosaicSupplyChange,
        Self::ModifyMultisigAccount,
        Self::AggregateComplete,
        Self::AggregateBonded,
        Self::HashLock,
        Self::SecretLock,
        Self::SecretProof,
        Self::AccountPropertyAddress,
        Self::AccountPropertyMosaic,
        Self::AccountPropertyEntityType,
        Self::AccountLink,
        Self::AccountMetadata,
        Self::MosaicMetadata,
        Self::NamespaceMetadata,
        Self::ModifyContract,
        Self::ChainConfig,
        Self::ChainUpgrade,
        Self::AddExchangeOffer,
        Self::ExchangeOffer,
        Self::RemoveExchangeOffer,
        Self::PlaceSdaExchangeOffer,
        Self::RemoveSdaExchangeOffer,
    ];

    /// Wire code.
    pub const fn code(self) -> u16 {
        match self {
            Self::Transfer => 0x4154,
            Self::RegisterNamespace => 0x414E,
            Self::AddressAlias => 0x424E,
            Self::MosaicAlias => 0x434E,
            Self::MosaicDefinition => 0x414D,
            Self::MosaicSupplyChange => 0x424D,
            Self::ModifyMultisigAccount => 0x4155,
            Self::AggregateComplete => 0x4141,
            Self::AggregateBonded => 0x4241,
            Self::HashLock => 0x4148,
            Self::SecretLock => 0x4152,
            Self::SecretProof => 0x4252,
            Self::AccountPropertyAddress => 0x4150,
            Self::AccountPropertyMosaic => 0x4250,
            Self::AccountPropertyEntityType => 0x4350,
            Self::AccountLink => 0x414C,
            Self::AccountMetadata => 0x413F,
            Self::MosaicMetadata => 0x423F,
            Self::NamespaceMetadata => 0x433F,
            Self::ModifyContract => 0x4157,
            Self::ChainConfig => 0x4159,
            Self::ChainUpgrade => 0x4158,
            Self::AddExchangeOffer => 0x415D,
            Self::ExchangeOffer => 0x425D,
            Self::RemoveExchangeOffer => 0x435D,
            Self::PlaceSdaExchangeOffer => 0x416A,
            Self::RemoveSdaExchangeOffer => 0x426A,
        }
    }

    /// Entity version written alongside the network byte.
    pub const fn version(self) -> u8 {
        match self {
            Self::Transfer => 3,
            Self::RegisterNamespace => 2,
            Self::AddressAlias | Self::MosaicAlias => 1,
            Self::MosaicDefinition => 3,
            Self::MosaicSupplyChange => 2,
            Self::ModifyMultisigAccount => 3,
            Self::AggregateComplete | Self::AggregateBonded => 2,
            Self::HashLock | Self::SecretLock | Self::SecretProof => 1,
            Self::AccountPropertyAddress
            | Self::AccountPropertyMosaic
            | Self::AccountPropertyEntityType => 1,
            Self::AccountLink => 2,
            Self::AccountMetadata | Self::MosaicMetadata | Self::NamespaceMetadata => 1,
            Self::ModifyContract => 3,
            Self::ChainConfig | Self::ChainUpgrade => 1,
            Self::AddExchangeOffer => 4,
            Self::ExchangeOffer | Self::RemoveExchangeOffer => 2,
            Self::PlaceSdaExchangeOffer | Self::RemoveSdaExchangeOffer => 1,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub const fn is_aggregate(self) -> bool {
        matches!(self, Self::AggregateComplete | Self::AggregateBonded)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique_and_resolve_back() {
        let codes: HashSet<u16> = TransactionType::ALL.iter().map(|t| t.code()).collect();
        assert_eq!(codes.len(), TransactionType::ALL.len());
        for t in TransactionType::ALL {
            assert_eq!(TransactionType::from_code(t.code()), Some(t));
        }
        assert_eq!(TransactionType::from_code(0xFFFF), None);
    }

    #[test]
    fn transfer_code_and_version() {
        assert_eq!(TransactionType::Transfer.code(), 0x4154);
        assert_eq!(TransactionType::Transfer.version(), 3);
        assert_eq!(TransactionType::PlaceSdaExchangeOffer.code(), 0x416A);
    }

    #[test]
    fn display_uses_variant_name() {
        assert_eq!(TransactionType::ModifyContract.to_string(), "ModifyContract");
    }
}
