//! The per-type part of a transaction.
//!
//! Each family implements [`BodyLayout`]: which layout it is written
//! against, how many bytes it adds after the header, and the values for
//! those fields. [`TransactionBody`] is the closed set of families.

use serde::{Deserialize, Serialize};

use super::account::{AccountLinkBody, AccountPropertiesBody};
use super::aggregate::AggregateBody;
use super::chain::ChainConfigBody;
use super::contract::ModifyContractBody;
use super::exchange::{
    AddExchangeOfferBody, ExchangeOfferBody, PlaceSdaExchangeOfferBody, RemoveExchangeOfferBody,
    RemoveSdaExchangeOfferBody,
};
use super::lock::{HashLockBody, SecretLockBody, SecretProofBody};
use super::metadata::MetadataBody;
use super::mosaic::{MosaicDefinitionBody, MosaicSupplyChangeBody};
use super::multisig::ModifyMultisigBody;
use super::namespace::{AddressAliasBody, MosaicAliasBody, RegisterNamespaceBody};
use super::transfer::TransferBody;
use super::types::TransactionType;
use crate::builder::FieldValue;
use crate::error::TransactionError;
use crate::schema::Schema;

/// How one transaction family maps onto its wire layout.
pub trait BodyLayout {
    fn transaction_type(&self) -> TransactionType;

    /// Full layout, header included.
    fn schema(&self) -> &'static Schema;

    /// Bytes after the common header. Must agree with what
    /// [`BodyLayout::body_values`] encodes.
    fn body_size(&self) -> usize;

    /// Values for the fields after the header, in layout order.
    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError>;

    /// Input checks run before anything is encoded.
    fn validate(&self) -> Result<(), TransactionError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionBody {
    Transfer(TransferBody),
    RegisterNamespace(RegisterNamespaceBody),
    AddressAlias(AddressAliasBody),
    MosaicAlias(MosaicAliasBody),
    MosaicDefinition(MosaicDefinitionBody),
    MosaicSupplyChange(MosaicSupplyChangeBody),
    ModifyMultisig(ModifyMultisigBody),
    Aggregate(AggregateBody),
    HashLock(HashLockBody),
    SecretLock(SecretLockBody),
    SecretProof(SecretProofBody),
    AccountLink(AccountLinkBody),
    AccountProperties(AccountPropertiesBody),
    Metadata(MetadataBody),
    ModifyContract(ModifyContractBody),
    ChainConfig(ChainConfigBody),
    AddExchangeOffer(AddExchangeOfferBody),
    ExchangeOffer(ExchangeOfferBody),
    RemoveExchangeOffer(RemoveExchangeOfferBody),
    PlaceSdaExchangeOffer(PlaceSdaExchangeOfferBody),
    RemoveSdaExchangeOffer(RemoveSdaExchangeOfferBody),
}

impl TransactionBody {
    pub fn layout(&self) -> &dyn BodyLayout {
        match self {
            Self::Transfer(b) => b,
            Self::RegisterNamespace(b) => b,
            Self::AddressAlias(b) => b,
            Self::MosaicAlias(b) => b,
            Self::MosaicDefinition(b) => b,
            Self::MosaicSupplyChange(b) => b,
            Self::ModifyMultisig(b) => b,
            Self::Aggregate(b) => b,
            Self::HashLock(b) => b,
            Self::SecretLock(b) => b,
            Self::SecretProof(b) => b,
            Self::AccountLink(b) => b,
            Self::AccountProperties(b) => b,
            Self::Metadata(b) => b,
            Self::ModifyContract(b) => b,
            Self::ChainConfig(b) => b,
            Self::AddExchangeOffer(b) => b,
            Self::ExchangeOffer(b) => b,
            Self::RemoveExchangeOffer(b) => b,
            Self::PlaceSdaExchangeOffer(b) => b,
            Self::RemoveSdaExchangeOffer(b) => b,
        }
    }
}

impl BodyLayout for TransactionBody {
    fn transaction_type(&self) -> TransactionType {
        self.layout().transaction_type()
    }

    fn schema(&self) -> &'static Schema {
        self.layout().schema()
    }

    fn body_size(&self) -> usize {
        self.layout().body_size()
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        self.layout().body_values()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        self.layout().validate()
    }
}

macro_rules! impl_from_body {
    ($($variant:ident($body:ty)),* $(,)?) => {
        $(
            impl From<$body> for TransactionBody {
                fn from(body: $body) -> Self {
                    Self::$variant(body)
                }
            }
        )*
    };
}

impl_from_body!(
    Transfer(TransferBody),
    RegisterNamespace(RegisterNamespaceBody),
    AddressAlias(AddressAliasBody),
    MosaicAlias(MosaicAliasBody),
    MosaicDefinition(MosaicDefinitionBody),
    MosaicSupplyChange(MosaicSupplyChangeBody),
    ModifyMultisig(ModifyMultisigBody),
    Aggregate(AggregateBody),
    HashLock(HashLockBody),
    SecretLock(SecretLockBody),
    SecretProof(SecretProofBody),
    AccountLink(AccountLinkBody),
    AccountProperties(AccountPropertiesBody),
    Metadata(MetadataBody),
    ModifyContract(ModifyContractBody),
    ChainConfig(ChainConfigBody),
    AddExchangeOffer(AddExchangeOfferBody),
    ExchangeOffer(ExchangeOfferBody),
    RemoveExchangeOffer(RemoveExchangeOfferBody),
    PlaceSdaExchangeOffer(PlaceSdaExchangeOfferBody),
    RemoveSdaExchangeOffer(RemoveSdaExchangeOfferBody),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MosaicId, Recipient};
    use crate::transaction::transfer::Message;

    #[test]
    fn every_layout_starts_with_the_header() {
        let names: Vec<&str> = super::super::transfer::TRANSFER.fields[..7]
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            ["size", "signature", "signer", "version", "type", "maxFee", "deadline"]
        );
    }

    #[test]
    fn body_json_is_tagged_by_kind() {
        let body: TransactionBody = TransferBody::new(
            Recipient::parse("85BBEA6CC462B244").unwrap(),
            vec![crate::model::Mosaic::new(MosaicId::new(1u64.into()), 5u64)],
            Message::plain("hi"),
        )
        .into();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["kind"], "transfer");
        let back: TransactionBody = serde_json::from_value(json).unwrap();
        assert_eq!(back, body);
        assert_eq!(back.transaction_type(), TransactionType::Transfer);
    }
}
