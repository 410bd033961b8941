//! Exchange offers: fixed-price offers against the network currency, and
//! SDA (service-defined asset) swaps between two arbitrary mosaics.
//!
//! Every offer family is a count byte followed by fixed-size offer tables.
//!
//! | Transaction            | Bytes per offer |
//! |------------------------|-----------------|
//! | AddExchangeOffer       | 33              |
//! | ExchangeOffer          | 57              |
//! | RemoveExchangeOffer    | 9               |
//! | PlaceSdaExchangeOffer  | 40              |
//! | RemoveSdaExchangeOffer | 16              |

use serde::{Deserialize, Serialize};

use super::body::BodyLayout;
use super::checked_width;
use super::types::TransactionType;
use crate::builder::FieldValue;
use crate::config::PUBLIC_KEY_LENGTH;
use crate::crypto::PublicKey;
use crate::error::TransactionError;
use crate::model::{Mosaic, MosaicId, Uint64};
use crate::schema::{bytes, table_array, ubyte, words, FieldDescriptor, Schema};

const ADD_OFFER: &[FieldDescriptor] = &[
    words("mosaicId", 2),
    words("mosaicAmount", 2),
    words("cost", 2),
    ubyte("type"),
    words("duration", 2),
];

const MATCHED_OFFER: &[FieldDescriptor] = &[
    words("mosaicId", 2),
    words("mosaicAmount", 2),
    words("cost", 2),
    ubyte("type"),
    bytes("owner", PUBLIC_KEY_LENGTH),
];

const REMOVE_OFFER: &[FieldDescriptor] = &[words("mosaicId", 2), ubyte("type")];

const SDA_OFFER: &[FieldDescriptor] = &[
    words("mosaicIdGive", 2),
    words("mosaicAmountGive", 2),
    words("mosaicIdGet", 2),
    words("mosaicAmountGet", 2),
    words("duration", 2),
];

const REMOVE_SDA_OFFER: &[FieldDescriptor] = &[words("mosaicIdGive", 2), words("mosaicIdGet", 2)];

pub static ADD_EXCHANGE_OFFER: Schema = transaction_schema!(
    "AddExchangeOffer",
    [ubyte("offersCount"), table_array("offers", ADD_OFFER)]
);

pub static EXCHANGE_OFFER: Schema = transaction_schema!(
    "ExchangeOffer",
    [ubyte("offersCount"), table_array("offers", MATCHED_OFFER)]
);

pub static REMOVE_EXCHANGE_OFFER: Schema = transaction_schema!(
    "RemoveExchangeOffer",
    [ubyte("offersCount"), table_array("offers", REMOVE_OFFER)]
);

pub static PLACE_SDA_EXCHANGE_OFFER: Schema = transaction_schema!(
    "PlaceSdaExchangeOffer",
    [ubyte("sdaOfferCount"), table_array("offers", SDA_OFFER)]
);

pub static REMOVE_SDA_EXCHANGE_OFFER: Schema = transaction_schema!(
    "RemoveSdaExchangeOffer",
    [ubyte("sdaOfferCount"), table_array("offers", REMOVE_SDA_OFFER)]
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    Sell,
    Buy,
}

impl OfferType {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Sell => 0,
            Self::Buy => 1,
        }
    }
}

/// Count byte plus one table per offer.
fn offer_values(
    field: &'static str,
    rows: Vec<Vec<FieldValue>>,
) -> Result<Vec<FieldValue>, TransactionError> {
    Ok(vec![
        FieldValue::UByte(checked_width(field, rows.len(), u8::MAX)?),
        FieldValue::TableArray(rows),
    ])
}

// ---------------------------------------------------------------------------
// Fixed-price offers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOffer {
    pub mosaic: Mosaic,
    pub cost: Uint64,
    #[serde(rename = "type")]
    pub kind: OfferType,
    pub duration: Uint64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddExchangeOfferBody {
    pub offers: Vec<AddOffer>,
}

impl BodyLayout for AddExchangeOfferBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::AddExchangeOffer
    }

    fn schema(&self) -> &'static Schema {
        &ADD_EXCHANGE_OFFER
    }

    fn body_size(&self) -> usize {
        1 + 33 * self.offers.len()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        checked_width("offersCount", self.offers.len(), u8::MAX).map(|_| ())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let rows = self
            .offers
            .iter()
            .map(|o| {
                vec![
                    FieldValue::uint64(o.mosaic.id.id()),
                    FieldValue::uint64(o.mosaic.amount),
                    FieldValue::uint64(o.cost),
                    FieldValue::UByte(o.kind.to_u8()),
                    FieldValue::uint64(o.duration),
                ]
            })
            .collect();
        offer_values("offersCount", rows)
    }
}

/// Accepting someone else's offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedOffer {
    pub mosaic: Mosaic,
    pub cost: Uint64,
    #[serde(rename = "type")]
    pub kind: OfferType,
    pub owner: PublicKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeOfferBody {
    pub offers: Vec<MatchedOffer>,
}

impl BodyLayout for ExchangeOfferBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ExchangeOffer
    }

    fn schema(&self) -> &'static Schema {
        &EXCHANGE_OFFER
    }

    fn body_size(&self) -> usize {
        1 + 57 * self.offers.len()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        checked_width("offersCount", self.offers.len(), u8::MAX).map(|_| ())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let rows = self
            .offers
            .iter()
            .map(|o| {
                vec![
                    FieldValue::uint64(o.mosaic.id.id()),
                    FieldValue::uint64(o.mosaic.amount),
                    FieldValue::uint64(o.cost),
                    FieldValue::UByte(o.kind.to_u8()),
                    FieldValue::bytes(o.owner.as_bytes()),
                ]
            })
            .collect();
        offer_values("offersCount", rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOffer {
    pub mosaic_id: MosaicId,
    #[serde(rename = "type")]
    pub kind: OfferType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveExchangeOfferBody {
    pub offers: Vec<RemoveOffer>,
}

impl BodyLayout for RemoveExchangeOfferBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::RemoveExchangeOffer
    }

    fn schema(&self) -> &'static Schema {
        &REMOVE_EXCHANGE_OFFER
    }

    fn body_size(&self) -> usize {
        1 + 9 * self.offers.len()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        checked_width("offersCount", self.offers.len(), u8::MAX).map(|_| ())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let rows = self
            .offers
            .iter()
            .map(|o| vec![FieldValue::uint64(o.mosaic_id.id()), FieldValue::UByte(o.kind.to_u8())])
            .collect();
        offer_values("offersCount", rows)
    }
}

// ---------------------------------------------------------------------------
// SDA offers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdaOffer {
    pub give: Mosaic,
    pub get: Mosaic,
    pub duration: Uint64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSdaExchangeOfferBody {
    pub offers: Vec<SdaOffer>,
}

impl BodyLayout for PlaceSdaExchangeOfferBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::PlaceSdaExchangeOffer
    }

    fn schema(&self) -> &'static Schema {
        &PLACE_SDA_EXCHANGE_OFFER
    }

    fn body_size(&self) -> usize {
        1 + 40 * self.offers.len()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        checked_width("sdaOfferCount", self.offers.len(), u8::MAX).map(|_| ())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let rows = self
            .offers
            .iter()
            .map(|o| {
                vec![
                    FieldValue::uint64(o.give.id.id()),
                    FieldValue::uint64(o.give.amount),
                    FieldValue::uint64(o.get.id.id()),
                    FieldValue::uint64(o.get.amount),
                    FieldValue::uint64(o.duration),
                ]
            })
            .collect();
        offer_values("sdaOfferCount", rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveSdaOffer {
    pub mosaic_id_give: MosaicId,
    pub mosaic_id_get: MosaicId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveSdaExchangeOfferBody {
    pub offers: Vec<RemoveSdaOffer>,
}

impl BodyLayout for RemoveSdaExchangeOfferBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::RemoveSdaExchangeOffer
    }

    fn schema(&self) -> &'static Schema {
        &REMOVE_SDA_EXCHANGE_OFFER
    }

    fn body_size(&self) -> usize {
        1 + 16 * self.offers.len()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        checked_width("sdaOfferCount", self.offers.len(), u8::MAX).map(|_| ())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let rows = self
            .offers
            .iter()
            .map(|o| {
                vec![
                    FieldValue::uint64(o.mosaic_id_give.id()),
                    FieldValue::uint64(o.mosaic_id_get.id()),
                ]
            })
            .collect();
        offer_values("sdaOfferCount", rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HEADER_SIZE;

    fn sda(n: usize) -> PlaceSdaExchangeOfferBody {
        let offer = SdaOffer {
            give: Mosaic::new(MosaicId::new(1u64.into()), 100u64),
            get: Mosaic::new(MosaicId::new(2u64.into()), 200u64),
            duration: 1000u64.into(),
        };
        PlaceSdaExchangeOfferBody {
            offers: vec![offer; n],
        }
    }

    #[test]
    fn sda_offer_sizes() {
        assert_eq!(HEADER_SIZE + sda(0).body_size(), 123);
        assert_eq!(HEADER_SIZE + sda(1).body_size(), 163);
        assert_eq!(HEADER_SIZE + sda(3).body_size(), 243);
    }

    #[test]
    fn count_byte_leads_values() {
        let values = sda(3).body_values().unwrap();
        assert_eq!(values[0], FieldValue::UByte(3));
        match &values[1] {
            FieldValue::TableArray(rows) => assert_eq!(rows.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn too_many_offers_rejected() {
        assert!(sda(256).validate().is_err());
    }
}
