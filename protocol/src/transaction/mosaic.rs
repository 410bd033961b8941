//! Mosaic definition and supply change.
//!
//! A definition without a duration is encoded against its own layout that
//! has no optional-properties array at all, so neither the indicator byte
//! nor the duration value appear on the wire.

use serde::{Deserialize, Serialize};

use super::body::BodyLayout;
use super::types::TransactionType;
use crate::builder::FieldValue;
use crate::crypto::PublicKey;
use crate::error::TransactionError;
use crate::model::{MosaicFlags, MosaicId, MosaicNonce, MosaicSupplyType, Uint64};
use crate::schema::{bytes, table_array, ubyte, words, FieldDescriptor, Schema};

const MOSAIC_PROPERTY: &[FieldDescriptor] = &[ubyte("id"), words("value", 2)];

pub static MOSAIC_DEFINITION: Schema = transaction_schema!(
    "MosaicDefinition",
    [
        bytes("mosaicNonce", 4),
        words("mosaicId", 2),
        ubyte("numOptionalProperties"),
        ubyte("flags"),
        ubyte("divisibility"),
        table_array("optionalProperties", MOSAIC_PROPERTY),
    ]
);

pub static MOSAIC_DEFINITION_NO_DURATION: Schema = transaction_schema!(
    "MosaicDefinition",
    [
        bytes("mosaicNonce", 4),
        words("mosaicId", 2),
        ubyte("numOptionalProperties"),
        ubyte("flags"),
        ubyte("divisibility"),
    ]
);

pub static MOSAIC_SUPPLY_CHANGE: Schema = transaction_schema!(
    "MosaicSupplyChange",
    [words("mosaicId", 2), ubyte("direction"), words("delta", 2)]
);

/// Optional property id of the duration.
pub const DURATION_PROPERTY_ID: u8 = 2;

/// Highest divisibility the network accepts.
pub const MAX_DIVISIBILITY: u8 = 6;

const FIXED_DEFINITION_SIZE: usize = 4 + 8 + 1 + 1 + 1;
const PROPERTY_SIZE: usize = 1 + 8;

// ---------------------------------------------------------------------------
// MosaicDefinition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicDefinitionBody {
    pub nonce: MosaicNonce,
    pub mosaic_id: MosaicId,
    #[serde(default)]
    pub flags: MosaicFlags,
    pub divisibility: u8,
    #[serde(default)]
    pub duration: Option<Uint64>,
}

impl MosaicDefinitionBody {
    /// Derives the mosaic id from `nonce` and the `owner` that will sign.
    pub fn new(
        nonce: MosaicNonce,
        owner: &PublicKey,
        flags: MosaicFlags,
        divisibility: u8,
        duration: Option<Uint64>,
    ) -> Self {
        Self {
            nonce,
            mosaic_id: MosaicId::from_nonce(nonce, owner),
            flags,
            divisibility,
            duration,
        }
    }
}

impl BodyLayout for MosaicDefinitionBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::MosaicDefinition
    }

    fn schema(&self) -> &'static Schema {
        match self.duration {
            Some(_) => &MOSAIC_DEFINITION,
            None => &MOSAIC_DEFINITION_NO_DURATION,
        }
    }

    fn body_size(&self) -> usize {
        FIXED_DEFINITION_SIZE + self.duration.map_or(0, |_| PROPERTY_SIZE)
    }

    fn validate(&self) -> Result<(), TransactionError> {
        if self.divisibility > MAX_DIVISIBILITY {
            return Err(TransactionError::OutOfRange {
                field: "divisibility",
                value: i64::from(self.divisibility),
                max: i64::from(MAX_DIVISIBILITY),
            });
        }
        Ok(())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let mut values = vec![
            FieldValue::bytes(self.nonce.as_bytes()),
            FieldValue::uint64(self.mosaic_id.id()),
            FieldValue::UByte(u8::from(self.duration.is_some())),
            FieldValue::UByte(self.flags.bits()),
            FieldValue::UByte(self.divisibility),
        ];
        if let Some(duration) = self.duration {
            values.push(FieldValue::TableArray(vec![vec![
                FieldValue::UByte(DURATION_PROPERTY_ID),
                FieldValue::uint64(duration),
            ]]));
        }
        Ok(values)
    }
}

// ---------------------------------------------------------------------------
// MosaicSupplyChange
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicSupplyChangeBody {
    pub mosaic_id: MosaicId,
    pub direction: MosaicSupplyType,
    pub delta: Uint64,
}

impl BodyLayout for MosaicSupplyChangeBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::MosaicSupplyChange
    }

    fn schema(&self) -> &'static Schema {
        &MOSAIC_SUPPLY_CHANGE
    }

    fn body_size(&self) -> usize {
        8 + 1 + 8
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        Ok(vec![
            FieldValue::uint64(self.mosaic_id.id()),
            FieldValue::UByte(self.direction.to_u8()),
            FieldValue::uint64(self.delta),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(duration: Option<u64>) -> MosaicDefinitionBody {
        MosaicDefinitionBody::new(
            MosaicNonce::from_u32(7),
            &PublicKey::from_bytes([3u8; 32]),
            MosaicFlags::SUPPLY_MUTABLE | MosaicFlags::TRANSFERABLE,
            3,
            duration.map(Uint64::from_u64),
        )
    }

    #[test]
    fn duration_selects_layout_and_size() {
        assert_eq!(definition(Some(1000)).body_size(), 24);
        assert_eq!(definition(None).body_size(), 15);
        assert_eq!(definition(Some(1000)).schema().fields.len(), 13);
        assert_eq!(definition(None).schema().fields.len(), 12);
    }

    #[test]
    fn property_count_reflects_duration() {
        let values = definition(Some(5)).body_values().unwrap();
        assert_eq!(values[2], FieldValue::UByte(1));
        let values = definition(None).body_values().unwrap();
        assert_eq!(values[2], FieldValue::UByte(0));
        assert_eq!(values.len(), 5);
    }

    #[test]
    fn divisibility_is_bounded() {
        let mut body = definition(None);
        body.divisibility = 7;
        assert!(matches!(
            body.validate(),
            Err(TransactionError::OutOfRange { field: "divisibility", .. })
        ));
    }

    #[test]
    fn descriptor_json_with_reserved_flag_bits_is_rejected() {
        let json = |flags: u8| {
            format!(
                r#"{{"nonce":[7,0,0,0],"mosaic_id":[1,0],"flags":{flags},"divisibility":0}}"#
            )
        };
        assert!(serde_json::from_str::<MosaicDefinitionBody>(&json(0xFF)).is_err());
        let body: MosaicDefinitionBody = serde_json::from_str(&json(0x07)).unwrap();
        assert_eq!(body.flags.bits(), 0x07);
    }
}
