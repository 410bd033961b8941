//! Key/value metadata attached to accounts, mosaics and namespaces.
//!
//! The value on the wire is not the new value itself but its XOR against
//! the previous value, both zero-padded to the longer length. The node
//! applies the same XOR to recover the new value, and `valueSizeDelta`
//! tells it how long the result is.

use serde::{Deserialize, Serialize};

use super::body::BodyLayout;
use super::types::TransactionType;
use crate::builder::FieldValue;
use crate::config::PUBLIC_KEY_LENGTH;
use crate::crypto::PublicKey;
use crate::error::TransactionError;
use crate::model::{MosaicId, NamespaceId, Uint64};
use crate::schema::{bytes, ushort, var_bytes, words, Schema};

pub static ACCOUNT_METADATA: Schema = transaction_schema!(
    "AccountMetadata",
    [
        bytes("targetKey", PUBLIC_KEY_LENGTH),
        words("scopedMetadataKey", 2),
        ushort("valueSizeDelta"),
        ushort("valueSize"),
        var_bytes("value"),
    ]
);

pub static MOSAIC_METADATA: Schema = transaction_schema!(
    "MosaicMetadata",
    [
        bytes("targetKey", PUBLIC_KEY_LENGTH),
        words("scopedMetadataKey", 2),
        words("targetMosaicId", 2),
        ushort("valueSizeDelta"),
        ushort("valueSize"),
        var_bytes("value"),
    ]
);

pub static NAMESPACE_METADATA: Schema = transaction_schema!(
    "NamespaceMetadata",
    [
        bytes("targetKey", PUBLIC_KEY_LENGTH),
        words("scopedMetadataKey", 2),
        words("targetNamespaceId", 2),
        ushort("valueSizeDelta"),
        ushort("valueSize"),
        var_bytes("value"),
    ]
);

/// Longest value whose size delta still fits the signed 16-bit field.
pub const MAX_VALUE_SIZE: usize = i16::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataTarget {
    Account,
    Mosaic(MosaicId),
    Namespace(NamespaceId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataBody {
    pub target: MetadataTarget,
    /// Owner of the metadata entry.
    pub target_key: PublicKey,
    pub scoped_key: Uint64,
    pub value: String,
    /// The value currently stored, if any.
    #[serde(default)]
    pub old_value: Option<String>,
}

impl MetadataBody {
    fn new_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    fn old_bytes(&self) -> &[u8] {
        self.old_value.as_deref().unwrap_or("").as_bytes()
    }

    /// `valueSize`: the longer of the two values.
    pub fn value_size(&self) -> usize {
        self.new_bytes().len().max(self.old_bytes().len())
    }

    /// `valueSizeDelta`: new length minus old length.
    pub fn value_size_delta(&self) -> i16 {
        // Both lengths are bounded by MAX_VALUE_SIZE after validation.
        (self.new_bytes().len() as i64 - self.old_bytes().len() as i64) as i16
    }

    /// `new XOR old`, both zero-padded to `value_size`.
    pub fn value_diff(&self) -> Vec<u8> {
        let (new, old) = (self.new_bytes(), self.old_bytes());
        (0..self.value_size())
            .map(|i| new.get(i).copied().unwrap_or(0) ^ old.get(i).copied().unwrap_or(0))
            .collect()
    }
}

impl BodyLayout for MetadataBody {
    fn transaction_type(&self) -> TransactionType {
        match self.target {
            MetadataTarget::Account => TransactionType::AccountMetadata,
            MetadataTarget::Mosaic(_) => TransactionType::MosaicMetadata,
            MetadataTarget::Namespace(_) => TransactionType::NamespaceMetadata,
        }
    }

    fn schema(&self) -> &'static Schema {
        match self.target {
            MetadataTarget::Account => &ACCOUNT_METADATA,
            MetadataTarget::Mosaic(_) => &MOSAIC_METADATA,
            MetadataTarget::Namespace(_) => &NAMESPACE_METADATA,
        }
    }

    fn body_size(&self) -> usize {
        let target_id = match self.target {
            MetadataTarget::Account => 0,
            MetadataTarget::Mosaic(_) | MetadataTarget::Namespace(_) => 8,
        };
        PUBLIC_KEY_LENGTH + 8 + target_id + 2 + 2 + self.value_size()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        for (field, len) in [("value", self.new_bytes().len()), ("oldValue", self.old_bytes().len())] {
            if len > MAX_VALUE_SIZE {
                return Err(TransactionError::OutOfRange {
                    field,
                    value: len as i64,
                    max: MAX_VALUE_SIZE as i64,
                });
            }
        }
        Ok(())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        self.validate()?;
        let mut values = vec![
            FieldValue::bytes(self.target_key.as_bytes()),
            FieldValue::uint64(self.scoped_key),
        ];
        match self.target {
            MetadataTarget::Account => {}
            MetadataTarget::Mosaic(id) => values.push(FieldValue::uint64(id.id())),
            MetadataTarget::Namespace(id) => values.push(FieldValue::uint64(id.id())),
        }
        values.push(FieldValue::UShort(self.value_size_delta() as u16));
        values.push(FieldValue::UShort(self.value_size() as u16));
        values.push(FieldValue::Bytes(self.value_diff()));
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(value: &str, old: Option<&str>) -> MetadataBody {
        MetadataBody {
            target: MetadataTarget::Account,
            target_key: PublicKey::from_bytes([1; 32]),
            scoped_key: 42u64.into(),
            value: value.to_string(),
            old_value: old.map(str::to_string),
        }
    }

    #[test]
    fn fresh_value_is_sent_verbatim() {
        let b = body("abc", None);
        assert_eq!(b.value_diff(), b"abc".to_vec());
        assert_eq!(b.value_size_delta(), 3);
        assert_eq!(b.body_size(), 44 + 3);
    }

    #[test]
    fn shrinking_value_xors_against_padding() {
        let b = body("ab", Some("abcd"));
        assert_eq!(b.value_size(), 4);
        assert_eq!(b.value_size_delta(), -2);
        assert_eq!(b.value_diff(), vec![0, 0, b'c', b'd']);

        let values = b.body_values().unwrap();
        assert_eq!(values[2], FieldValue::UShort(0xFFFE));
    }

    #[test]
    fn xor_twice_restores_new_value() {
        let b = body("hello", Some("world!"));
        let restored: Vec<u8> = b
            .value_diff()
            .iter()
            .zip(b"world!".iter())
            .map(|(d, o)| d ^ o)
            .collect();
        assert_eq!(&restored[..5], b"hello");
        assert_eq!(restored[5], 0);
    }

    #[test]
    fn targets_pick_type_and_size() {
        let mut b = body("v", None);
        b.target = MetadataTarget::Namespace(NamespaceId::from_name("prx").unwrap());
        assert_eq!(b.transaction_type(), TransactionType::NamespaceMetadata);
        assert_eq!(b.body_size(), 52 + 1);
        assert_eq!(b.body_values().unwrap().len(), 6);
    }
}
