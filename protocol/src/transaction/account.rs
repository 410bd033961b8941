//! Account link (remote harvesting key) and account property filters.

use serde::{Deserialize, Serialize};

use super::body::BodyLayout;
use super::checked_width;
use super::types::TransactionType;
use crate::builder::FieldValue;
use crate::config::PUBLIC_KEY_LENGTH;
use crate::crypto::PublicKey;
use crate::error::TransactionError;
use crate::model::address::ADDRESS_LENGTH;
use crate::model::{Address, MosaicId};
use crate::schema::{bytes, table_array, ubyte, var_bytes, FieldDescriptor, Schema};

pub static ACCOUNT_LINK: Schema = transaction_schema!(
    "AccountLink",
    [bytes("remotePublicKey", PUBLIC_KEY_LENGTH), ubyte("linkAction")]
);

const PROPERTY_MODIFICATION: &[FieldDescriptor] = &[ubyte("modificationType"), var_bytes("value")];

pub static ACCOUNT_PROPERTY_ADDRESS: Schema = transaction_schema!(
    "AccountPropertyAddress",
    [
        ubyte("propertyType"),
        ubyte("modificationCount"),
        table_array("modifications", PROPERTY_MODIFICATION),
    ]
);

pub static ACCOUNT_PROPERTY_MOSAIC: Schema = transaction_schema!(
    "AccountPropertyMosaic",
    [
        ubyte("propertyType"),
        ubyte("modificationCount"),
        table_array("modifications", PROPERTY_MODIFICATION),
    ]
);

pub static ACCOUNT_PROPERTY_ENTITY_TYPE: Schema = transaction_schema!(
    "AccountPropertyEntityType",
    [
        ubyte("propertyType"),
        ubyte("modificationCount"),
        table_array("modifications", PROPERTY_MODIFICATION),
    ]
);

// ---------------------------------------------------------------------------
// AccountLink
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkAction {
    Link,
    Unlink,
}

impl LinkAction {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Link => 0,
            Self::Unlink => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLinkBody {
    pub remote_public_key: PublicKey,
    pub action: LinkAction,
}

impl BodyLayout for AccountLinkBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::AccountLink
    }

    fn schema(&self) -> &'static Schema {
        &ACCOUNT_LINK
    }

    fn body_size(&self) -> usize {
        PUBLIC_KEY_LENGTH + 1
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        Ok(vec![
            FieldValue::bytes(self.remote_public_key.as_bytes()),
            FieldValue::UByte(self.action.to_u8()),
        ])
    }
}

// ---------------------------------------------------------------------------
// AccountProperties
// ---------------------------------------------------------------------------

/// Whether listed values are the only ones allowed or the ones blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyRule {
    Allow,
    Block,
}

const BLOCK_FLAG: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyModificationType {
    Add,
    Remove,
}

impl PropertyModificationType {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Remove => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyModification<T> {
    #[serde(rename = "type")]
    pub kind: PropertyModificationType,
    pub value: T,
}

impl<T> PropertyModification<T> {
    pub fn add(value: T) -> Self {
        Self {
            kind: PropertyModificationType::Add,
            value,
        }
    }

    pub fn remove(value: T) -> Self {
        Self {
            kind: PropertyModificationType::Remove,
            value,
        }
    }
}

/// Filters on incoming addresses, mosaics or outgoing transaction types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountPropertiesBody {
    Address {
        rule: PropertyRule,
        modifications: Vec<PropertyModification<Address>>,
    },
    Mosaic {
        rule: PropertyRule,
        modifications: Vec<PropertyModification<MosaicId>>,
    },
    EntityType {
        rule: PropertyRule,
        modifications: Vec<PropertyModification<TransactionType>>,
    },
}

impl AccountPropertiesBody {
    fn rule(&self) -> PropertyRule {
        match self {
            Self::Address { rule, .. } | Self::Mosaic { rule, .. } | Self::EntityType { rule, .. } => {
                *rule
            }
        }
    }

    /// Wire `propertyType`: the kind bit, with the top bit set for block lists.
    pub fn property_type(&self) -> u8 {
        let base = match self {
            Self::Address { .. } => 0x01,
            Self::Mosaic { .. } => 0x02,
            Self::EntityType { .. } => 0x04,
        };
        match self.rule() {
            PropertyRule::Allow => base,
            PropertyRule::Block => base | BLOCK_FLAG,
        }
    }

    fn value_size(&self) -> usize {
        match self {
            Self::Address { .. } => ADDRESS_LENGTH,
            Self::Mosaic { .. } => 8,
            Self::EntityType { .. } => 2,
        }
    }

    fn modification_count(&self) -> usize {
        match self {
            Self::Address { modifications, .. } => modifications.len(),
            Self::Mosaic { modifications, .. } => modifications.len(),
            Self::EntityType { modifications, .. } => modifications.len(),
        }
    }

    fn rows(&self) -> Vec<Vec<FieldValue>> {
        fn row(kind: PropertyModificationType, value: Vec<u8>) -> Vec<FieldValue> {
            vec![FieldValue::UByte(kind.to_u8()), FieldValue::Bytes(value)]
        }
        match self {
            Self::Address { modifications, .. } => modifications
                .iter()
                .map(|m| row(m.kind, m.value.as_bytes().to_vec()))
                .collect(),
            Self::Mosaic { modifications, .. } => modifications
                .iter()
                .map(|m| row(m.kind, m.value.id().to_le_bytes().to_vec()))
                .collect(),
            Self::EntityType { modifications, .. } => modifications
                .iter()
                .map(|m| row(m.kind, m.value.code().to_le_bytes().to_vec()))
                .collect(),
        }
    }
}

impl BodyLayout for AccountPropertiesBody {
    fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Address { .. } => TransactionType::AccountPropertyAddress,
            Self::Mosaic { .. } => TransactionType::AccountPropertyMosaic,
            Self::EntityType { .. } => TransactionType::AccountPropertyEntityType,
        }
    }

    fn schema(&self) -> &'static Schema {
        match self {
            Self::Address { .. } => &ACCOUNT_PROPERTY_ADDRESS,
            Self::Mosaic { .. } => &ACCOUNT_PROPERTY_MOSAIC,
            Self::EntityType { .. } => &ACCOUNT_PROPERTY_ENTITY_TYPE,
        }
    }

    fn body_size(&self) -> usize {
        2 + self.modification_count() * (1 + self.value_size())
    }

    fn validate(&self) -> Result<(), TransactionError> {
        checked_width("modificationCount", self.modification_count(), u8::MAX).map(|_| ())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        Ok(vec![
            FieldValue::UByte(self.property_type()),
            FieldValue::UByte(checked_width(
                "modificationCount",
                self.modification_count(),
                u8::MAX,
            )?),
            FieldValue::TableArray(self.rows()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_bits() {
        let allow = AccountPropertiesBody::Mosaic {
            rule: PropertyRule::Allow,
            modifications: vec![],
        };
        let block = AccountPropertiesBody::EntityType {
            rule: PropertyRule::Block,
            modifications: vec![],
        };
        assert_eq!(allow.property_type(), 0x02);
        assert_eq!(block.property_type(), 0x84);
    }

    #[test]
    fn entity_type_values_are_le_codes() {
        let body = AccountPropertiesBody::EntityType {
            rule: PropertyRule::Allow,
            modifications: vec![PropertyModification::add(TransactionType::Transfer)],
        };
        assert_eq!(body.body_size(), 2 + 3);
        let values = body.body_values().unwrap();
        assert_eq!(
            values[2],
            FieldValue::TableArray(vec![vec![
                FieldValue::UByte(0),
                FieldValue::Bytes(vec![0x54, 0x41])
            ]])
        );
    }

    #[test]
    fn address_modifications_are_25_bytes() {
        let address = Address::from_bytes([0xA8; ADDRESS_LENGTH]);
        let body = AccountPropertiesBody::Address {
            rule: PropertyRule::Block,
            modifications: vec![
                PropertyModification::add(address),
                PropertyModification::remove(address),
            ],
        };
        assert_eq!(body.body_size(), 2 + 2 * 26);
        assert_eq!(body.transaction_type(), TransactionType::AccountPropertyAddress);
    }
}
