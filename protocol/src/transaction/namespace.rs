//! Namespace registration and aliases.

use serde::{Deserialize, Serialize};

use super::body::BodyLayout;
use super::types::TransactionType;
use crate::builder::FieldValue;
use crate::error::TransactionError;
use crate::model::address::ADDRESS_LENGTH;
use crate::model::{validate_part, Address, MosaicId, NamespaceId, Uint64};
use crate::schema::{bytes, ubyte, var_bytes, words, Schema};

pub static REGISTER_NAMESPACE: Schema = transaction_schema!(
    "RegisterNamespace",
    [
        ubyte("namespaceType"),
        words("durationParentId", 2),
        words("namespaceId", 2),
        ubyte("namespaceNameSize"),
        var_bytes("name"),
    ]
);

pub static ADDRESS_ALIAS: Schema = transaction_schema!(
    "AddressAlias",
    [
        ubyte("aliasAction"),
        words("namespaceId", 2),
        bytes("address", ADDRESS_LENGTH),
    ]
);

pub static MOSAIC_ALIAS: Schema = transaction_schema!(
    "MosaicAlias",
    [ubyte("aliasAction"), words("namespaceId", 2), words("mosaicId", 2)]
);

// ---------------------------------------------------------------------------
// RegisterNamespace
// ---------------------------------------------------------------------------

/// A root namespace is rented for a duration; a child hangs off a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterNamespaceBody {
    Root { name: String, duration: Uint64 },
    Child { name: String, parent_id: NamespaceId },
}

impl RegisterNamespaceBody {
    pub fn root(name: &str, duration: impl Into<Uint64>) -> Self {
        Self::Root {
            name: name.to_string(),
            duration: duration.into(),
        }
    }

    /// A child of the namespace at `parent_path` (e.g. `"prx"`).
    pub fn child(name: &str, parent_path: &str) -> Result<Self, TransactionError> {
        Ok(Self::Child {
            name: name.to_string(),
            parent_id: NamespaceId::from_name(parent_path)?,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Root { name, .. } | Self::Child { name, .. } => name,
        }
    }

    /// The id the registered namespace will have.
    pub fn namespace_id(&self) -> Result<NamespaceId, TransactionError> {
        match self {
            Self::Root { name, .. } => NamespaceId::child(NamespaceId::ROOT_PARENT, name),
            Self::Child { name, parent_id } => NamespaceId::child(*parent_id, name),
        }
    }
}

impl BodyLayout for RegisterNamespaceBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::RegisterNamespace
    }

    fn schema(&self) -> &'static Schema {
        &REGISTER_NAMESPACE
    }

    fn body_size(&self) -> usize {
        1 + 8 + 8 + 1 + self.name().len()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        validate_part(self.name())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let (kind, duration_or_parent) = match self {
            Self::Root { duration, .. } => (0u8, *duration),
            Self::Child { parent_id, .. } => (1u8, parent_id.id()),
        };
        let name = self.name().as_bytes();
        Ok(vec![
            FieldValue::UByte(kind),
            FieldValue::uint64(duration_or_parent),
            FieldValue::uint64(self.namespace_id()?.id()),
            FieldValue::UByte(super::checked_width("namespaceNameSize", name.len(), u8::MAX)?),
            FieldValue::bytes(name),
        ])
    }
}

// ---------------------------------------------------------------------------
// Aliases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasAction {
    Link,
    Unlink,
}

impl AliasAction {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Link => 0,
            Self::Unlink => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressAliasBody {
    pub action: AliasAction,
    pub namespace_id: NamespaceId,
    pub address: Address,
}

impl BodyLayout for AddressAliasBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::AddressAlias
    }

    fn schema(&self) -> &'static Schema {
        &ADDRESS_ALIAS
    }

    fn body_size(&self) -> usize {
        1 + 8 + ADDRESS_LENGTH
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        Ok(vec![
            FieldValue::UByte(self.action.to_u8()),
            FieldValue::uint64(self.namespace_id.id()),
            FieldValue::bytes(self.address.as_bytes()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicAliasBody {
    pub action: AliasAction,
    pub namespace_id: NamespaceId,
    pub mosaic_id: MosaicId,
}

impl BodyLayout for MosaicAliasBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::MosaicAlias
    }

    fn schema(&self) -> &'static Schema {
        &MOSAIC_ALIAS
    }

    fn body_size(&self) -> usize {
        1 + 8 + 8
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        Ok(vec![
            FieldValue::UByte(self.action.to_u8()),
            FieldValue::uint64(self.namespace_id.id()),
            FieldValue::uint64(self.mosaic_id.id()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_registration_values() {
        let body = RegisterNamespaceBody::root("nem", 1000u64);
        assert_eq!(body.body_size(), 21);
        let values = body.body_values().unwrap();
        assert_eq!(values[0], FieldValue::UByte(0));
        assert_eq!(values[1], FieldValue::uint64(1000u64.into()));
        assert_eq!(values[2], FieldValue::uint64(NamespaceId::from_name("nem").unwrap().id()));
        assert_eq!(values[3], FieldValue::UByte(3));
    }

    #[test]
    fn child_registration_derives_from_parent() {
        let body = RegisterNamespaceBody::child("xem", "nem").unwrap();
        assert_eq!(
            body.namespace_id().unwrap(),
            NamespaceId::from_name("nem.xem").unwrap()
        );
        assert_eq!(body.body_values().unwrap()[0], FieldValue::UByte(1));
    }

    #[test]
    fn dotted_name_is_not_a_single_level() {
        let body = RegisterNamespaceBody::root("nem.xem", 10u64);
        assert!(matches!(body.validate(), Err(TransactionError::InvalidName(_))));
    }

    #[test]
    fn alias_sizes() {
        let mosaic_alias = MosaicAliasBody {
            action: AliasAction::Link,
            namespace_id: NamespaceId::from_name("prx.xpx").unwrap(),
            mosaic_id: MosaicId::new(1u64.into()),
        };
        assert_eq!(mosaic_alias.body_size(), 17);
    }
}
