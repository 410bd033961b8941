//! Multisig account modification.

use serde::{Deserialize, Serialize};

use super::body::BodyLayout;
use super::checked_width;
use super::types::TransactionType;
use crate::builder::FieldValue;
use crate::config::PUBLIC_KEY_LENGTH;
use crate::crypto::PublicKey;
use crate::error::TransactionError;
use crate::schema::{bytes, table_array, ubyte, FieldDescriptor, Schema};

/// `{type, key}`: also used by contract modifications.
pub(crate) const COSIGNATORY_MODIFICATION: &[FieldDescriptor] =
    &[ubyte("type"), bytes("cosignatoryPublicKey", PUBLIC_KEY_LENGTH)];

pub static MODIFY_MULTISIG: Schema = transaction_schema!(
    "ModifyMultisigAccount",
    [
        ubyte("minRemovalDelta"),
        ubyte("minApprovalDelta"),
        ubyte("numModifications"),
        table_array("modifications", COSIGNATORY_MODIFICATION),
    ]
);

pub const MODIFICATION_SIZE: usize = 1 + PUBLIC_KEY_LENGTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationType {
    Add,
    Remove,
}

impl ModificationType {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Remove => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CosignatoryModification {
    #[serde(rename = "type")]
    pub kind: ModificationType,
    pub public_key: PublicKey,
}

impl CosignatoryModification {
    pub fn add(public_key: PublicKey) -> Self {
        Self {
            kind: ModificationType::Add,
            public_key,
        }
    }

    pub fn remove(public_key: PublicKey) -> Self {
        Self {
            kind: ModificationType::Remove,
            public_key,
        }
    }

    pub(crate) fn to_values(self) -> Vec<FieldValue> {
        vec![
            FieldValue::UByte(self.kind.to_u8()),
            FieldValue::bytes(self.public_key.as_bytes()),
        ]
    }
}

/// Encodes a list of modifications as a table array.
pub(crate) fn modification_rows(modifications: &[CosignatoryModification]) -> FieldValue {
    FieldValue::TableArray(modifications.iter().map(|m| m.to_values()).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyMultisigBody {
    pub min_removal_delta: i8,
    pub min_approval_delta: i8,
    pub modifications: Vec<CosignatoryModification>,
}

impl BodyLayout for ModifyMultisigBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ModifyMultisigAccount
    }

    fn schema(&self) -> &'static Schema {
        &MODIFY_MULTISIG
    }

    fn body_size(&self) -> usize {
        3 + MODIFICATION_SIZE * self.modifications.len()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        checked_width("numModifications", self.modifications.len(), u8::MAX).map(|_| ())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        Ok(vec![
            FieldValue::UByte(self.min_removal_delta as u8),
            FieldValue::UByte(self.min_approval_delta as u8),
            FieldValue::UByte(checked_width("numModifications", self.modifications.len(), u8::MAX)?),
            modification_rows(&self.modifications),
        ])
    }
}
