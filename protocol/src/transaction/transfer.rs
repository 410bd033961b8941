//! Transfers: move mosaics and/or a message to a recipient.

use serde::{Deserialize, Serialize};

use super::body::BodyLayout;
use super::checked_width;
use super::types::TransactionType;
use crate::builder::FieldValue;
use crate::error::TransactionError;
use crate::model::address::ADDRESS_LENGTH;
use crate::model::{Mosaic, Recipient};
use crate::schema::{bytes, table, table_array, ubyte, ushort, var_bytes, words, FieldDescriptor, Schema};

const MESSAGE: &[FieldDescriptor] = &[ubyte("type"), var_bytes("payload")];
pub(crate) const MOSAIC: &[FieldDescriptor] = &[words("id", 2), words("amount", 2)];

pub static TRANSFER: Schema = transaction_schema!(
    "Transfer",
    [
        bytes("recipient", ADDRESS_LENGTH),
        ushort("messageSize"),
        ubyte("numMosaics"),
        table("message", MESSAGE),
        table_array("mosaics", MOSAIC),
    ]
);

/// Bytes per mosaic entry.
pub const MOSAIC_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Plain,
    /// Payload already encrypted by the caller.
    Secure,
}

impl MessageType {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Plain => 0,
            Self::Secure => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Message {
    #[serde(default)]
    pub kind: MessageType,
    #[serde(default)]
    pub payload: Vec<u8>,
}

impl Message {
    pub fn plain(text: &str) -> Self {
        Self {
            kind: MessageType::Plain,
            payload: text.as_bytes().to_vec(),
        }
    }

    pub fn secure(ciphertext: Vec<u8>) -> Self {
        Self {
            kind: MessageType::Secure,
            payload: ciphertext,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Wire `messageSize`: the type byte plus the payload.
    pub fn size(&self) -> usize {
        1 + self.payload.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBody {
    pub recipient: Recipient,
    #[serde(default)]
    pub mosaics: Vec<Mosaic>,
    #[serde(default)]
    pub message: Message,
}

impl TransferBody {
    pub fn new(recipient: Recipient, mosaics: Vec<Mosaic>, message: Message) -> Self {
        Self {
            recipient,
            mosaics,
            message,
        }
    }

    /// Mosaics in the order the network requires: ascending id.
    pub fn sorted_mosaics(&self) -> Vec<Mosaic> {
        let mut mosaics = self.mosaics.clone();
        mosaics.sort_by_key(|m| m.id);
        mosaics
    }
}

impl BodyLayout for TransferBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::Transfer
    }

    fn schema(&self) -> &'static Schema {
        &TRANSFER
    }

    fn body_size(&self) -> usize {
        ADDRESS_LENGTH + 2 + 1 + self.message.size() + MOSAIC_SIZE * self.mosaics.len()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        checked_width("messageSize", self.message.size(), u16::MAX)?;
        checked_width("numMosaics", self.mosaics.len(), u8::MAX)?;
        Ok(())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let mosaics = self
            .sorted_mosaics()
            .into_iter()
            .map(|m| vec![FieldValue::uint64(m.id.id()), FieldValue::uint64(m.amount)])
            .collect();

        Ok(vec![
            FieldValue::bytes(self.recipient.to_bytes()),
            FieldValue::UShort(checked_width("messageSize", self.message.size(), u16::MAX)?),
            FieldValue::UByte(checked_width("numMosaics", self.mosaics.len(), u8::MAX)?),
            FieldValue::Table(vec![
                FieldValue::UByte(self.message.kind.to_u8()),
                FieldValue::Bytes(self.message.payload.clone()),
            ]),
            FieldValue::TableArray(mosaics),
        ])
    }
}
