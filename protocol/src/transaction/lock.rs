//! Hash locks and secret lock/proof pairs.

use serde::{Deserialize, Serialize};

use super::body::BodyLayout;
use super::checked_width;
use super::types::TransactionType;
use super::verifiable::SignedTransaction;
use crate::builder::FieldValue;
use crate::config::HASH_LENGTH;
use crate::error::TransactionError;
use crate::model::address::ADDRESS_LENGTH;
use crate::model::{Hash256, Mosaic, Recipient, Uint64};
use crate::schema::{bytes, ubyte, ushort, var_bytes, words, Schema};

pub static HASH_LOCK: Schema = transaction_schema!(
    "HashLock",
    [
        words("mosaicId", 2),
        words("amount", 2),
        words("duration", 2),
        bytes("hash", HASH_LENGTH),
    ]
);

pub static SECRET_LOCK: Schema = transaction_schema!(
    "SecretLock",
    [
        words("mosaicId", 2),
        words("amount", 2),
        words("duration", 2),
        ubyte("hashAlgorithm"),
        bytes("secret", HASH_LENGTH),
        bytes("recipient", ADDRESS_LENGTH),
    ]
);

pub static SECRET_PROOF: Schema = transaction_schema!(
    "SecretProof",
    [
        ubyte("hashAlgorithm"),
        bytes("secret", HASH_LENGTH),
        bytes("recipient", ADDRESS_LENGTH),
        ushort("proofSize"),
        var_bytes("proof"),
    ]
);

/// Hash function a secret was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashType {
    Sha3_256,
    Keccak256,
    Hash160,
    Sha256,
}

impl HashType {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Sha3_256 => 0,
            Self::Keccak256 => 1,
            Self::Hash160 => 2,
            Self::Sha256 => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// HashLock
// ---------------------------------------------------------------------------

/// Locks funds against the hash of a bonded aggregate until it completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashLockBody {
    pub mosaic: Mosaic,
    pub duration: Uint64,
    pub hash: Hash256,
}

impl HashLockBody {
    /// Locks against a signed bonded aggregate.
    pub fn for_aggregate(
        mosaic: Mosaic,
        duration: impl Into<Uint64>,
        signed: &SignedTransaction,
    ) -> Result<Self, TransactionError> {
        if signed.transaction_type != TransactionType::AggregateBonded {
            return Err(TransactionError::InvalidTransaction(format!(
                "hash lock needs a bonded aggregate, got {}",
                signed.transaction_type
            )));
        }
        Ok(Self {
            mosaic,
            duration: duration.into(),
            hash: Hash256::from_hex(&signed.hash)?,
        })
    }
}

impl BodyLayout for HashLockBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::HashLock
    }

    fn schema(&self) -> &'static Schema {
        &HASH_LOCK
    }

    fn body_size(&self) -> usize {
        8 + 8 + 8 + HASH_LENGTH
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        Ok(vec![
            FieldValue::uint64(self.mosaic.id.id()),
            FieldValue::uint64(self.mosaic.amount),
            FieldValue::uint64(self.duration),
            FieldValue::bytes(self.hash.as_bytes()),
        ])
    }
}

// ---------------------------------------------------------------------------
// SecretLock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretLockBody {
    pub mosaic: Mosaic,
    pub duration: Uint64,
    pub hash_type: HashType,
    pub secret: Hash256,
    pub recipient: Recipient,
}

impl BodyLayout for SecretLockBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::SecretLock
    }

    fn schema(&self) -> &'static Schema {
        &SECRET_LOCK
    }

    fn body_size(&self) -> usize {
        8 + 8 + 8 + 1 + HASH_LENGTH + ADDRESS_LENGTH
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        Ok(vec![
            FieldValue::uint64(self.mosaic.id.id()),
            FieldValue::uint64(self.mosaic.amount),
            FieldValue::uint64(self.duration),
            FieldValue::UByte(self.hash_type.to_u8()),
            FieldValue::bytes(self.secret.as_bytes()),
            FieldValue::bytes(self.recipient.to_bytes()),
        ])
    }
}

// ---------------------------------------------------------------------------
// SecretProof
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretProofBody {
    pub hash_type: HashType,
    pub secret: Hash256,
    pub recipient: Recipient,
    pub proof: Vec<u8>,
}

impl BodyLayout for SecretProofBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::SecretProof
    }

    fn schema(&self) -> &'static Schema {
        &SECRET_PROOF
    }

    fn body_size(&self) -> usize {
        1 + HASH_LENGTH + ADDRESS_LENGTH + 2 + self.proof.len()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        checked_width("proofSize", self.proof.len(), u16::MAX).map(|_| ())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        Ok(vec![
            FieldValue::UByte(self.hash_type.to_u8()),
            FieldValue::bytes(self.secret.as_bytes()),
            FieldValue::bytes(self.recipient.to_bytes()),
            FieldValue::UShort(checked_width("proofSize", self.proof.len(), u16::MAX)?),
            FieldValue::Bytes(self.proof.clone()),
        ])
    }
}
