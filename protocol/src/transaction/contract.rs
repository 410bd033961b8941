//! Contract modification: duration change plus customer, executor and
//! verifier key lists.

use serde::{Deserialize, Serialize};

use super::body::BodyLayout;
use super::checked_width;
use super::multisig::{modification_rows, CosignatoryModification, COSIGNATORY_MODIFICATION, MODIFICATION_SIZE};
use super::types::TransactionType;
use crate::builder::FieldValue;
use crate::config::HASH_LENGTH;
use crate::error::TransactionError;
use crate::model::{Hash256, Uint64};
use crate::schema::{bytes, table_array, ubyte, words, Schema};

pub static MODIFY_CONTRACT: Schema = transaction_schema!(
    "ModifyContract",
    [
        words("durationDelta", 2),
        bytes("hash", HASH_LENGTH),
        ubyte("numCustomers"),
        ubyte("numExecutors"),
        ubyte("numVerifiers"),
        table_array("customers", COSIGNATORY_MODIFICATION),
        table_array("executors", COSIGNATORY_MODIFICATION),
        table_array("verifiers", COSIGNATORY_MODIFICATION),
    ]
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyContractBody {
    /// Signed; negative deltas shorten the contract.
    pub duration_delta: i64,
    pub hash: Hash256,
    #[serde(default)]
    pub customers: Vec<CosignatoryModification>,
    #[serde(default)]
    pub executors: Vec<CosignatoryModification>,
    #[serde(default)]
    pub verifiers: Vec<CosignatoryModification>,
}

impl ModifyContractBody {
    fn lists(&self) -> [(&'static str, &[CosignatoryModification]); 3] {
        [
            ("numCustomers", &self.customers),
            ("numExecutors", &self.executors),
            ("numVerifiers", &self.verifiers),
        ]
    }
}

impl BodyLayout for ModifyContractBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ModifyContract
    }

    fn schema(&self) -> &'static Schema {
        &MODIFY_CONTRACT
    }

    fn body_size(&self) -> usize {
        let total: usize = self.lists().iter().map(|(_, list)| list.len()).sum();
        8 + HASH_LENGTH + 3 + MODIFICATION_SIZE * total
    }

    fn validate(&self) -> Result<(), TransactionError> {
        for (field, list) in self.lists() {
            checked_width(field, list.len(), u8::MAX)?;
        }
        Ok(())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let mut values = vec![
            FieldValue::uint64(Uint64::from_u64(self.duration_delta as u64)),
            FieldValue::bytes(self.hash.as_bytes()),
        ];
        for (field, list) in self.lists() {
            values.push(FieldValue::UByte(checked_width(field, list.len(), u8::MAX)?));
        }
        for (_, list) in self.lists() {
            values.push(modification_rows(list));
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PublicKey;

    #[test]
    fn size_counts_all_three_lists() {
        let key = PublicKey::from_bytes([5; 32]);
        let body = ModifyContractBody {
            duration_delta: -10,
            hash: Hash256::from_bytes([9; 32]),
            customers: vec![CosignatoryModification::add(key)],
            executors: vec![CosignatoryModification::add(key), CosignatoryModification::remove(key)],
            verifiers: vec![],
        };
        assert_eq!(body.body_size(), 43 + 3 * 33);
        let values = body.body_values().unwrap();
        assert_eq!(values[0], FieldValue::Words(vec![0xFFFF_FFF6, 0xFFFF_FFFF]));
        assert_eq!(values[3], FieldValue::UByte(2));
        assert_eq!(values.len(), 8);
    }
}
