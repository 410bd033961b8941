//! Network configuration updates.
//!
//! Chain upgrades share the same family on the network but have no encoder
//! here; [`crate::transaction::TransactionBuilder::chain_upgrade`] always
//! fails.

use serde::{Deserialize, Serialize};

use super::body::BodyLayout;
use super::checked_width;
use super::types::TransactionType;
use crate::builder::FieldValue;
use crate::error::TransactionError;
use crate::model::Uint64;
use crate::schema::{ushort, var_bytes, words, Schema};

pub static CHAIN_CONFIG: Schema = transaction_schema!(
    "ChainConfig",
    [
        words("applyHeightDelta", 2),
        ushort("blockChainConfigSize"),
        ushort("supportedEntityVersionsSize"),
        var_bytes("blockChainConfig"),
        var_bytes("supportedEntityVersions"),
    ]
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfigBody {
    pub apply_height_delta: Uint64,
    /// Network properties file contents.
    pub blockchain_config: String,
    /// JSON list of supported entity versions.
    pub supported_entity_versions: String,
}

impl BodyLayout for ChainConfigBody {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ChainConfig
    }

    fn schema(&self) -> &'static Schema {
        &CHAIN_CONFIG
    }

    fn body_size(&self) -> usize {
        8 + 2 + 2 + self.blockchain_config.len() + self.supported_entity_versions.len()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        checked_width("blockChainConfigSize", self.blockchain_config.len(), u16::MAX)?;
        checked_width(
            "supportedEntityVersionsSize",
            self.supported_entity_versions.len(),
            u16::MAX,
        )?;
        Ok(())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let config = self.blockchain_config.as_bytes();
        let versions = self.supported_entity_versions.as_bytes();
        Ok(vec![
            FieldValue::uint64(self.apply_height_delta),
            FieldValue::UShort(checked_width("blockChainConfigSize", config.len(), u16::MAX)?),
            FieldValue::UShort(checked_width(
                "supportedEntityVersionsSize",
                versions.len(),
                u16::MAX,
            )?),
            FieldValue::bytes(config),
            FieldValue::bytes(versions),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_both_strings() {
        let body = ChainConfigBody {
            apply_height_delta: 10u64.into(),
            blockchain_config: "[network]\nidentifier = mijin-test".to_string(),
            supported_entity_versions: "{}".to_string(),
        };
        assert_eq!(body.body_size(), 12 + 33 + 2);
        let values = body.body_values().unwrap();
        assert_eq!(values[1], FieldValue::UShort(33));
        assert_eq!(values[2], FieldValue::UShort(2));
    }
}
