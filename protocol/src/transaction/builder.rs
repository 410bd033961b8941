//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] carries the header settings shared by every
//! family (network, deadline, fee) and turns a [`TransactionBody`] into an
//! immutable [`Transaction`]. Input is validated here, before a single byte
//! is encoded.
//!
//! The builder does not sign. That happens on the
//! [`VerifiableTransaction`] a transaction encodes into, which keeps
//! construction testable without key material.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::body::{BodyLayout, TransactionBody};
use super::checked_width;
use super::types::TransactionType;
use super::verifiable::{SignedTransaction, VerifiableTransaction};
use crate::builder::{BufferBuilder, FieldValue};
use crate::config::{FeeStrategy, NetworkConfig, HEADER_SIZE};
use crate::crypto::{PublicKey, TransactionSigner};
use crate::error::TransactionError;
use crate::model::{Deadline, NetworkType, Uint64};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// An unsigned transaction: the common header settings plus one body.
///
/// Immutable once built. Every finalization step goes through
/// [`Transaction::to_verifiable`], which re-runs validation, so a
/// transaction that arrived through `serde` is checked before encoding
/// just like one from the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    network_type: NetworkType,
    deadline: Deadline,
    max_fee: Uint64,
    body: TransactionBody,
}

impl Transaction {
    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn max_fee(&self) -> Uint64 {
        self.max_fee
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.body.transaction_type()
    }

    /// The wire `version` field: network byte over entity version.
    pub fn version(&self) -> u32 {
        self.network_type
            .version_field(self.transaction_type().version())
    }

    /// Length of the canonical payload this transaction encodes to.
    pub fn calculate_size(&self) -> usize {
        HEADER_SIZE + self.body.body_size()
    }

    pub fn validate(&self) -> Result<(), TransactionError> {
        self.body.validate()?;
        if let TransactionBody::Aggregate(aggregate) = &self.body {
            if let Some(inner) = aggregate
                .inner
                .iter()
                .find(|inner| inner.transaction.network_type != self.network_type)
            {
                return Err(TransactionError::InvalidTransaction(format!(
                    "inner {} is for {}, aggregate is for {}",
                    inner.transaction.transaction_type(),
                    inner.transaction.network_type,
                    self.network_type
                )));
            }
        }
        Ok(())
    }

    fn header_values(&self, size: usize) -> Result<Vec<FieldValue>, TransactionError> {
        Ok(vec![
            FieldValue::UInt(checked_width("size", size, u32::MAX)?),
            FieldValue::Absent,
            FieldValue::Absent,
            FieldValue::UInt(self.version()),
            FieldValue::UShort(self.transaction_type().code()),
            FieldValue::uint64(self.max_fee),
            FieldValue::uint64(self.deadline.value()),
        ])
    }

    /// Encodes into a self-describing buffer bound to this transaction's
    /// layout.
    pub fn to_verifiable(&self) -> Result<VerifiableTransaction, TransactionError> {
        self.validate()?;
        let layout = self.body.layout();
        let schema = layout.schema();
        let size = self.calculate_size();

        let mut values = self.header_values(size)?;
        values.extend(layout.body_values()?);
        let buffer = BufferBuilder::with_capacity(schema, size * 2).build(&values)?;
        debug!(
            transaction = schema.name,
            size,
            buffer = buffer.as_bytes().len(),
            "encoded transaction"
        );

        Ok(VerifiableTransaction::new(
            schema,
            buffer,
            size,
            self.transaction_type(),
            self.network_type,
        ))
    }

    /// Canonical unsigned payload.
    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        self.to_verifiable()?.serialize()
    }

    pub fn sign<S: TransactionSigner + ?Sized>(
        &self,
        signer: &S,
        generation_hash: &[u8; 32],
    ) -> Result<SignedTransaction, TransactionError> {
        self.to_verifiable()?.sign(signer, generation_hash)
    }

    /// Embedded form for inclusion in an aggregate, signed by `signer`.
    pub fn to_aggregate(&self, signer: &PublicKey) -> Result<Vec<u8>, TransactionError> {
        self.to_verifiable()?.to_aggregate(signer)
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Transaction`]s.
///
/// # Example
///
/// ```
/// use catapult_tx::model::{Mosaic, MosaicId, NetworkType, Recipient};
/// use catapult_tx::transaction::{Message, TransactionBuilder, TransferBody};
///
/// let tx = TransactionBuilder::new(NetworkType::TestNet)
///     .max_fee(0u64)
///     .build(TransferBody::new(
///         Recipient::parse("85BBEA6CC462B244").unwrap(),
///         vec![Mosaic::new(MosaicId::new(1u64.into()), 10u64)],
///         Message::plain("hello"),
///     ))
///     .unwrap();
/// assert_eq!(tx.calculate_size(), 122 + 29 + 5 + 16);
/// ```
///
/// Defaults: a deadline two hours out, and a max fee derived from the
/// encoded size with [`FeeStrategy::Middle`].
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    network_type: NetworkType,
    deadline: Option<Deadline>,
    max_fee: Option<Uint64>,
    fee_strategy: FeeStrategy,
}

impl TransactionBuilder {
    pub fn new(network_type: NetworkType) -> Self {
        Self {
            network_type,
            deadline: None,
            max_fee: None,
            fee_strategy: FeeStrategy::default(),
        }
    }

    /// Network, fee strategy and deadline window from a loaded config.
    pub fn from_config(config: &NetworkConfig) -> Result<Self, TransactionError> {
        Ok(Self {
            network_type: config.network_type,
            deadline: Some(Deadline::create(config.deadline_hours)?),
            max_fee: None,
            fee_strategy: config.fee_strategy,
        })
    }

    pub fn deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fixed max fee. Overrides the fee strategy.
    pub fn max_fee(mut self, max_fee: impl Into<Uint64>) -> Self {
        self.max_fee = Some(max_fee.into());
        self
    }

    pub fn fee_strategy(mut self, strategy: FeeStrategy) -> Self {
        self.fee_strategy = strategy;
        self
    }

    /// Validates `body` and produces a [`Transaction`].
    pub fn build(self, body: impl Into<TransactionBody>) -> Result<Transaction, TransactionError> {
        let body = body.into();
        body.validate()?;

        let mut tx = Transaction {
            network_type: self.network_type,
            deadline: self.deadline.unwrap_or_default(),
            max_fee: Uint64::ZERO,
            body,
        };
        tx.max_fee = match self.max_fee {
            Some(fee) => fee,
            None => Uint64::from_u64(tx.calculate_size() as u64)
                .checked_mul(Uint64::from_u64(self.fee_strategy.multiplier()))?,
        };
        tx.validate()?;

        debug!(
            transaction_type = %tx.transaction_type(),
            network = %tx.network_type,
            max_fee = tx.max_fee.to_u64(),
            "built transaction"
        );
        Ok(tx)
    }

    /// Chain upgrades are recognized but have no encoder.
    pub fn chain_upgrade(self) -> Result<Transaction, TransactionError> {
        Err(TransactionError::UnsupportedTransactionType(
            TransactionType::ChainUpgrade.to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEADLINE_OFFSET, MAX_FEE_OFFSET, TYPE_OFFSET, VERSION_OFFSET};
    use crate::model::{Mosaic, MosaicId, Recipient};
    use crate::transaction::aggregate::{AggregateBody, InnerTransaction};
    use crate::transaction::namespace::RegisterNamespaceBody;
    use crate::transaction::transfer::{Message, TransferBody};

    fn transfer() -> TransferBody {
        TransferBody::new(
            Recipient::parse("85BBEA6CC462B244").unwrap(),
            vec![Mosaic::new(MosaicId::new(0x0DC6_7FBE_1CAD_29E3u64.into()), 1_000u64)],
            Message::plain("hi"),
        )
    }

    #[test]
    fn header_fields_land_at_fixed_offsets() {
        let tx = TransactionBuilder::new(NetworkType::MijinTest)
            .deadline(Deadline::from_network_millis(0x0102_0304_0506))
            .max_fee(0x11u64)
            .build(transfer())
            .unwrap();
        let bytes = tx.serialize().unwrap();

        assert_eq!(bytes.len(), tx.calculate_size());
        assert_eq!(&bytes[..4], &(bytes.len() as u32).to_le_bytes());
        assert!(bytes[4..100].iter().all(|b| *b == 0));
        assert_eq!(&bytes[VERSION_OFFSET..VERSION_OFFSET + 4], &[3, 0, 0, 0x90]);
        assert_eq!(&bytes[TYPE_OFFSET..TYPE_OFFSET + 2], &[0x54, 0x41]);
        assert_eq!(&bytes[MAX_FEE_OFFSET..MAX_FEE_OFFSET + 8], &[0x11, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            &bytes[DEADLINE_OFFSET..DEADLINE_OFFSET + 8],
            &[6, 5, 4, 3, 2, 1, 0, 0]
        );
    }

    #[test]
    fn fee_strategy_multiplies_size() {
        let tx = TransactionBuilder::new(NetworkType::TestNet)
            .fee_strategy(FeeStrategy::Low)
            .build(transfer())
            .unwrap();
        assert_eq!(tx.max_fee().to_u64(), tx.calculate_size() as u64 * 25);

        let free = TransactionBuilder::new(NetworkType::TestNet)
            .fee_strategy(FeeStrategy::Zero)
            .build(transfer())
            .unwrap();
        assert!(free.max_fee().is_zero());
    }

    #[test]
    fn explicit_fee_wins() {
        let tx = TransactionBuilder::new(NetworkType::TestNet)
            .fee_strategy(FeeStrategy::High)
            .max_fee(7u64)
            .build(transfer())
            .unwrap();
        assert_eq!(tx.max_fee().to_u64(), 7);
    }

    #[test]
    fn invalid_body_rejected_before_encoding() {
        let body = RegisterNamespaceBody::Root {
            name: "Bad Name".into(),
            duration: 100u64.into(),
        };
        assert!(matches!(
            TransactionBuilder::new(NetworkType::TestNet).build(body),
            Err(TransactionError::InvalidName(_))
        ));
    }

    #[test]
    fn chain_upgrade_is_unsupported() {
        assert_eq!(
            TransactionBuilder::new(NetworkType::TestNet).chain_upgrade(),
            Err(TransactionError::UnsupportedTransactionType(
                "ChainUpgrade".into()
            ))
        );
    }

    #[test]
    fn inner_network_must_match() {
        let inner = TransactionBuilder::new(NetworkType::MainNet)
            .build(transfer())
            .unwrap();
        let body = AggregateBody::complete(vec![InnerTransaction::new(
            crate::crypto::PublicKey::from_bytes([1; 32]),
            inner,
        )]);
        assert!(matches!(
            TransactionBuilder::new(NetworkType::TestNet).build(body),
            Err(TransactionError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn transaction_json_roundtrip() {
        let tx = TransactionBuilder::new(NetworkType::TestNet)
            .max_fee(1u64)
            .build(transfer())
            .unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
        assert_eq!(back.serialize().unwrap(), tx.serialize().unwrap());
    }
}
