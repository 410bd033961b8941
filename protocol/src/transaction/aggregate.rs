//! Aggregates: several inner transactions announced and signed as one.
//!
//! Inner transactions are carried in their embedded form (see
//! [`super::verifiable::to_aggregate_bytes`]). The aggregate's own
//! signature covers everything up to the end of the embedded list; the
//! cosignatures of other parties are appended after that and only the size
//! prefix is updated, so the hash announced for a bonded aggregate stays
//! valid as cosignatures arrive.
//!
//! ```text
//! header(122) | payloadSize:u32 | embedded... | (cosigner:32 | signature:64)...
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::body::BodyLayout;
use super::builder::Transaction;
use super::checked_width;
use super::cosignature::CosignatureSignedTransaction;
use super::types::TransactionType;
use super::verifiable::{SignedTransaction, VerifiableTransaction};
use crate::builder::FieldValue;
use crate::config::{
    COSIGNATURE_SIZE, EMBEDDED_HEADER_SIZE, HASH_LENGTH, HEADER_SIZE, PUBLIC_KEY_LENGTH,
    SIZE_PREFIX_LENGTH,
};
use crate::crypto::{verify_signature, DerivationScheme, PublicKey, Signature, TransactionSigner};
use crate::error::TransactionError;
use crate::schema::{uint, var_bytes, Schema};

pub static AGGREGATE: Schema = transaction_schema!(
    "Aggregate",
    [uint("payloadSize"), var_bytes("transactions")]
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    /// All cosignatures present at announcement.
    Complete,
    /// Announced behind a hash lock; cosignatures collected afterwards.
    Bonded,
}

/// A transaction to embed, and the account that signs for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerTransaction {
    pub signer: PublicKey,
    pub transaction: Transaction,
}

impl InnerTransaction {
    pub fn new(signer: PublicKey, transaction: Transaction) -> Self {
        Self {
            signer,
            transaction,
        }
    }

    /// Embedded length: the full size less signature, fee and deadline.
    pub fn embedded_size(&self) -> usize {
        self.transaction.calculate_size() - (HEADER_SIZE - EMBEDDED_HEADER_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateBody {
    pub kind: AggregateKind,
    pub inner: Vec<InnerTransaction>,
}

impl AggregateBody {
    pub fn complete(inner: Vec<InnerTransaction>) -> Self {
        Self {
            kind: AggregateKind::Complete,
            inner,
        }
    }

    pub fn bonded(inner: Vec<InnerTransaction>) -> Self {
        Self {
            kind: AggregateKind::Bonded,
            inner,
        }
    }

    /// Bytes of embedded transactions.
    pub fn payload_size(&self) -> usize {
        self.inner.iter().map(InnerTransaction::embedded_size).sum()
    }
}

impl BodyLayout for AggregateBody {
    fn transaction_type(&self) -> TransactionType {
        match self.kind {
            AggregateKind::Complete => TransactionType::AggregateComplete,
            AggregateKind::Bonded => TransactionType::AggregateBonded,
        }
    }

    fn schema(&self) -> &'static Schema {
        &AGGREGATE
    }

    fn body_size(&self) -> usize {
        SIZE_PREFIX_LENGTH + self.payload_size()
    }

    fn validate(&self) -> Result<(), TransactionError> {
        for inner in &self.inner {
            let kind = inner.transaction.transaction_type();
            if kind.is_aggregate() {
                return Err(TransactionError::InvalidTransaction(format!(
                    "{kind} cannot be nested inside an aggregate"
                )));
            }
            inner.transaction.validate()?;
        }
        checked_width("payloadSize", self.payload_size(), u32::MAX)?;
        Ok(())
    }

    fn body_values(&self) -> Result<Vec<FieldValue>, TransactionError> {
        let mut embedded = Vec::with_capacity(self.payload_size());
        for inner in &self.inner {
            embedded.extend(inner.transaction.to_aggregate(&inner.signer)?);
        }
        Ok(vec![
            FieldValue::UInt(checked_width("payloadSize", embedded.len(), u32::MAX)?),
            FieldValue::Bytes(embedded),
        ])
    }
}

// ---------------------------------------------------------------------------
// Cosigned signing
// ---------------------------------------------------------------------------

fn require_aggregate(kind: TransactionType) -> Result<(), TransactionError> {
    if kind.is_aggregate() {
        Ok(())
    } else {
        Err(TransactionError::InvalidTransaction(format!(
            "{kind} does not take cosignatures"
        )))
    }
}

/// Appends `signer ++ signature` records and rewrites the size prefix.
fn append_cosignatures(
    payload: &mut Vec<u8>,
    records: impl IntoIterator<Item = (PublicKey, Signature)>,
) -> Result<(), TransactionError> {
    for (signer, signature) in records {
        payload.extend_from_slice(signer.as_bytes());
        payload.extend_from_slice(signature.as_bytes());
    }
    let size = checked_width("size", payload.len(), u32::MAX)?;
    payload[..SIZE_PREFIX_LENGTH].copy_from_slice(&size.to_le_bytes());
    Ok(())
}

impl VerifiableTransaction {
    /// Signs an aggregate and has each cosignatory sign its hash.
    ///
    /// The returned hash is the one computed before any cosignature was
    /// appended.
    pub fn sign_with_cosignatories<S: TransactionSigner + ?Sized>(
        &self,
        signer: &S,
        cosignatories: &[&dyn TransactionSigner],
        generation_hash: &[u8; HASH_LENGTH],
    ) -> Result<SignedTransaction, TransactionError> {
        require_aggregate(self.transaction_type())?;
        let (mut payload, hash) = self.sign_payload(signer, generation_hash)?;
        let records = cosignatories
            .iter()
            .map(|c| Ok((c.public_key(), c.sign(&hash)?)))
            .collect::<Result<Vec<_>, TransactionError>>()?;
        append_cosignatures(&mut payload, records)?;
        debug!(
            transaction = self.schema().name,
            cosignatures = cosignatories.len(),
            bytes = payload.len(),
            "signed aggregate with cosignatories"
        );
        Ok(SignedTransaction::new(
            &payload,
            &hash,
            signer.public_key(),
            self.transaction_type(),
            self.network_type(),
        ))
    }

    /// Signs an aggregate and attaches cosignatures collected elsewhere.
    /// Each must be over this aggregate's hash.
    pub fn sign_with_cosignatures<S: TransactionSigner + ?Sized>(
        &self,
        signer: &S,
        cosignatures: &[CosignatureSignedTransaction],
        generation_hash: &[u8; HASH_LENGTH],
    ) -> Result<SignedTransaction, TransactionError> {
        require_aggregate(self.transaction_type())?;
        let (mut payload, hash) = self.sign_payload(signer, generation_hash)?;
        if let Some(stray) = cosignatures
            .iter()
            .find(|c| c.parent_hash.as_bytes() != &hash)
        {
            return Err(TransactionError::InvalidTransaction(format!(
                "cosignature by {} is for {}",
                stray.signer, stray.parent_hash
            )));
        }
        append_cosignatures(&mut payload, cosignatures.iter().map(|c| (c.signer, c.signature)))?;
        Ok(SignedTransaction::new(
            &payload,
            &hash,
            signer.public_key(),
            self.transaction_type(),
            self.network_type(),
        ))
    }
}

impl Transaction {
    pub fn sign_with_cosignatories<S: TransactionSigner + ?Sized>(
        &self,
        signer: &S,
        cosignatories: &[&dyn TransactionSigner],
        generation_hash: &[u8; HASH_LENGTH],
    ) -> Result<SignedTransaction, TransactionError> {
        self.to_verifiable()?
            .sign_with_cosignatories(signer, cosignatories, generation_hash)
    }
}

impl SignedTransaction {
    /// Cosignatures appended after the signed part of an aggregate.
    pub fn cosignatures(&self) -> Result<Vec<(PublicKey, Signature)>, TransactionError> {
        require_aggregate(self.transaction_type)?;
        let payload = self.payload_bytes()?;
        let trailer = &payload[self.signed_length(&payload)?..];
        if trailer.len() % COSIGNATURE_SIZE != 0 {
            return Err(TransactionError::InvalidTransaction(format!(
                "{} trailing bytes are not whole cosignatures",
                trailer.len()
            )));
        }
        Ok(trailer
            .chunks_exact(COSIGNATURE_SIZE)
            .map(|chunk| {
                let mut key = [0u8; PUBLIC_KEY_LENGTH];
                let mut signature = [0u8; 64];
                key.copy_from_slice(&chunk[..PUBLIC_KEY_LENGTH]);
                signature.copy_from_slice(&chunk[PUBLIC_KEY_LENGTH..]);
                (PublicKey::from_bytes(key), Signature::from_bytes(signature))
            })
            .collect())
    }

    /// Every appended cosignature must sign this aggregate's hash.
    pub fn verify_cosignatures(&self, scheme: DerivationScheme) -> Result<(), TransactionError> {
        let hash = self.hash_bytes()?;
        for (signer, signature) in self.cosignatures()? {
            verify_signature(&signer, &hash, &signature, scheme)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::model::{Deadline, Mosaic, MosaicId, NetworkType, Recipient};
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::cosignature::CosignatureTransaction;
    use crate::transaction::transfer::{Message, TransferBody};

    const GENERATION_HASH: [u8; 32] = [0x11; 32];
    const SCHEME: DerivationScheme = DerivationScheme::Ed25519Sha3;

    fn transfer(amount: u64) -> Transaction {
        TransactionBuilder::new(NetworkType::MijinTest)
            .deadline(Deadline::from_network_millis(1_000))
            .max_fee(0u64)
            .build(TransferBody::new(
                Recipient::parse("85BBEA6CC462B244").unwrap(),
                vec![Mosaic::new(MosaicId::new(1u64.into()), amount)],
                Message::plain("x"),
            ))
            .unwrap()
    }

    fn key(seed: u8) -> KeyPair {
        KeyPair::from_seed(&[seed; 32], SCHEME)
    }

    fn aggregate(body: AggregateBody) -> Transaction {
        TransactionBuilder::new(NetworkType::MijinTest)
            .deadline(Deadline::from_network_millis(1_000))
            .max_fee(0u64)
            .build(body)
            .unwrap()
    }

    #[test]
    fn size_counts_embedded_transactions() {
        let inner = vec![
            InnerTransaction::new(key(1).public_key(), transfer(1)),
            InnerTransaction::new(key(2).public_key(), transfer(2)),
        ];
        let embedded = transfer(1).calculate_size() - 80;
        let tx = aggregate(AggregateBody::complete(inner));
        assert_eq!(tx.calculate_size(), 122 + 4 + 2 * embedded);

        let bytes = tx.serialize().unwrap();
        assert_eq!(bytes.len(), tx.calculate_size());
        assert_eq!(&bytes[122..126], &((2 * embedded) as u32).to_le_bytes());
        assert_eq!(&bytes[130..162], key(1).public_key().as_bytes());
    }

    #[test]
    fn nested_aggregates_rejected() {
        let nested = aggregate(AggregateBody::complete(vec![]));
        let body = AggregateBody::bonded(vec![InnerTransaction::new(key(1).public_key(), nested)]);
        assert!(matches!(
            TransactionBuilder::new(NetworkType::MijinTest).build(body),
            Err(TransactionError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn cosignatories_append_after_signed_part() {
        let tx = aggregate(AggregateBody::complete(vec![InnerTransaction::new(
            key(2).public_key(),
            transfer(5),
        )]));
        let plain = tx.sign(&key(1), &GENERATION_HASH).unwrap();
        let (c1, c2) = (key(2), key(3));
        let signed = tx
            .sign_with_cosignatories(&key(1), &[&c1, &c2], &GENERATION_HASH)
            .unwrap();

        assert_eq!(signed.hash, plain.hash);
        let payload = signed.payload_bytes().unwrap();
        assert_eq!(payload.len(), tx.calculate_size() + 2 * COSIGNATURE_SIZE);
        assert_eq!(&payload[..4], &(payload.len() as u32).to_le_bytes());

        let cosignatures = signed.cosignatures().unwrap();
        assert_eq!(cosignatures.len(), 2);
        assert_eq!(cosignatures[0].0, c1.public_key());
        assert!(signed.verify(&GENERATION_HASH, SCHEME).is_ok());
        assert!(signed.verify_cosignatures(SCHEME).is_ok());
    }

    #[test]
    fn detached_cosignatures_attach() {
        let tx = aggregate(AggregateBody::bonded(vec![InnerTransaction::new(
            key(4).public_key(),
            transfer(9),
        )]));
        let announced = tx.sign(&key(1), &GENERATION_HASH).unwrap();
        let cosig = CosignatureTransaction::from_signed(&announced)
            .unwrap()
            .sign_with(&key(4))
            .unwrap();

        let verifiable = tx.to_verifiable().unwrap();
        let complete = verifiable
            .sign_with_cosignatures(&key(1), &[cosig], &GENERATION_HASH)
            .unwrap();
        assert_eq!(complete.hash, announced.hash);
        assert!(complete.verify_cosignatures(SCHEME).is_ok());

        let mut foreign = cosig;
        foreign.parent_hash = crate::model::Hash256::from_bytes([0; 32]);
        assert!(verifiable
            .sign_with_cosignatures(&key(1), &[foreign], &GENERATION_HASH)
            .is_err());
    }

    #[test]
    fn plain_transactions_take_no_cosignatures() {
        let c = key(2);
        assert!(transfer(1)
            .sign_with_cosignatories(&key(1), &[&c], &GENERATION_HASH)
            .is_err());
    }
}
