//! Finalization: canonical bytes, signatures, hashes and the embedded form.
//!
//! All of these work on byte offsets into the canonical payload (see
//! [`crate::config`]). The functions at the bottom of this module take
//! raw payloads so they can be applied to transactions this crate did not
//! encode.
//!
//! ```text
//! signing bytes   = generation_hash ++ payload[100..]
//! hash            = SHA3-256(payload[4..36] ++ payload[68..100] ++ generation_hash ++ payload[100..])
//! embedded        = size' ++ signer ++ payload[100..106] ++ payload[122..]
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::TransactionType;
use crate::builder::SelfDescribingBuffer;
use crate::config::{
    EMBEDDED_FEE_OFFSET, EMBEDDED_FEE_REGION, HASH_LENGTH, HASH_SIGNATURE_PART, HEADER_SIZE,
    SIGNATURE_OFFSET, SIGNER_OFFSET, SIGNING_BYTES_START, SIZE_PREFIX_LENGTH,
};
use crate::crypto::{
    sha3_256_multi, verify_signature, DerivationScheme, PublicKey, Signature, TransactionSigner,
};
use crate::error::TransactionError;
use crate::model::NetworkType;
use crate::schema::Schema;

// ---------------------------------------------------------------------------
// VerifiableTransaction
// ---------------------------------------------------------------------------

/// An encoded transaction still in self-describing form, bound to its
/// layout and the size its descriptor declared.
#[derive(Debug, Clone)]
pub struct VerifiableTransaction {
    schema: &'static Schema,
    buffer: SelfDescribingBuffer,
    declared_size: usize,
    transaction_type: TransactionType,
    network_type: NetworkType,
}

impl VerifiableTransaction {
    pub fn new(
        schema: &'static Schema,
        buffer: SelfDescribingBuffer,
        declared_size: usize,
        transaction_type: TransactionType,
        network_type: NetworkType,
    ) -> Self {
        Self {
            schema,
            buffer,
            declared_size,
            transaction_type,
            network_type,
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn buffer(&self) -> &SelfDescribingBuffer {
        &self.buffer
    }

    pub fn declared_size(&self) -> usize {
        self.declared_size
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    /// Canonical payload. Fails if its length differs from the declared
    /// size: that means a layout and its size formula disagree.
    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        let payload = self.schema.serialize(self.buffer.as_bytes())?;
        if payload.len() != self.declared_size {
            return Err(TransactionError::SizeMismatch {
                transaction: self.schema.name,
                declared: self.declared_size,
                actual: payload.len(),
            });
        }
        Ok(payload)
    }

    /// Signed payload and its hash.
    pub(crate) fn sign_payload<S: TransactionSigner + ?Sized>(
        &self,
        signer: &S,
        generation_hash: &[u8; HASH_LENGTH],
    ) -> Result<(Vec<u8>, [u8; HASH_LENGTH]), TransactionError> {
        let payload = self.serialize()?;
        let signature = signer.sign(&signing_bytes(&payload, generation_hash)?)?;

        let mut signed = Vec::with_capacity(payload.len());
        signed.extend_from_slice(&payload[..SIGNATURE_OFFSET]);
        signed.extend_from_slice(signature.as_bytes());
        signed.extend_from_slice(signer.public_key().as_bytes());
        signed.extend_from_slice(&payload[SIGNING_BYTES_START..]);

        let hash = transaction_hash(&signed, generation_hash)?;
        Ok((signed, hash))
    }

    pub fn sign<S: TransactionSigner + ?Sized>(
        &self,
        signer: &S,
        generation_hash: &[u8; HASH_LENGTH],
    ) -> Result<SignedTransaction, TransactionError> {
        let (payload, hash) = self.sign_payload(signer, generation_hash)?;
        let signed = SignedTransaction::new(
            &payload,
            &hash,
            signer.public_key(),
            self.transaction_type,
            self.network_type,
        );
        debug!(
            transaction = self.schema.name,
            hash = %signed.hash,
            bytes = payload.len(),
            "signed transaction"
        );
        Ok(signed)
    }

    /// Embedded form signed by `signer`, for inclusion in an aggregate.
    pub fn to_aggregate(&self, signer: &PublicKey) -> Result<Vec<u8>, TransactionError> {
        to_aggregate_bytes(&self.serialize()?, signer)
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A signed transaction ready to announce. Payload and hash are uppercase
/// hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    pub payload: String,
    pub hash: String,
    pub signer: PublicKey,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub network_type: NetworkType,
}

impl SignedTransaction {
    pub(crate) fn new(
        payload: &[u8],
        hash: &[u8; HASH_LENGTH],
        signer: PublicKey,
        transaction_type: TransactionType,
        network_type: NetworkType,
    ) -> Self {
        Self {
            payload: hex::encode_upper(payload),
            hash: hex::encode_upper(hash),
            signer,
            transaction_type,
            network_type,
        }
    }

    pub fn payload_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        hex::decode(&self.payload).map_err(|e| TransactionError::InvalidHex {
            field: "payload",
            reason: e.to_string(),
        })
    }

    pub fn hash_bytes(&self) -> Result<[u8; HASH_LENGTH], TransactionError> {
        crate::model::decode_fixed_hex::<HASH_LENGTH>("hash", &self.hash)
    }

    /// Length of the part covered by signature and hash. Cosignatures
    /// appended to an aggregate after signing lie beyond it.
    pub(crate) fn signed_length(&self, payload: &[u8]) -> Result<usize, TransactionError> {
        if !self.transaction_type.is_aggregate() {
            return Ok(payload.len());
        }
        let end = HEADER_SIZE + SIZE_PREFIX_LENGTH;
        let prefix: [u8; 4] = payload
            .get(HEADER_SIZE..end)
            .and_then(|b| b.try_into().ok())
            .ok_or(TransactionError::PayloadTooShort {
                required: end,
                actual: payload.len(),
            })?;
        let signed = end + u32::from_le_bytes(prefix) as usize;
        if signed > payload.len() {
            return Err(TransactionError::PayloadTooShort {
                required: signed,
                actual: payload.len(),
            });
        }
        Ok(signed)
    }

    /// Checks the size prefix, the signer's signature and the hash.
    pub fn verify(
        &self,
        generation_hash: &[u8; HASH_LENGTH],
        scheme: DerivationScheme,
    ) -> Result<(), TransactionError> {
        let payload = self.payload_bytes()?;
        if payload.len() < HEADER_SIZE {
            return Err(TransactionError::PayloadTooShort {
                required: HEADER_SIZE,
                actual: payload.len(),
            });
        }
        let mut size = [0u8; SIZE_PREFIX_LENGTH];
        size.copy_from_slice(&payload[..SIZE_PREFIX_LENGTH]);
        let declared = u32::from_le_bytes(size) as usize;
        if declared != payload.len() {
            return Err(TransactionError::SizeMismatch {
                transaction: "SignedTransaction",
                declared,
                actual: payload.len(),
            });
        }

        let signed = &payload[..self.signed_length(&payload)?];
        if signed[SIGNER_OFFSET..SIGNING_BYTES_START] != self.signer.as_bytes()[..] {
            return Err(TransactionError::InvalidTransaction(
                "payload signer differs from declared signer".into(),
            ));
        }
        let mut signature = [0u8; 64];
        signature.copy_from_slice(&signed[SIGNATURE_OFFSET..SIGNER_OFFSET]);
        verify_signature(
            &self.signer,
            &signing_bytes(signed, generation_hash)?,
            &Signature::from_bytes(signature),
            scheme,
        )?;

        if transaction_hash(signed, generation_hash)? != self.hash_bytes()? {
            return Err(TransactionError::InvalidTransaction("hash mismatch".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Payload functions
// ---------------------------------------------------------------------------

fn require_length(payload: &[u8], required: usize) -> Result<(), TransactionError> {
    if payload.len() < required {
        return Err(TransactionError::PayloadTooShort {
            required,
            actual: payload.len(),
        });
    }
    Ok(())
}

/// What the signer signs: the generation hash, then everything from the
/// version field on.
pub fn signing_bytes(
    payload: &[u8],
    generation_hash: &[u8; HASH_LENGTH],
) -> Result<Vec<u8>, TransactionError> {
    require_length(payload, SIGNING_BYTES_START)?;
    let body = &payload[SIGNING_BYTES_START..];
    let mut out = Vec::with_capacity(HASH_LENGTH + body.len());
    out.extend_from_slice(generation_hash);
    out.extend_from_slice(body);
    Ok(out)
}

/// Transaction hash of a signed payload.
pub fn transaction_hash(
    payload: &[u8],
    generation_hash: &[u8; HASH_LENGTH],
) -> Result<[u8; HASH_LENGTH], TransactionError> {
    require_length(payload, SIGNING_BYTES_START)?;
    Ok(sha3_256_multi(&[
        &payload[SIGNATURE_OFFSET..HASH_SIGNATURE_PART],
        &payload[SIGNER_OFFSET..SIGNING_BYTES_START],
        generation_hash,
        &payload[SIGNING_BYTES_START..],
    ]))
}

/// Re-packs a full payload into the embedded layout: signature dropped,
/// `signer` in place of the original signer, max fee and deadline removed,
/// new size prefix.
pub fn to_aggregate_bytes(payload: &[u8], signer: &PublicKey) -> Result<Vec<u8>, TransactionError> {
    require_length(payload, HEADER_SIZE)?;
    let mut rest = Vec::with_capacity(payload.len());
    rest.extend_from_slice(signer.as_bytes());
    rest.extend_from_slice(&payload[SIGNING_BYTES_START..]);
    rest.drain(EMBEDDED_FEE_OFFSET..EMBEDDED_FEE_OFFSET + EMBEDDED_FEE_REGION);

    let size = u32::try_from(rest.len() + SIZE_PREFIX_LENGTH).map_err(|_| {
        TransactionError::OutOfRange {
            field: "size",
            value: rest.len() as i64,
            max: u32::MAX as i64,
        }
    })?;
    let mut out = Vec::with_capacity(SIZE_PREFIX_LENGTH + rest.len());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&rest);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EMBEDDED_HEADER_SIZE, TYPE_OFFSET, VERSION_OFFSET};
    use crate::crypto::KeyPair;
    use crate::model::{Mosaic, MosaicId, Recipient};
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::transfer::{Message, TransferBody};

    const GENERATION_HASH: [u8; 32] = [0x42; 32];

    fn tx() -> crate::transaction::Transaction {
        TransactionBuilder::new(NetworkType::MijinTest)
            .deadline(crate::model::Deadline::from_network_millis(1_000))
            .max_fee(0u64)
            .build(TransferBody::new(
                Recipient::parse("85BBEA6CC462B244").unwrap(),
                vec![Mosaic::new(MosaicId::new(7u64.into()), 1u64)],
                Message::empty(),
            ))
            .unwrap()
    }

    fn numbered(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    #[test]
    fn signing_bytes_prepend_generation_hash() {
        let payload = numbered(130);
        let bytes = signing_bytes(&payload, &GENERATION_HASH).unwrap();
        assert_eq!(&bytes[..32], &GENERATION_HASH);
        assert_eq!(&bytes[32..], &payload[100..]);
    }

    #[test]
    fn short_payloads_rejected() {
        let short = numbered(99);
        assert_eq!(
            transaction_hash(&short, &GENERATION_HASH),
            Err(TransactionError::PayloadTooShort {
                required: 100,
                actual: 99
            })
        );
        assert!(signing_bytes(&short, &GENERATION_HASH).is_err());
        assert!(to_aggregate_bytes(&numbered(121), &PublicKey::from_bytes([0; 32])).is_err());
    }

    #[test]
    fn hash_covers_exact_slices() {
        let payload = numbered(140);
        let mut manual = Vec::new();
        manual.extend_from_slice(&payload[4..36]);
        manual.extend_from_slice(&payload[68..100]);
        manual.extend_from_slice(&GENERATION_HASH);
        manual.extend_from_slice(&payload[100..]);
        assert_eq!(
            transaction_hash(&payload, &GENERATION_HASH).unwrap(),
            crate::crypto::sha3_256(&manual)
        );

        // The lower signature half and the size prefix are not hashed.
        let mut tweaked = payload.clone();
        tweaked[0] ^= 0xFF;
        tweaked[40] ^= 0xFF;
        assert_eq!(
            transaction_hash(&tweaked, &GENERATION_HASH).unwrap(),
            transaction_hash(&payload, &GENERATION_HASH).unwrap()
        );
    }

    #[test]
    fn embedded_form_drops_fee_and_deadline() {
        let payload = tx().serialize().unwrap();
        let signer = PublicKey::from_bytes([0xEE; 32]);
        let embedded = to_aggregate_bytes(&payload, &signer).unwrap();

        assert_eq!(embedded.len(), payload.len() - 80);
        assert_eq!(&embedded[..4], &(embedded.len() as u32).to_le_bytes());
        assert_eq!(&embedded[4..36], signer.as_bytes());
        assert_eq!(&embedded[36..40], &payload[VERSION_OFFSET..VERSION_OFFSET + 4]);
        assert_eq!(&embedded[40..42], &payload[TYPE_OFFSET..TYPE_OFFSET + 2]);
        assert_eq!(&embedded[EMBEDDED_HEADER_SIZE..], &payload[HEADER_SIZE..]);
    }

    #[test]
    fn signed_payload_verifies() {
        let kp = KeyPair::from_seed(&[1; 32], DerivationScheme::Ed25519Sha3);
        let signed = tx().sign(&kp, &GENERATION_HASH).unwrap();
        let payload = signed.payload_bytes().unwrap();

        assert_eq!(payload.len(), tx().calculate_size());
        assert_eq!(&payload[68..100], kp.public_key().as_bytes());
        assert_eq!(signed.hash.len(), 64);
        assert_eq!(signed.hash, signed.hash.to_uppercase());
        assert!(signed.verify(&GENERATION_HASH, DerivationScheme::Ed25519Sha3).is_ok());
        assert!(signed.verify(&[0; 32], DerivationScheme::Ed25519Sha3).is_err());
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = KeyPair::from_seed(&[2; 32], DerivationScheme::Ed25519Sha2);
        let a = tx().to_verifiable().unwrap().sign(&kp, &GENERATION_HASH).unwrap();
        let b = tx().to_verifiable().unwrap().sign(&kp, &GENERATION_HASH).unwrap();
        assert_eq!(a.hash, b.hash);
        assert_eq!(a.payload, b.payload);
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let kp = KeyPair::from_seed(&[3; 32], DerivationScheme::Ed25519Sha3);
        let mut signed = tx().sign(&kp, &GENERATION_HASH).unwrap();
        let mut payload = signed.payload_bytes().unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 1;
        signed.payload = hex::encode_upper(&payload);
        assert!(signed.verify(&GENERATION_HASH, DerivationScheme::Ed25519Sha3).is_err());
    }

    #[test]
    fn declared_size_is_enforced() {
        let verifiable = tx().to_verifiable().unwrap();
        let wrong = VerifiableTransaction::new(
            verifiable.schema(),
            verifiable.buffer().clone(),
            verifiable.declared_size() + 1,
            verifiable.transaction_type(),
            verifiable.network_type(),
        );
        assert!(matches!(
            wrong.serialize(),
            Err(TransactionError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn signed_transaction_json_shape() {
        let kp = KeyPair::from_seed(&[4; 32], DerivationScheme::Ed25519Sha3);
        let signed = tx().sign(&kp, &GENERATION_HASH).unwrap();
        let json = serde_json::to_value(&signed).unwrap();
        assert_eq!(json["type"], "transfer");
        assert_eq!(json["networkType"], "mijin_test");
        let back: SignedTransaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, signed);
    }
}
