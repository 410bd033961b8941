//! Detached cosignatures over an announced aggregate.
//!
//! A cosigner receives the hash of a bonded aggregate and signs the 32 hash
//! bytes. The result travels on its own and is later appended to the
//! aggregate payload, or announced separately.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::verifiable::SignedTransaction;
use crate::crypto::{verify_signature, DerivationScheme, PublicKey, Signature, TransactionSigner};
use crate::error::TransactionError;
use crate::model::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CosignatureTransaction {
    parent_hash: Hash256,
}

impl CosignatureTransaction {
    pub fn new(parent_hash: Hash256) -> Self {
        Self { parent_hash }
    }

    /// Cosign an aggregate this process signed itself.
    pub fn from_signed(parent: &SignedTransaction) -> Result<Self, TransactionError> {
        if !parent.transaction_type.is_aggregate() {
            return Err(TransactionError::InvalidTransaction(format!(
                "only aggregates are cosigned, got {}",
                parent.transaction_type
            )));
        }
        Ok(Self::new(Hash256::from_hex(&parent.hash)?))
    }

    pub fn parent_hash(&self) -> Hash256 {
        self.parent_hash
    }

    pub fn sign_with<S: TransactionSigner + ?Sized>(
        &self,
        signer: &S,
    ) -> Result<CosignatureSignedTransaction, TransactionError> {
        let signature = signer.sign(self.parent_hash.as_bytes())?;
        debug!(parent = %self.parent_hash.to_hex(), "cosigned aggregate");
        Ok(CosignatureSignedTransaction {
            parent_hash: self.parent_hash,
            signature,
            signer: signer.public_key(),
            scheme: signer.scheme(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosignatureSignedTransaction {
    pub parent_hash: Hash256,
    pub signature: Signature,
    pub signer: PublicKey,
    #[serde(default)]
    pub scheme: DerivationScheme,
}

impl CosignatureSignedTransaction {
    pub fn verify(&self) -> Result<(), TransactionError> {
        verify_signature(
            &self.signer,
            self.parent_hash.as_bytes(),
            &self.signature,
            self.scheme,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    #[test]
    fn cosignature_signs_parent_hash() {
        let kp = KeyPair::from_seed(&[8; 32], DerivationScheme::Ed25519Sha3);
        let parent = Hash256::from_bytes([0xAA; 32]);
        let cosig = CosignatureTransaction::new(parent).sign_with(&kp).unwrap();

        assert_eq!(cosig.parent_hash, parent);
        assert_eq!(cosig.signer, kp.public_key());
        assert_eq!(cosig.signature, kp.sign(&[0xAA; 32]).unwrap());
        assert!(cosig.verify().is_ok());
    }

    #[test]
    fn altered_parent_fails_verification() {
        let kp = KeyPair::from_seed(&[9; 32], DerivationScheme::Ed25519Sha2);
        let mut cosig = CosignatureTransaction::new(Hash256::from_bytes([1; 32]))
            .sign_with(&kp)
            .unwrap();
        cosig.parent_hash = Hash256::from_bytes([2; 32]);
        assert!(cosig.verify().is_err());
    }

    #[test]
    fn non_aggregate_parent_rejected() {
        let signed = SignedTransaction {
            payload: String::new(),
            hash: "00".repeat(32),
            signer: PublicKey::from_bytes([0; 32]),
            transaction_type: crate::transaction::TransactionType::Transfer,
            network_type: crate::model::NetworkType::TestNet,
        };
        assert!(CosignatureTransaction::from_signed(&signed).is_err());
    }
}
