//! # Signing seam
//!
//! Finalization never touches key material directly. It asks a
//! [`TransactionSigner`] for a public key, a scheme and a signature, which
//! lets callers plug in hardware wallets or remote signers. [`KeyPair`] is
//! the in-process implementation.
//!
//! Errors from a signer are propagated to the caller unchanged.

use super::keys::{verify_signature, CryptoError, DerivationScheme, KeyPair, PublicKey, Signature};

/// Anything that can sign transaction bytes.
pub trait TransactionSigner {
    fn public_key(&self) -> PublicKey;

    fn scheme(&self) -> DerivationScheme;

    fn sign(&self, message: &[u8]) -> Result<Signature, CryptoError>;
}

impl TransactionSigner for KeyPair {
    fn public_key(&self) -> PublicKey {
        KeyPair::public_key(self)
    }

    fn scheme(&self) -> DerivationScheme {
        KeyPair::scheme(self)
    }

    fn sign(&self, message: &[u8]) -> Result<Signature, CryptoError> {
        KeyPair::sign(self, message)
    }
}

impl<T: TransactionSigner + ?Sized> TransactionSigner for &T {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn scheme(&self) -> DerivationScheme {
        (**self).scheme()
    }

    fn sign(&self, message: &[u8]) -> Result<Signature, CryptoError> {
        (**self).sign(message)
    }
}

/// Boolean verification, for call sites that only need yes/no.
pub fn verify(
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
    scheme: DerivationScheme,
) -> bool {
    verify_signature(public_key, message, signature, scheme).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A signer that always fails, standing in for an unplugged device.
    struct OfflineSigner(PublicKey);

    impl TransactionSigner for OfflineSigner {
        fn public_key(&self) -> PublicKey {
            self.0
        }

        fn scheme(&self) -> DerivationScheme {
            DerivationScheme::Ed25519Sha3
        }

        fn sign(&self, _message: &[u8]) -> Result<Signature, CryptoError> {
            Err(CryptoError::SignerUnavailable("device disconnected".into()))
        }
    }

    #[test]
    fn keypair_signer_roundtrip() {
        let kp = KeyPair::generate(DerivationScheme::Ed25519Sha3);
        let signer: &dyn TransactionSigner = &kp;
        let sig = signer.sign(b"bytes").unwrap();
        assert!(verify(&signer.public_key(), b"bytes", &sig, signer.scheme()));
    }

    #[test]
    fn offline_signer_error_is_reported() {
        let signer = OfflineSigner(PublicKey::from_bytes([1u8; 32]));
        assert_eq!(
            signer.sign(b"x"),
            Err(CryptoError::SignerUnavailable("device disconnected".into()))
        );
    }

    #[test]
    fn reference_forwards() {
        let kp = KeyPair::from_seed(&[9u8; 32], DerivationScheme::Ed25519Sha2);
        let by_ref = &kp;
        assert_eq!(TransactionSigner::public_key(&by_ref), kp.public_key());
        assert_eq!(
            TransactionSigner::sign(&by_ref, b"m").unwrap(),
            kp.sign(b"m").unwrap()
        );
    }
}
