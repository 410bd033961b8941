//! # Key Management
//!
//! Ed25519 key pairs in the two flavours the network accepts:
//!
//! - [`DerivationScheme::Ed25519Sha3`]: the catapult variant. The seed is
//!   expanded with SHA3-512 and SHA3-512 is the signing context digest.
//! - [`DerivationScheme::Ed25519Sha2`]: RFC 8032 Ed25519 (SHA-512).
//!
//! Both run through `ed25519-dalek`'s hazmat layer with the digest swapped
//! in, so the curve arithmetic is never ours.
//!
//! Key bytes are never logged.

use ed25519_dalek::hazmat::{raw_sign, raw_verify, ExpandedSecretKey};
use ed25519_dalek::{Signature as DalekSignature, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use sha3::Sha3_512;
use std::fmt;
use thiserror::Error;

use crate::config::{PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors from the signing collaborator.
///
/// Deliberately terse about *why* a key was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid secret key bytes")]
    InvalidSecretKey,

    #[error("invalid public key bytes")]
    InvalidPublicKey,

    #[error("invalid signature bytes")]
    InvalidSignature,

    #[error("signature verification failed")]
    VerificationFailed,

    /// Raised by external signers (hardware wallets, remote services).
    #[error("signer unavailable: {0}")]
    SignerUnavailable(String),
}

// ---------------------------------------------------------------------------
// DerivationScheme
// ---------------------------------------------------------------------------

/// Which digest drives key expansion and signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DerivationScheme {
    #[default]
    Ed25519Sha3,
    Ed25519Sha2,
}

impl DerivationScheme {
    fn expand(self, seed: &[u8; SECRET_KEY_LENGTH]) -> ExpandedSecretKey {
        let mut digest = [0u8; 64];
        match self {
            Self::Ed25519Sha3 => digest.copy_from_slice(&Sha3_512::digest(seed)),
            Self::Ed25519Sha2 => digest.copy_from_slice(&Sha512::digest(seed)),
        }
        ExpandedSecretKey::from_bytes(&digest)
    }
}

impl fmt::Display for DerivationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519Sha3 => write!(f, "Ed25519Sha3"),
            Self::Ed25519Sha2 => write!(f, "Ed25519Sha2"),
        }
    }
}

// ---------------------------------------------------------------------------
// PublicKey / Signature
// ---------------------------------------------------------------------------

/// A 32-byte public key. Serializes as uppercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        hex::decode_to_slice(hex_str, &mut bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<PublicKey> for String {
    fn from(value: PublicKey) -> Self {
        value.to_hex()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A 64-byte Ed25519 signature. Serializes as uppercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        hex::decode_to_slice(hex_str, &mut bytes).map_err(|_| CryptoError::InvalidSignature)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl TryFrom<String> for Signature {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Signature> for String {
    fn from(value: Signature) -> Self {
        value.to_hex()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// An Ed25519 key pair bound to a derivation scheme.
///
/// Intentionally not `Serialize` and its `Debug` omits the secret. Export
/// the seed with [`KeyPair::secret_key_bytes`] when you really mean to.
#[derive(Clone)]
pub struct KeyPair {
    secret: [u8; SECRET_KEY_LENGTH],
    public: PublicKey,
    scheme: DerivationScheme,
}

impl KeyPair {
    /// Fresh key pair from the OS RNG.
    pub fn generate(scheme: DerivationScheme) -> Self {
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(&seed, scheme)
    }

    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH], scheme: DerivationScheme) -> Self {
        Self {
            secret: *seed,
            public: derive_public_key(seed, scheme),
            scheme,
        }
    }

    /// From a 64-character hex private key.
    pub fn from_hex(hex_str: &str, scheme: DerivationScheme) -> Result<Self, CryptoError> {
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        hex::decode_to_slice(hex_str, &mut seed).map_err(|_| CryptoError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed, scheme))
    }

    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    pub fn scheme(&self) -> DerivationScheme {
        self.scheme
    }

    /// Raw seed. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.secret
    }

    /// Signs `message`. Deterministic for a given key, message and scheme.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, CryptoError> {
        let expanded = self.scheme.expand(&self.secret);
        let verifying_key = VerifyingKey::from_bytes(self.public.as_bytes())
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        let signature = match self.scheme {
            DerivationScheme::Ed25519Sha3 => {
                raw_sign::<Sha3_512>(&expanded, message, &verifying_key)
            }
            DerivationScheme::Ed25519Sha2 => raw_sign::<Sha512>(&expanded, message, &verifying_key),
        };
        Ok(Signature(signature.to_bytes()))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

/// Public key for a seed under `scheme`.
pub fn derive_public_key(seed: &[u8; SECRET_KEY_LENGTH], scheme: DerivationScheme) -> PublicKey {
    let expanded = scheme.expand(seed);
    PublicKey(VerifyingKey::from(&expanded).to_bytes())
}

/// Verifies `signature` over `message` under `scheme`.
pub fn verify_signature(
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
    scheme: DerivationScheme,
) -> Result<(), CryptoError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key.as_bytes()).map_err(|_| CryptoError::InvalidPublicKey)?;
    let signature = DalekSignature::from_bytes(signature.as_bytes());
    let verified = match scheme {
        DerivationScheme::Ed25519Sha3 => raw_verify::<Sha3_512>(&verifying_key, message, &signature),
        DerivationScheme::Ed25519Sha2 => raw_verify::<Sha512>(&verifying_key, message, &signature),
    };
    verified.map_err(|_| CryptoError::VerificationFailed)
}
