//! # Cryptographic Collaborators
//!
//! The encoder only needs three capabilities from cryptography: hash bytes,
//! derive a public key, sign bytes. This module provides them over audited
//! crates (`sha3`, `sha2`, `ed25519-dalek`) and exposes the signing half
//! through the [`TransactionSigner`] trait so other signers can stand in.
//!
//! What goes *into* these functions (which slices of which payload) is the
//! transaction module's business, not ours.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{sha3_256, sha3_256_multi, sha3_512};
pub use keys::{
    derive_public_key, verify_signature, CryptoError, DerivationScheme, KeyPair, PublicKey,
    Signature,
};
pub use signatures::{verify, TransactionSigner};
