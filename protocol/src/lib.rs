// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # catapult-tx: Transaction Encoding Core
//!
//! Builds, encodes, hashes and signs catapult-style ledger transactions.
//! Nodes verify every byte independently, so the output here has to match
//! the network's canonical layout exactly.
//!
//! ## Architecture
//!
//! - **config**: wire offsets, protocol constants, `NetworkConfig`.
//! - **model**: value types that appear in transactions: `Uint64`,
//!   addresses, mosaic and namespace ids, deadlines.
//! - **schema**: declarative transaction layouts and the engine that
//!   flattens a self-describing buffer into canonical bytes.
//! - **builder**: the one generic encoder that writes values into a
//!   self-describing buffer.
//! - **transaction**: typed descriptors for every family, plus
//!   finalization (serialize, sign, hash, cosign, embed).
//! - **crypto**: SHA3 digests and Ed25519 signing behind a signer trait.
//!
//! ## Quick start
//!
//! ```
//! use catapult_tx::crypto::{DerivationScheme, KeyPair};
//! use catapult_tx::model::{Mosaic, MosaicId, NetworkType, Recipient};
//! use catapult_tx::transaction::{Message, TransactionBuilder, TransferBody};
//!
//! let tx = TransactionBuilder::new(NetworkType::TestNet)
//!     .build(TransferBody::new(
//!         Recipient::parse("85BBEA6CC462B244").unwrap(),
//!         vec![Mosaic::new(MosaicId::new(1u64.into()), 1_000u64)],
//!         Message::plain("coffee"),
//!     ))
//!     .unwrap();
//!
//! let key = KeyPair::generate(DerivationScheme::Ed25519Sha3);
//! let signed = tx.sign(&key, &[0u8; 32]).unwrap();
//! assert_eq!(signed.hash.len(), 64);
//! ```
//!
//! Everything is synchronous and pure: no I/O, no shared state.

pub mod builder;
pub mod config;
pub mod crypto;
pub mod error;
pub mod model;
pub mod schema;
pub mod transaction;

pub use error::{Result, TransactionError};
