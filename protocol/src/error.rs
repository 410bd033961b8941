//! Error types for transaction encoding and finalization.
//!
//! Three families, none of them retryable:
//!
//! - **Encoding defects** (`SizeMismatch`, `MissingField`, `SchemaMismatch`,
//!   `MalformedBuffer`) mean a schema and a builder disagree. They are bugs.
//! - **Malformed input** (`InvalidHex`, `InvalidLength`, `OutOfRange`,
//!   `InvalidName`, `InvalidDeadline`, ...) is caught while a descriptor is
//!   constructed, before any bytes are written.
//! - **Collaborator failures** (`Crypto`) are passed through untouched.

use thiserror::Error;

use crate::crypto::keys::CryptoError;
use crate::model::uint64::Uint64Error;

/// Errors raised while building, encoding or signing a transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// The encoded payload length differs from the size computed for the
    /// descriptor.
    #[error("declared size {declared} differs from encoded length {actual} for {transaction}")]
    SizeMismatch {
        transaction: &'static str,
        declared: usize,
        actual: usize,
    },

    /// A required field has no entry in the self-describing buffer.
    #[error("required field `{field}` is missing from {transaction}")]
    MissingField {
        transaction: &'static str,
        field: &'static str,
    },

    /// A value does not fit the descriptor it was written against.
    #[error("field `{field}` of {transaction}: {reason}")]
    SchemaMismatch {
        transaction: &'static str,
        field: &'static str,
        reason: String,
    },

    /// The self-describing buffer points outside itself.
    #[error("malformed buffer: {0}")]
    MalformedBuffer(String),

    /// Input that should be hex is not.
    #[error("invalid hex in {field}: {reason}")]
    InvalidHex { field: &'static str, reason: String },

    /// Input has the wrong number of bytes.
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A count or length does not fit its wire width.
    #[error("{field} value {value} out of range (max {max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        max: i64,
    },

    /// Address text that is neither valid base32 nor hex.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Namespace names and paths.
    #[error("invalid namespace name `{0}`")]
    InvalidName(String),

    /// Deadline window outside (0, 24h).
    #[error("invalid deadline: {0}")]
    InvalidDeadline(String),

    /// Recognized transaction type with no encoder.
    #[error("unsupported transaction type: {0}")]
    UnsupportedTransactionType(String),

    /// Anything that structurally cannot be expressed, e.g. aggregates
    /// nested inside aggregates.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Payload too short to carry a transaction header.
    #[error("payload of {actual} bytes is shorter than the {required}-byte header")]
    PayloadTooShort { required: usize, actual: usize },

    /// Network configuration could not be parsed.
    #[error("invalid network configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Uint64(#[from] Uint64Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = TransactionError> = std::result::Result<T, E>;
