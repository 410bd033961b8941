//! # Value Types
//!
//! The small, `Copy`-friendly vocabulary transactions are built from:
//! exact 64-bit values, network identifiers, deadlines, addresses, ids and
//! mosaics. None of these know about the wire layout beyond their own
//! byte form.

pub mod address;
pub mod deadline;
pub mod digest;
pub mod ids;
pub mod mosaic;
pub mod network;
pub mod uint64;

pub use address::{Address, Recipient};
pub use deadline::Deadline;
pub use digest::Hash256;
pub use ids::{validate_part, MosaicId, MosaicNonce, NamespaceId};
pub use mosaic::{Mosaic, MosaicFlags, MosaicSupplyType};
pub use network::NetworkType;
pub use uint64::{Uint64, Uint64Error};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TransactionError;

/// Tests `input` against a lazily compiled pattern. A pattern that failed to
/// compile matches nothing.
pub(crate) fn pattern_matches(pattern: &Lazy<Result<Regex, regex::Error>>, input: &str) -> bool {
    pattern.as_ref().map_or(false, |re| re.is_match(input))
}

/// Decodes hex into exactly `N` bytes, naming `field` in the error.
pub(crate) fn decode_fixed_hex<const N: usize>(
    field: &'static str,
    hex_str: &str,
) -> Result<[u8; N], TransactionError> {
    let bytes = hex::decode(hex_str).map_err(|e| TransactionError::InvalidHex {
        field,
        reason: e.to_string(),
    })?;
    if bytes.len() != N {
        return Err(TransactionError::InvalidLength {
            field,
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}
