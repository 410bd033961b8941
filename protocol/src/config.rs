//! # Wire-Format Constants & Network Configuration
//!
//! Every byte offset the finalization code slices on lives here. The
//! canonical transaction header is a fixed 122-byte prefix:
//!
//! ```text
//! offset  0   size        u32   (whole payload, little-endian)
//! offset  4   signature   64 B
//! offset 68   signer      32 B  (public key)
//! offset 100  version     u32   (network_type << 24 | entity version)
//! offset 104  type        u16
//! offset 106  max_fee     u64   (2 x u32, little-endian)
//! offset 114  deadline    u64   (2 x u32, little-endian)
//! offset 122  <type-specific body>
//! ```
//!
//! Nodes validate hashes and signatures independently, so these numbers are
//! the interoperability contract. Changing one breaks every signed payload.

use serde::{Deserialize, Serialize};

use crate::crypto::keys::DerivationScheme;
use crate::error::TransactionError;
use crate::model::network::NetworkType;

// ---------------------------------------------------------------------------
// Header layout
// ---------------------------------------------------------------------------

/// Length of the little-endian `size` prefix.
pub const SIZE_PREFIX_LENGTH: usize = 4;

/// Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// Ed25519 public key length.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Secret key (seed) length.
pub const SECRET_KEY_LENGTH: usize = 32;

/// SHA3-256 digest length; also the length of the generation hash.
pub const HASH_LENGTH: usize = 32;

/// Where the signature starts in a canonical payload.
pub const SIGNATURE_OFFSET: usize = SIZE_PREFIX_LENGTH;

/// Where the signer public key starts.
pub const SIGNER_OFFSET: usize = SIGNATURE_OFFSET + SIGNATURE_LENGTH;

/// First byte covered by the signature. Everything before it is size,
/// signature and signer.
pub const SIGNING_BYTES_START: usize = SIGNER_OFFSET + PUBLIC_KEY_LENGTH;

/// Version field (u32).
pub const VERSION_OFFSET: usize = SIGNING_BYTES_START;

/// Entity type field (u16).
pub const TYPE_OFFSET: usize = VERSION_OFFSET + 4;

/// Max fee field (u64).
pub const MAX_FEE_OFFSET: usize = TYPE_OFFSET + 2;

/// Deadline field (u64).
pub const DEADLINE_OFFSET: usize = MAX_FEE_OFFSET + 8;

/// Size of the common header; type-specific fields begin here.
pub const HEADER_SIZE: usize = DEADLINE_OFFSET + 8;

/// Upper half of the signature that takes part in the transaction hash.
pub const HASH_SIGNATURE_PART: usize = SIGNATURE_OFFSET + 32;

/// Embedded (aggregate inner) header: size, signer, version, type.
pub const EMBEDDED_HEADER_SIZE: usize = SIZE_PREFIX_LENGTH + PUBLIC_KEY_LENGTH + 4 + 2;

/// Offset of the max fee + deadline pair once the header is re-packed as
/// `signer ++ version ++ type ++ ...` (no size prefix yet).
pub const EMBEDDED_FEE_OFFSET: usize = PUBLIC_KEY_LENGTH + 4 + 2;

/// Bytes of max fee + deadline dropped from embedded transactions.
pub const EMBEDDED_FEE_REGION: usize = 16;

/// Cosignature appended to an aggregate: signer key followed by signature.
pub const COSIGNATURE_SIZE: usize = PUBLIC_KEY_LENGTH + SIGNATURE_LENGTH;

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Network epoch (2016-04-01T00:00:00Z) in Unix milliseconds. Deadlines are
/// expressed relative to it.
pub const NETWORK_EPOCH_MS: i64 = 1_459_468_800_000;

/// Default deadline window in hours.
pub const DEFAULT_DEADLINE_HOURS: i64 = 2;

/// Deadlines must be strictly shorter than this many hours from now.
pub const MAX_DEADLINE_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Numeric limits
// ---------------------------------------------------------------------------

/// Largest integer a JSON/JS number represents exactly (2^53 - 1). Values
/// above it have no compact form.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Ids are derived with the high bit of the upper word cleared (mosaics) or
/// set (namespaces).
pub const NAMESPACE_ID_FLAG: u32 = 0x8000_0000;

/// Maximum namespace path depth (`root.sub.leaf`).
pub const MAX_NAMESPACE_DEPTH: usize = 3;

/// Maximum length of a single namespace part.
pub const MAX_NAMESPACE_NAME_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

/// How `max_fee` is derived from the encoded size when the caller does not
/// set it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeeStrategy {
    /// No fee. Only useful on private networks.
    Zero,
    Low,
    #[default]
    Middle,
    High,
}

impl FeeStrategy {
    /// Fee units charged per payload byte.
    pub fn multiplier(&self) -> u64 {
        match self {
            Self::Zero => 0,
            Self::Low => 25,
            Self::Middle => 250,
            Self::High => 2_500,
        }
    }
}

// ---------------------------------------------------------------------------
// NetworkConfig
// ---------------------------------------------------------------------------

/// Per-network parameters the finalization step needs.
///
/// Loaded from JSON by the CLI; library callers usually construct it
/// directly. The generation hash is stored as hex so the file stays
/// human-editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network_type: NetworkType,
    /// 64 hex characters.
    pub generation_hash: String,
    #[serde(default)]
    pub derivation_scheme: DerivationScheme,
    #[serde(default)]
    pub fee_strategy: FeeStrategy,
    #[serde(default = "default_deadline_hours")]
    pub deadline_hours: i64,
}

fn default_deadline_hours() -> i64 {
    DEFAULT_DEADLINE_HOURS
}

impl NetworkConfig {
    /// Parses a configuration from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, TransactionError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TransactionError::InvalidConfig(e.to_string()))?;
        config.generation_hash_bytes()?;
        Ok(config)
    }

    /// Decodes the generation hash, rejecting anything but 32 bytes of hex.
    pub fn generation_hash_bytes(&self) -> Result<[u8; HASH_LENGTH], TransactionError> {
        crate::model::decode_fixed_hex::<HASH_LENGTH>("generation_hash", &self.generation_hash)
    }
}
