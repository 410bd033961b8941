//! # Transaction Module
//!
//! Typed transaction descriptors, their wire layouts, and the finalization
//! protocol that hashes, signs and embeds them.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        TransactionType codes and entity versions
//! body.rs         TransactionBody enum + the BodyLayout trait every family implements
//! builder.rs      Transaction descriptor and the fluent TransactionBuilder
//! transfer.rs .. exchange.rs   one file per family: layout, size, values
//! aggregate.rs    aggregate bodies and cosigned signing
//! verifiable.rs   serialize / sign / hash / embed, SignedTransaction
//! cosignature.rs  detached cosignatures over a parent hash
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] validates input and yields an
//!    immutable [`Transaction`].
//! 2. **Encode**: the generic [`crate::builder::BufferBuilder`] writes the
//!    descriptor's values into a self-describing buffer, producing a
//!    [`VerifiableTransaction`].
//! 3. **Finalize**: `serialize`, `sign`, or `to_aggregate`.
//!
//! Every layout starts with the same header:
//!
//! ```text
//! size:u32 | signature:64 | signer:32 | version:u32 | type:u16 | maxFee:u64 | deadline:u64
//! ```

/// Declares a transaction layout: the common header followed by `$field`s.
macro_rules! transaction_schema {
    ($name:literal, [$($field:expr),* $(,)?]) => {
        $crate::schema::Schema {
            name: $name,
            fields: &[
                $crate::schema::uint("size"),
                $crate::schema::bytes("signature", $crate::config::SIGNATURE_LENGTH).defaulted(),
                $crate::schema::bytes("signer", $crate::config::PUBLIC_KEY_LENGTH).defaulted(),
                $crate::schema::uint("version"),
                $crate::schema::ushort("type"),
                $crate::schema::words("maxFee", 2),
                $crate::schema::words("deadline", 2),
                $($field),*
            ],
        }
    };
}

pub mod account;
pub mod aggregate;
pub mod body;
pub mod builder;
pub mod chain;
pub mod contract;
pub mod cosignature;
pub mod exchange;
pub mod lock;
pub mod metadata;
pub mod mosaic;
pub mod multisig;
pub mod namespace;
pub mod transfer;
pub mod types;
pub mod verifiable;

pub use account::{
    AccountLinkBody, AccountPropertiesBody, LinkAction, PropertyModification,
    PropertyModificationType, PropertyRule,
};
pub use aggregate::{AggregateBody, AggregateKind, InnerTransaction};
pub use body::{BodyLayout, TransactionBody};
pub use builder::{Transaction, TransactionBuilder};
pub use chain::ChainConfigBody;
pub use contract::ModifyContractBody;
pub use cosignature::{CosignatureSignedTransaction, CosignatureTransaction};
pub use exchange::{
    AddExchangeOfferBody, AddOffer, ExchangeOfferBody, MatchedOffer, OfferType,
    PlaceSdaExchangeOfferBody, RemoveExchangeOfferBody, RemoveOffer, RemoveSdaExchangeOfferBody,
    RemoveSdaOffer, SdaOffer,
};
pub use lock::{HashLockBody, HashType, SecretLockBody, SecretProofBody};
pub use metadata::{MetadataBody, MetadataTarget};
pub use mosaic::{MosaicDefinitionBody, MosaicSupplyChangeBody};
pub use multisig::{CosignatoryModification, ModificationType, ModifyMultisigBody};
pub use namespace::{AddressAliasBody, AliasAction, MosaicAliasBody, RegisterNamespaceBody};
pub use transfer::{Message, MessageType, TransferBody};
pub use types::TransactionType;
pub use verifiable::{
    signing_bytes, to_aggregate_bytes, transaction_hash, SignedTransaction,
    VerifiableTransaction,
};

use crate::error::TransactionError;

/// Narrows a length or count to its wire width.
pub(crate) fn checked_width<T: TryFrom<usize>>(
    field: &'static str,
    value: usize,
    max: T,
) -> Result<T, TransactionError>
where
    T: Into<i64> + Copy,
{
    T::try_from(value).map_err(|_| TransactionError::OutOfRange {
        field,
        value: i64::try_from(value).unwrap_or(i64::MAX),
        max: max.into(),
    })
}
