//! Values handed to the buffer builder, one per schema field.

use crate::model::Uint64;
use crate::schema::{FieldKind, ScalarWidth};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    UByte(u8),
    UShort(u16),
    UInt(u32),
    Bytes(Vec<u8>),
    Words(Vec<u32>),
    Table(Vec<FieldValue>),
    TableArray(Vec<Vec<FieldValue>>),
    /// No entry in the buffer; the field's presence policy decides.
    Absent,
}

impl FieldValue {
    /// A 64-bit value as its `[low, high]` word pair.
    pub fn uint64(value: Uint64) -> Self {
        Self::Words(vec![value.low(), value.high()])
    }

    pub fn bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self::Bytes(bytes.as_ref().to_vec())
    }

    /// Whether this value can be stored in a field of `kind`.
    pub(crate) fn fits(&self, kind: &FieldKind) -> bool {
        matches!(
            (self, kind),
            (Self::Absent, _)
                | (Self::UByte(_), FieldKind::Scalar(ScalarWidth::Byte))
                | (Self::UShort(_), FieldKind::Scalar(ScalarWidth::Short))
                | (Self::UInt(_), FieldKind::Scalar(ScalarWidth::Int))
                | (
                    Self::Bytes(_),
                    FieldKind::Array {
                        element: ScalarWidth::Byte,
                        ..
                    }
                )
                | (
                    Self::Words(_),
                    FieldKind::Array {
                        element: ScalarWidth::Int,
                        ..
                    }
                )
                | (Self::Table(_), FieldKind::Table(_))
                | (Self::TableArray(_), FieldKind::TableArray(_))
        )
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::UByte(_) => "ubyte",
            Self::UShort(_) => "ushort",
            Self::UInt(_) => "uint",
            Self::Bytes(_) => "byte array",
            Self::Words(_) => "word array",
            Self::Table(_) => "table",
            Self::TableArray(_) => "table array",
            Self::Absent => "absent",
        }
    }
}
