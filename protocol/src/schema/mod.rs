//! # Schema Engine
//!
//! Turns a self-describing buffer into the canonical payload: every field
//! of a [`Schema`] in declaration order, concatenated, with no offset
//! tables left.
//!
//! ## Resolution rules
//!
//! Field `i` of a table is looked up in vtable slot `4 + 2 * i`.
//!
//! | Kind         | Present                              | Absent                 |
//! |--------------|--------------------------------------|------------------------|
//! | scalar       | its bytes (already little-endian)    | per [`Presence`]       |
//! | fixed array  | exactly `len * width` bytes          | per [`Presence`]       |
//! | var array    | every element                        | per [`Presence`]       |
//! | table        | the child table, recursively         | per [`Presence`]       |
//! | table array  | each element resolved independently  | per [`Presence`]       |
//!
//! Tables in an array are not assumed to be contiguous: each element's
//! offset is followed on its own.
//!
//! Values whose textual form is big-endian (ids and amounts written as 16
//! hex digits) are byte-reversed into little-endian before they reach the
//! builder, so the engine only ever copies.

pub mod field;
pub mod reader;

pub use field::{
    bytes, table, table_array, ubyte, uint, ushort, var_bytes, words, FieldDescriptor, FieldKind,
    Presence, ScalarWidth,
};
pub use reader::{BufferReader, VectorRef};

use tracing::trace;

use crate::error::TransactionError;

/// Vtable slot of field `index`.
pub const fn slot_of(index: usize) -> usize {
    4 + 2 * index
}

/// The wire layout of one transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Transaction type name used in error messages.
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl Schema {
    /// Resolves `buffer` into canonical bytes.
    pub fn serialize(&self, buffer: &[u8]) -> Result<Vec<u8>, TransactionError> {
        let reader = BufferReader::new(buffer);
        let root = reader.root_table()?;
        let mut out = Vec::with_capacity(buffer.len());
        self.write_table(&reader, root, self.fields, &mut out)?;
        trace!(schema = self.name, bytes = out.len(), "resolved buffer");
        Ok(out)
    }

    fn write_table(
        &self,
        reader: &BufferReader<'_>,
        table: usize,
        fields: &'static [FieldDescriptor],
        out: &mut Vec<u8>,
    ) -> Result<(), TransactionError> {
        for (index, field) in fields.iter().enumerate() {
            match reader.field(table, slot_of(index))? {
                Some(pos) => self.write_present(reader, field, pos, out)?,
                None => self.write_absent(field, out)?,
            }
        }
        Ok(())
    }

    fn write_present(
        &self,
        reader: &BufferReader<'_>,
        field: &FieldDescriptor,
        pos: usize,
        out: &mut Vec<u8>,
    ) -> Result<(), TransactionError> {
        match field.kind {
            FieldKind::Scalar(width) => {
                out.extend_from_slice(reader.bytes(pos, width.bytes())?);
            }
            FieldKind::Array { element, len } => {
                let vector = reader.vector_at(pos)?;
                if let Some(expected) = len {
                    if vector.len != expected {
                        return Err(TransactionError::SchemaMismatch {
                            transaction: self.name,
                            field: field.name,
                            reason: format!(
                                "fixed array holds {} elements, layout declares {expected}",
                                vector.len
                            ),
                        });
                    }
                }
                let byte_len = vector.len.checked_mul(element.bytes()).ok_or_else(|| {
                    TransactionError::MalformedBuffer(format!("vector length {} overflows", vector.len))
                })?;
                out.extend_from_slice(reader.bytes(vector.data, byte_len)?);
            }
            FieldKind::Table(fields) => {
                let child = reader.table_at(pos)?;
                self.write_table(reader, child, fields, out)?;
            }
            FieldKind::TableArray(fields) => {
                let vector = reader.vector_at(pos)?;
                for element in 0..vector.len {
                    let child = reader.table_at(vector.data + 4 * element)?;
                    self.write_table(reader, child, fields, out)?;
                }
            }
        }
        Ok(())
    }

    fn write_absent(
        &self,
        field: &FieldDescriptor,
        out: &mut Vec<u8>,
    ) -> Result<(), TransactionError> {
        match field.presence {
            Presence::Required => Err(TransactionError::MissingField {
                transaction: self.name,
                field: field.name,
            }),
            Presence::Defaulted => {
                out.resize(out.len() + field.default_width(), 0);
                Ok(())
            }
            Presence::Optional => Ok(()),
        }
    }

    /// Bytes contributed when every field takes its absent form. Required
    /// fields count at their default width.
    pub fn fixed_width(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| f.presence != Presence::Optional)
            .map(FieldDescriptor::default_width)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatbuffers::FlatBufferBuilder;

    const ENTRY: &[FieldDescriptor] = &[ubyte("kind"), words("amount", 2)];

    static SAMPLE: Schema = Schema {
        name: "Sample",
        fields: &[
            uint("size"),
            bytes("key", 4).defaulted(),
            ushort("type"),
            var_bytes("note").optional(),
            table_array("entries", ENTRY),
        ],
    };

    /// Hand-built with the raw flatbuffers API, without our builder.
    fn sample_buffer(with_key: bool) -> Vec<u8> {
        let mut fbb = FlatBufferBuilder::new();
        let mut entries = Vec::new();
        for (kind, amount) in [(1u8, [5u32, 0]), (2u8, [6u32, 1])] {
            let amount = fbb.create_vector(&amount);
            let start = fbb.start_table();
            fbb.push_slot_always(slot_of(0) as u16, kind);
            fbb.push_slot_always(slot_of(1) as u16, amount);
            entries.push(fbb.end_table(start));
        }
        let entries = fbb.create_vector(entries.as_slice());
        let key = with_key.then(|| fbb.create_vector(&[0xAAu8, 0xBB, 0xCC, 0xDD]));

        let start = fbb.start_table();
        fbb.push_slot_always(slot_of(0) as u16, 99u32);
        if let Some(key) = key {
            fbb.push_slot_always(slot_of(1) as u16, key);
        }
        fbb.push_slot_always(slot_of(2) as u16, 0x4154u16);
        fbb.push_slot_always(slot_of(4) as u16, entries);
        let root = fbb.end_table(start);
        fbb.finish_minimal(root);
        fbb.finished_data().to_vec()
    }

    #[test]
    fn resolves_fields_in_declaration_order() {
        let out = SAMPLE.serialize(&sample_buffer(true)).unwrap();
        let mut expected = vec![99, 0, 0, 0, 0xAA, 0xBB, 0xCC, 0xDD, 0x54, 0x41];
        expected.extend_from_slice(&[1, 5, 0, 0, 0, 0, 0, 0, 0]);
        expected.extend_from_slice(&[2, 6, 0, 0, 0, 1, 0, 0, 0]);
        assert_eq!(out, expected);
    }

    #[test]
    fn defaulted_field_is_zero_filled_and_optional_skipped() {
        let out = SAMPLE.serialize(&sample_buffer(false)).unwrap();
        assert_eq!(&out[4..8], &[0, 0, 0, 0]);
        assert_eq!(&out[8..10], &[0x54, 0x41]);
        assert_eq!(out.len(), 10 + 18);
    }

    #[test]
    fn missing_required_field_names_field_and_type() {
        let mut fbb = FlatBufferBuilder::new();
        let start = fbb.start_table();
        fbb.push_slot_always(slot_of(0) as u16, 1u32);
        let root = fbb.end_table(start);
        fbb.finish_minimal(root);

        let err = SAMPLE.serialize(fbb.finished_data()).unwrap_err();
        assert_eq!(
            err,
            TransactionError::MissingField {
                transaction: "Sample",
                field: "type"
            }
        );
    }

    #[test]
    fn fixed_array_length_is_enforced() {
        static KEYED: Schema = Schema {
            name: "Keyed",
            fields: &[bytes("key", 4)],
        };
        let mut fbb = FlatBufferBuilder::new();
        let key = fbb.create_vector(&[1u8, 2, 3]);
        let start = fbb.start_table();
        fbb.push_slot_always(slot_of(0) as u16, key);
        let root = fbb.end_table(start);
        fbb.finish_minimal(root);

        assert!(matches!(
            KEYED.serialize(fbb.finished_data()),
            Err(TransactionError::SchemaMismatch { field: "key", .. })
        ));
    }

    #[test]
    fn garbage_is_malformed_not_panic() {
        assert!(matches!(
            SAMPLE.serialize(&[1, 2, 3]),
            Err(TransactionError::MalformedBuffer(_))
        ));
        assert!(SAMPLE.serialize(&[0xF0, 0xFF, 0xFF, 0x7F, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn fixed_width_counts_required_and_defaulted() {
        // size 4 + key 4 + type 2; note optional; entries var.
        assert_eq!(SAMPLE.fixed_width(), 10);
    }
}
