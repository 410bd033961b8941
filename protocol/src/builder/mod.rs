//! # Buffer Builder
//!
//! One generic encoder for every transaction type. A [`BufferBuilder`] is
//! handed a [`Schema`] and a list of [`FieldValue`]s in schema order, and
//! writes them into a FlatBuffers-format self-describing buffer that
//! [`Schema::serialize`] later flattens.
//!
//! ## Build order
//!
//! FlatBuffers are written back to front. Every vector and child table a
//! table refers to is finished before that table is started, so each
//! table is built in two passes: children first, then slots.
//!
//! A builder is consumed by [`BufferBuilder::build`] and cannot be reused.

pub mod values;

pub use values::FieldValue;

use flatbuffers::{FlatBufferBuilder, TableFinishedWIPOffset, UnionWIPOffset, WIPOffset};
use tracing::trace;

use crate::error::TransactionError;
use crate::schema::{slot_of, FieldDescriptor, FieldKind, Schema};

/// A finished self-describing buffer, ready for [`Schema::serialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfDescribingBuffer(Vec<u8>);

impl SelfDescribingBuffer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// A slot value once its children have been written.
enum Prepared {
    Byte(u8),
    Short(u16),
    Int(u32),
    Offset(WIPOffset<UnionWIPOffset>),
    Skip,
}

pub struct BufferBuilder {
    schema: &'static Schema,
    fbb: FlatBufferBuilder<'static>,
}

impl BufferBuilder {
    pub fn new(schema: &'static Schema) -> Self {
        Self::with_capacity(schema, 256)
    }

    pub fn with_capacity(schema: &'static Schema, capacity: usize) -> Self {
        Self {
            schema,
            fbb: FlatBufferBuilder::with_capacity(capacity),
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Writes `values` (one per schema field, in order) and finishes the
    /// buffer.
    pub fn build(mut self, values: &[FieldValue]) -> Result<SelfDescribingBuffer, TransactionError> {
        let fields = self.schema.fields;
        let root = self.write_table(fields, values)?;
        self.fbb.finish_minimal(root);
        let buffer = self.fbb.finished_data().to_vec();
        trace!(schema = self.schema.name, bytes = buffer.len(), "built buffer");
        Ok(SelfDescribingBuffer(buffer))
    }

    fn mismatch(&self, field: &FieldDescriptor, reason: String) -> TransactionError {
        TransactionError::SchemaMismatch {
            transaction: self.schema.name,
            field: field.name,
            reason,
        }
    }

    fn write_table(
        &mut self,
        fields: &'static [FieldDescriptor],
        values: &[FieldValue],
    ) -> Result<WIPOffset<TableFinishedWIPOffset>, TransactionError> {
        if fields.len() != values.len() {
            return Err(TransactionError::SchemaMismatch {
                transaction: self.schema.name,
                field: fields.first().map_or("<table>", |f| f.name),
                reason: format!("{} values for {} fields", values.len(), fields.len()),
            });
        }

        let mut prepared = Vec::with_capacity(fields.len());
        for (field, value) in fields.iter().zip(values) {
            prepared.push(self.prepare(field, value)?);
        }

        let start = self.fbb.start_table();
        for (index, slot) in prepared.into_iter().enumerate() {
            let voffset = slot_of(index) as flatbuffers::VOffsetT;
            match slot {
                Prepared::Byte(v) => self.fbb.push_slot_always(voffset, v),
                Prepared::Short(v) => self.fbb.push_slot_always(voffset, v),
                Prepared::Int(v) => self.fbb.push_slot_always(voffset, v),
                Prepared::Offset(v) => self.fbb.push_slot_always(voffset, v),
                Prepared::Skip => {}
            }
        }
        Ok(self.fbb.end_table(start))
    }

    /// Finishes any vector or child table `value` needs.
    fn prepare(
        &mut self,
        field: &FieldDescriptor,
        value: &FieldValue,
    ) -> Result<Prepared, TransactionError> {
        if !value.fits(&field.kind) {
            return Err(self.mismatch(
                field,
                format!("{} value for a {:?} field", value.kind_name(), field.kind),
            ));
        }

        let prepared = match (value, field.kind) {
            (FieldValue::UByte(v), _) => Prepared::Byte(*v),
            (FieldValue::UShort(v), _) => Prepared::Short(*v),
            (FieldValue::UInt(v), _) => Prepared::Int(*v),
            (FieldValue::Bytes(v), _) => {
                Prepared::Offset(self.fbb.create_vector(v.as_slice()).as_union_value())
            }
            (FieldValue::Words(v), _) => {
                Prepared::Offset(self.fbb.create_vector(v.as_slice()).as_union_value())
            }
            (FieldValue::Table(children), FieldKind::Table(sub)) => {
                Prepared::Offset(self.write_table(sub, children)?.as_union_value())
            }
            (FieldValue::TableArray(rows), FieldKind::TableArray(sub)) => {
                let mut offsets = Vec::with_capacity(rows.len());
                for row in rows {
                    offsets.push(self.write_table(sub, row)?);
                }
                Prepared::Offset(self.fbb.create_vector(offsets.as_slice()).as_union_value())
            }
            (FieldValue::Absent, _) => Prepared::Skip,
            (other, _) => {
                return Err(self.mismatch(field, format!("unexpected {} value", other.kind_name())))
            }
        };
        Ok(prepared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{bytes, table, table_array, ubyte, uint, ushort, var_bytes, words};

    const MESSAGE: &[FieldDescriptor] = &[ubyte("type"), var_bytes("payload")];
    const MOSAIC: &[FieldDescriptor] = &[words("id", 2), words("amount", 2)];

    static LAYOUT: Schema = Schema {
        name: "Layout",
        fields: &[
            uint("size"),
            bytes("signer", 4).defaulted(),
            ushort("type"),
            table("message", MESSAGE),
            table_array("mosaics", MOSAIC),
        ],
    };

    fn values(mosaics: usize) -> Vec<FieldValue> {
        vec![
            FieldValue::UInt(7),
            FieldValue::Absent,
            FieldValue::UShort(0x4154),
            FieldValue::Table(vec![FieldValue::UByte(0), FieldValue::bytes(b"hi")]),
            FieldValue::TableArray(
                (0..mosaics)
                    .map(|i| vec![FieldValue::Words(vec![i as u32, 0]), FieldValue::Words(vec![10, 0])])
                    .collect(),
            ),
        ]
    }

    #[test]
    fn built_buffer_resolves_back_to_values() {
        let buffer = BufferBuilder::new(&LAYOUT).build(&values(2)).unwrap();
        let canonical = LAYOUT.serialize(buffer.as_bytes()).unwrap();

        let mut expected = vec![7, 0, 0, 0, 0, 0, 0, 0, 0x54, 0x41, 0, b'h', b'i'];
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 10, 0, 0, 0, 0, 0, 0, 0]);
        expected.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0, 10, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(canonical, expected);
    }

    #[test]
    fn empty_table_array_contributes_nothing() {
        let buffer = BufferBuilder::new(&LAYOUT).build(&values(0)).unwrap();
        let canonical = LAYOUT.serialize(buffer.as_bytes()).unwrap();
        assert_eq!(canonical.len(), 13);
    }

    #[test]
    fn kind_mismatch_is_schema_error() {
        let mut bad = values(0);
        bad[2] = FieldValue::UInt(1);
        let err = BufferBuilder::new(&LAYOUT).build(&bad).unwrap_err();
        assert!(matches!(err, TransactionError::SchemaMismatch { field: "type", .. }));
    }

    #[test]
    fn value_count_mismatch_is_schema_error() {
        let err = BufferBuilder::new(&LAYOUT)
            .build(&[FieldValue::UInt(1)])
            .unwrap_err();
        assert!(matches!(err, TransactionError::SchemaMismatch { .. }));
    }

    #[test]
    fn building_is_deterministic() {
        let a = BufferBuilder::new(&LAYOUT).build(&values(3)).unwrap();
        let b = BufferBuilder::new(&LAYOUT).build(&values(3)).unwrap();
        assert_eq!(a, b);
    }
}
