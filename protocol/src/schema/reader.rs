//! Bounds-checked reads over a self-describing buffer.
//!
//! Layout recap (FlatBuffers binary format):
//!
//! - `u32` at 0: position of the root table.
//! - a table starts with an `i32` soffset; its vtable lives at
//!   `table - soffset`.
//! - vtable: `u16` vtable size, `u16` table size, then one `u16` per field
//!   slot holding the field's offset from the table start (0 = absent).
//! - an offset field (vector or child table) holds a `u32` relative to its
//!   own position; vectors start with a `u32` element count.
//!
//! The `flatbuffers` crate's own accessors (`Table::get`, `follow`) expect
//! generated, statically known types and are `unsafe` on unverified
//! input. Layouts here are runtime data, so lookups go through this
//! reader, where every read is bounds-checked and a bad offset becomes
//! [`TransactionError::MalformedBuffer`].

use crate::error::TransactionError;

/// Read-only view of a finished buffer.
#[derive(Debug, Clone, Copy)]
pub struct BufferReader<'a> {
    buf: &'a [u8],
}

/// Location of a vector's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorRef {
    pub data: usize,
    pub len: usize,
}

impl<'a> BufferReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn slice(&self, pos: usize, len: usize) -> Result<&'a [u8], TransactionError> {
        pos.checked_add(len)
            .and_then(|end| self.buf.get(pos..end))
            .ok_or_else(|| {
                TransactionError::MalformedBuffer(format!(
                    "read of {len} bytes at {pos} exceeds buffer of {} bytes",
                    self.buf.len()
                ))
            })
    }

    pub fn bytes(&self, pos: usize, len: usize) -> Result<&'a [u8], TransactionError> {
        self.slice(pos, len)
    }

    fn read_u16(&self, pos: usize) -> Result<u16, TransactionError> {
        let b = self.slice(pos, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&self, pos: usize) -> Result<u32, TransactionError> {
        let b = self.slice(pos, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i32(&self, pos: usize) -> Result<i32, TransactionError> {
        let b = self.slice(pos, 4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn follow(&self, pos: usize) -> Result<usize, TransactionError> {
        let rel = self.read_u32(pos)? as usize;
        pos.checked_add(rel)
            .ok_or_else(|| TransactionError::MalformedBuffer(format!("offset overflow at {pos}")))
    }

    /// Position of the root table.
    pub fn root_table(&self) -> Result<usize, TransactionError> {
        self.follow(0)
    }

    /// Absolute position of the field stored in vtable `slot` of the table
    /// at `table`, or `None` when the field is absent.
    pub fn field(&self, table: usize, slot: usize) -> Result<Option<usize>, TransactionError> {
        let soffset = i64::from(self.read_i32(table)?);
        let vtable = usize::try_from(table as i64 - soffset).map_err(|_| {
            TransactionError::MalformedBuffer(format!("vtable of table at {table} underflows"))
        })?;
        let vtable_size = usize::from(self.read_u16(vtable)?);
        if slot + 2 > vtable_size {
            return Ok(None);
        }
        match self.read_u16(vtable + slot)? {
            0 => Ok(None),
            offset => Ok(Some(table + usize::from(offset))),
        }
    }

    /// Resolves the offset field at `pos` to a child table.
    pub fn table_at(&self, pos: usize) -> Result<usize, TransactionError> {
        self.follow(pos)
    }

    /// Resolves the offset field at `pos` to a vector.
    pub fn vector_at(&self, pos: usize) -> Result<VectorRef, TransactionError> {
        let start = self.follow(pos)?;
        let len = self.read_u32(start)? as usize;
        Ok(VectorRef {
            data: start + 4,
            len,
        })
    }
}
