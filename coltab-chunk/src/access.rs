//! Borrow cursors over a single chunk position.
//!
//! An access binds one chunk and one row. Cursors construct accesses on
//! demand for their current row, so the shared row index lives in the
//! cursor and an access can never outlive a batch switch: the borrow ends
//! when the cursor is advanced. Typed getters and setters check the chunk
//! kind on every call and report a mismatch instead of coercing.

use crate::chunk::ColumnChunk;
use coltab_result::Result;

/// Read access to one chunk slot.
#[derive(Clone, Copy)]
pub struct ChunkReadAccess<'a> {
    chunk: &'a ColumnChunk,
    row: usize,
}

impl<'a> ChunkReadAccess<'a> {
    pub fn new(chunk: &'a ColumnChunk, row: usize) -> Self {
        Self { chunk, row }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.chunk.is_missing(self.row)
    }

    /// Floating point value at the bound slot.
    pub fn f64(&self) -> Result<f64> {
        Ok(self.chunk.as_f64()?.value(self.row))
    }

    /// Text value at the bound slot.
    pub fn utf8(&self) -> Result<&'a str> {
        Ok(self.chunk.as_utf8()?.value(self.row))
    }

    /// Descend into child `index` of a struct column at the same row.
    pub fn child(&self, index: usize) -> Result<ChunkReadAccess<'a>> {
        Ok(ChunkReadAccess::new(
            self.chunk.as_struct()?.child(index),
            self.row,
        ))
    }
}

/// Write access to one chunk slot.
pub struct ChunkWriteAccess<'a> {
    chunk: &'a mut ColumnChunk,
    row: usize,
}

impl<'a> ChunkWriteAccess<'a> {
    pub fn new(chunk: &'a mut ColumnChunk, row: usize) -> Self {
        Self { chunk, row }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn set_f64(&mut self, value: f64) -> Result<()> {
        self.chunk.as_f64_mut()?.set(self.row, value);
        Ok(())
    }

    pub fn set_utf8(&mut self, value: &str) -> Result<()> {
        self.chunk.as_utf8_mut()?.set(self.row, value);
        Ok(())
    }

    /// Mark the bound slot missing. Valid for every chunk kind.
    pub fn set_missing(&mut self) -> Result<()> {
        match self.chunk {
            ColumnChunk::F64(c) => c.set_missing(self.row),
            ColumnChunk::Utf8(c) => c.set_missing(self.row),
            ColumnChunk::Struct(c) => c.set_missing(self.row),
        }
        Ok(())
    }

    /// Descend into child `index` of a struct column at the same row.
    ///
    /// Descending marks the struct row itself as present; rows never
    /// descended into stay missing.
    pub fn child(&mut self, index: usize) -> Result<ChunkWriteAccess<'_>> {
        let row = self.row;
        let sc = self.chunk.as_struct_mut()?;
        sc.set_valid(row);
        Ok(ChunkWriteAccess::new(sc.child_mut(index), row))
    }
}
