//! Fixed-capacity column chunk buffers.
//!
//! A chunk holds up to `capacity` values of one column for one batch, with
//! a parallel validity bit per slot. Chunks are created unallocated; the
//! batch factory triggers allocation only on outermost chunks, and a struct
//! chunk's `allocate` reserves storage for its whole nesting chain. Releases
//! are `Drop`: dropping a batch drops every chunk, and dropping a struct
//! chunk drops its children, exactly once.

use crate::types::ColumnType;
use crate::validity::Validity;
use coltab_result::{Error, Result};

/// Chunk of 64-bit floating point values.
#[derive(Debug, Default)]
pub struct F64Chunk {
    values: Vec<f64>,
    validity: Validity,
    num_values: usize,
}

impl F64Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve backing storage for `capacity` slots. All slots start missing.
    pub fn allocate(&mut self, capacity: usize) {
        self.values = vec![0.0; capacity];
        self.validity.allocate(capacity);
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: f64) {
        self.values[index] = value;
        self.validity.set(index);
    }

    #[inline]
    pub fn set_missing(&mut self, index: usize) {
        self.validity.clear(index);
    }

    #[inline]
    pub fn is_missing(&self, index: usize) -> bool {
        !self.validity.get(index)
    }

    /// Value stored at `index`. Undefined content (not an error) if the slot
    /// is missing; callers check [`F64Chunk::is_missing`] first.
    #[inline]
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn num_values(&self) -> usize {
        self.num_values
    }

    fn seal(&mut self, num_values: usize) {
        self.num_values = num_values;
    }
}

/// Chunk of UTF-8 text values in offsets + byte-buffer layout.
///
/// Values are written in row order; setting a slot beyond the last written
/// one pads the skipped slots as missing, so every slot up to the sealed
/// count has a defined state.
#[derive(Debug)]
pub struct Utf8Chunk {
    offsets: Vec<u32>,
    data: Vec<u8>,
    validity: Validity,
    capacity: usize,
    num_values: usize,
}

impl Default for Utf8Chunk {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            data: Vec::new(),
            validity: Validity::new(),
            capacity: 0,
            num_values: 0,
        }
    }
}

impl Utf8Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, capacity: usize) {
        self.offsets = Vec::with_capacity(capacity + 1);
        self.offsets.push(0);
        self.data = Vec::new();
        self.validity.allocate(capacity);
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn rows_filled(&self) -> usize {
        self.offsets.len() - 1
    }

    fn pad_to(&mut self, row: usize) {
        let last = *self.offsets.last().unwrap_or(&0);
        while self.rows_filled() < row {
            self.offsets.push(last);
        }
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: &str) {
        assert!(index < self.capacity, "utf8 slot index out of bounds");
        debug_assert!(index >= self.rows_filled(), "utf8 slots are write-once");
        self.pad_to(index);
        self.data.extend_from_slice(value.as_bytes());
        self.offsets.push(self.data.len() as u32);
        self.validity.set(index);
    }

    #[inline]
    pub fn set_missing(&mut self, index: usize) {
        assert!(index < self.capacity, "utf8 slot index out of bounds");
        self.pad_to(index + 1);
        self.validity.clear(index);
    }

    #[inline]
    pub fn is_missing(&self, index: usize) -> bool {
        index >= self.rows_filled() || !self.validity.get(index)
    }

    /// Text stored at `index`; the empty string if the slot is missing.
    #[inline]
    pub fn value(&self, index: usize) -> &str {
        if index >= self.rows_filled() {
            return "";
        }
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        std::str::from_utf8(&self.data[start..end]).expect("utf8 chunk stores valid utf8")
    }

    pub fn num_values(&self) -> usize {
        self.num_values
    }

    fn seal(&mut self, num_values: usize) {
        self.pad_to(num_values);
        self.num_values = num_values;
    }
}

/// Composite chunk owning one child chunk per child column.
///
/// The struct-level validity bit marks whole rows missing; child values are
/// stored in the child chunks. Children are created unallocated and receive
/// storage when the outermost chunk of the nesting chain is allocated.
#[derive(Debug)]
pub struct StructChunk {
    children: Vec<ColumnChunk>,
    validity: Validity,
    capacity: usize,
    num_values: usize,
}

impl StructChunk {
    pub fn new(children: Vec<ColumnChunk>) -> Self {
        Self {
            children,
            validity: Validity::new(),
            capacity: 0,
            num_values: 0,
        }
    }

    /// Reserve storage for this chunk and, transitively, its children.
    pub fn allocate(&mut self, capacity: usize) {
        self.allocate_validity(capacity);
        for child in &mut self.children {
            child.allocate(capacity);
        }
    }

    /// Reserve only the struct-level validity, leaving children untouched.
    /// Used by deserializers that rebuild children bottom-up.
    pub fn allocate_validity(&mut self, capacity: usize) {
        self.validity.allocate(capacity);
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> &ColumnChunk {
        &self.children[index]
    }

    pub fn child_mut(&mut self, index: usize) -> &mut ColumnChunk {
        &mut self.children[index]
    }

    #[inline]
    pub fn set_valid(&mut self, index: usize) {
        self.validity.set(index);
    }

    #[inline]
    pub fn set_missing(&mut self, index: usize) {
        self.validity.clear(index);
    }

    #[inline]
    pub fn is_missing(&self, index: usize) -> bool {
        !self.validity.get(index)
    }

    pub fn num_values(&self) -> usize {
        self.num_values
    }

    fn seal(&mut self, num_values: usize) {
        self.num_values = num_values;
        for child in &mut self.children {
            child.seal(num_values);
        }
    }
}

/// One column's buffer for one batch.
///
/// The closed set of chunk kinds mirrors [`ColumnType`]; conversion between
/// the two is an exhaustive `match` in both directions.
#[derive(Debug)]
pub enum ColumnChunk {
    F64(F64Chunk),
    Utf8(Utf8Chunk),
    Struct(StructChunk),
}

impl ColumnChunk {
    /// Build an unallocated chunk tree for `column_type`.
    ///
    /// Struct children are created unallocated as well; storage for a whole
    /// nesting chain is reserved by a single [`ColumnChunk::allocate`] call
    /// on the outermost chunk.
    pub fn for_type(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::F64 => ColumnChunk::F64(F64Chunk::new()),
            ColumnType::Utf8 => ColumnChunk::Utf8(Utf8Chunk::new()),
            ColumnType::Struct(children) => ColumnChunk::Struct(StructChunk::new(
                children.iter().map(ColumnChunk::for_type).collect(),
            )),
        }
    }

    /// Reserve backing storage for `capacity` rows, recursively for struct
    /// children.
    pub fn allocate(&mut self, capacity: usize) {
        match self {
            ColumnChunk::F64(c) => c.allocate(capacity),
            ColumnChunk::Utf8(c) => c.allocate(capacity),
            ColumnChunk::Struct(c) => c.allocate(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        match self {
            ColumnChunk::F64(c) => c.capacity(),
            ColumnChunk::Utf8(c) => c.capacity(),
            ColumnChunk::Struct(c) => c.capacity(),
        }
    }

    pub fn num_values(&self) -> usize {
        match self {
            ColumnChunk::F64(c) => c.num_values(),
            ColumnChunk::Utf8(c) => c.num_values(),
            ColumnChunk::Struct(c) => c.num_values(),
        }
    }

    /// Fix the valid-row count. Rows at or beyond it are never inspected.
    pub fn seal(&mut self, num_values: usize) {
        match self {
            ColumnChunk::F64(c) => c.seal(num_values),
            ColumnChunk::Utf8(c) => c.seal(num_values),
            ColumnChunk::Struct(c) => c.seal(num_values),
        }
    }

    #[inline]
    pub fn is_missing(&self, index: usize) -> bool {
        match self {
            ColumnChunk::F64(c) => c.is_missing(index),
            ColumnChunk::Utf8(c) => c.is_missing(index),
            ColumnChunk::Struct(c) => c.is_missing(index),
        }
    }

    /// Reconstruct the [`ColumnType`] this chunk stores.
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnChunk::F64(_) => ColumnType::F64,
            ColumnChunk::Utf8(_) => ColumnType::Utf8,
            ColumnChunk::Struct(c) => {
                ColumnType::Struct(c.children.iter().map(ColumnChunk::column_type).collect())
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnChunk::F64(_) => "f64",
            ColumnChunk::Utf8(_) => "utf8",
            ColumnChunk::Struct(_) => "struct",
        }
    }

    pub fn as_f64(&self) -> Result<&F64Chunk> {
        match self {
            ColumnChunk::F64(c) => Ok(c),
            other => Err(Error::type_mismatch("f64", other.type_name())),
        }
    }

    pub fn as_f64_mut(&mut self) -> Result<&mut F64Chunk> {
        match self {
            ColumnChunk::F64(c) => Ok(c),
            other => Err(Error::type_mismatch("f64", other.type_name())),
        }
    }

    pub fn as_utf8(&self) -> Result<&Utf8Chunk> {
        match self {
            ColumnChunk::Utf8(c) => Ok(c),
            other => Err(Error::type_mismatch("utf8", other.type_name())),
        }
    }

    pub fn as_utf8_mut(&mut self) -> Result<&mut Utf8Chunk> {
        match self {
            ColumnChunk::Utf8(c) => Ok(c),
            other => Err(Error::type_mismatch("utf8", other.type_name())),
        }
    }

    pub fn as_struct(&self) -> Result<&StructChunk> {
        match self {
            ColumnChunk::Struct(c) => Ok(c),
            other => Err(Error::type_mismatch("struct", other.type_name())),
        }
    }

    pub fn as_struct_mut(&mut self) -> Result<&mut StructChunk> {
        match self {
            ColumnChunk::Struct(c) => Ok(c),
            other => Err(Error::type_mismatch("struct", other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_chunk_set_and_missing() {
        let mut c = F64Chunk::new();
        c.allocate(4);
        c.set(0, 1.5);
        c.set_missing(1);
        c.set(2, -3.0);
        assert!(!c.is_missing(0));
        assert!(c.is_missing(1));
        assert!(c.is_missing(3));
        assert_eq!(c.value(2), -3.0);
    }

    #[test]
    fn utf8_chunk_pads_skipped_slots_as_missing() {
        let mut c = Utf8Chunk::new();
        c.allocate(5);
        c.set(0, "alpha");
        // slots 1 and 2 skipped entirely
        c.set(3, "delta");
        assert_eq!(c.value(0), "alpha");
        assert!(c.is_missing(1));
        assert!(c.is_missing(2));
        assert_eq!(c.value(3), "delta");
        assert!(c.is_missing(4));
    }

    #[test]
    fn utf8_seal_defines_trailing_slots() {
        let mut c = Utf8Chunk::new();
        c.allocate(3);
        c.set(0, "x");
        let mut chunk = ColumnChunk::Utf8(c);
        chunk.seal(3);
        let c = chunk.as_utf8().unwrap();
        assert_eq!(c.num_values(), 3);
        assert!(c.is_missing(2));
        assert_eq!(c.value(2), "");
    }

    #[test]
    fn struct_allocation_is_triggered_from_the_outermost_chunk() {
        let ty = ColumnType::Struct(vec![
            ColumnType::F64,
            ColumnType::Struct(vec![ColumnType::Utf8]),
        ]);
        let mut chunk = ColumnChunk::for_type(&ty);
        // freshly created chunks hold no storage anywhere in the chain
        assert_eq!(chunk.capacity(), 0);
        chunk.allocate(8);
        let sc = chunk.as_struct().unwrap();
        assert_eq!(sc.capacity(), 8);
        assert_eq!(sc.child(0).capacity(), 8);
        assert_eq!(sc.child(1).as_struct().unwrap().child(0).capacity(), 8);
    }

    #[test]
    fn struct_seal_propagates_to_children() {
        let ty = ColumnType::Struct(vec![ColumnType::F64, ColumnType::Utf8]);
        let mut chunk = ColumnChunk::for_type(&ty);
        chunk.allocate(4);
        chunk.seal(3);
        let sc = chunk.as_struct().unwrap();
        assert_eq!(sc.num_values(), 3);
        assert_eq!(sc.child(0).num_values(), 3);
        assert_eq!(sc.child(1).num_values(), 3);
    }

    #[test]
    fn typed_accessors_report_mismatch() {
        let chunk = ColumnChunk::for_type(&ColumnType::F64);
        let err = chunk.as_utf8().unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: "utf8",
                found: "f64"
            }
        ));
    }

    #[test]
    fn column_type_round_trips_through_chunks() {
        let ty = ColumnType::Struct(vec![ColumnType::Utf8, ColumnType::F64]);
        assert_eq!(ColumnChunk::for_type(&ty).column_type(), ty);
    }
}
