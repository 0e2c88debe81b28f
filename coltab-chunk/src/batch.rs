//! Row batches and their factory.

use std::sync::Arc;

use crate::chunk::ColumnChunk;
use crate::types::ColumnType;
use coltab_result::{Error, Result};

/// Row-aligned set of chunks, one per top-level column.
///
/// Every chunk shares the batch capacity and, once sealed, the same
/// valid-row count; struct children inherit that count recursively. Only
/// the last batch of a table may be sealed below its capacity.
///
/// A batch is handed to a store writer by value, so the producer cannot
/// touch it after hand-off; readers share sealed batches immutably.
/// Dropping a batch releases every chunk exactly once.
#[derive(Debug)]
pub struct RowBatch {
    chunks: Vec<ColumnChunk>,
    capacity: usize,
    num_values: usize,
}

impl RowBatch {
    pub fn new(chunks: Vec<ColumnChunk>, capacity: usize) -> Self {
        Self {
            chunks,
            capacity,
            num_values: 0,
        }
    }

    pub fn num_columns(&self) -> usize {
        self.chunks.len()
    }

    /// The parallel chunk array in column order.
    pub fn columns(&self) -> &[ColumnChunk] {
        &self.chunks
    }

    pub fn column(&self, index: usize) -> &ColumnChunk {
        &self.chunks[index]
    }

    pub fn column_mut(&mut self, index: usize) -> &mut ColumnChunk {
        &mut self.chunks[index]
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Valid-row count; zero until sealed.
    pub fn num_values(&self) -> usize {
        self.num_values
    }

    /// Fix the valid-row count across every chunk in the batch.
    pub fn seal(&mut self, num_values: usize) -> Result<()> {
        if num_values > self.capacity {
            return Err(Error::invalid_argument(format!(
                "cannot seal {num_values} rows into a batch of capacity {}",
                self.capacity
            )));
        }
        self.num_values = num_values;
        for chunk in &mut self.chunks {
            chunk.seal(num_values);
        }
        Ok(())
    }
}

/// Allocator for empty row batches.
///
/// The factory is the single place where column types are dispatched to
/// chunk implementations. Chunk trees are built recursively; children of a
/// struct column are created unallocated and the factory reserves storage
/// only through the outermost chunk of each column, so nested columns are
/// allocated exactly once.
#[derive(Debug, Clone)]
pub struct RowBatchFactory {
    types: Arc<[ColumnType]>,
    chunk_size: usize,
}

impl RowBatchFactory {
    pub fn new(types: Arc<[ColumnType]>, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::invalid_argument("chunk size must be positive"));
        }
        Ok(Self { types, chunk_size })
    }

    pub fn column_types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Create a fresh, fully allocated, unsealed batch.
    pub fn create(&self) -> RowBatch {
        let chunks = self
            .types
            .iter()
            .map(|ty| {
                let mut chunk = ColumnChunk::for_type(ty);
                chunk.allocate(self.chunk_size);
                chunk
            })
            .collect();
        RowBatch::new(chunks, self.chunk_size)
    }
}
