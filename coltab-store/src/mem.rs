//! In-memory table store used for tests and as the default backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use coltab_chunk::{ColumnType, RowBatch, RowBatchFactory};
use coltab_result::{Error, Result};
use tracing::debug;

use crate::config::{RowBatchReaderConfig, TableStoreConfig};
use crate::traits::{BatchHandle, RowBatchReader, RowBatchWriter, TableReadStore, TableStore};

/// Store retaining sealed batches on the heap.
///
/// Batches are shared between the store and any readers through `Arc`, so
/// a reader releasing its handle never invalidates another reader.
#[derive(Debug)]
pub struct MemTableStore {
    types: Arc<[ColumnType]>,
    cfg: TableStoreConfig,
    batches: Arc<RwLock<Vec<Arc<RowBatch>>>>,
    writer_created: AtomicBool,
    closed: AtomicBool,
}

impl MemTableStore {
    pub fn new(types: impl Into<Arc<[ColumnType]>>, cfg: TableStoreConfig) -> Result<Self> {
        let types = types.into();
        if types.is_empty() {
            return Err(Error::invalid_argument(
                "schema must have at least one column",
            ));
        }
        Ok(Self {
            types,
            cfg,
            batches: Arc::new(RwLock::new(Vec::new())),
            writer_created: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    /// Number of batches written so far.
    pub fn num_batches(&self) -> usize {
        self.batches.read().expect("batch list lock poisoned").len()
    }
}

impl TableReadStore for MemTableStore {
    type Reader = MemBatchReader;

    fn column_types(&self) -> &[ColumnType] {
        &self.types
    }

    fn create_reader(&self, config: RowBatchReaderConfig) -> Result<MemBatchReader> {
        config.validate(self.types.len())?;
        let batches = self
            .batches
            .read()
            .expect("batch list lock poisoned")
            .clone();
        Ok(MemBatchReader {
            batches,
            projection: config.column_indices().map(<[usize]>::to_vec),
        })
    }

    fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(batches = self.num_batches(), "closing mem table store");
        }
        Ok(())
    }
}

impl TableStore for MemTableStore {
    type Writer = MemBatchWriter;

    fn create_factory(&self) -> Result<RowBatchFactory> {
        RowBatchFactory::new(Arc::clone(&self.types), self.cfg.chunk_size())
    }

    fn create_writer(&self) -> Result<MemBatchWriter> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::Closed);
        }
        if self.writer_created.swap(true, Ordering::SeqCst) {
            return Err(Error::invalid_argument(
                "store already handed out its writer",
            ));
        }
        Ok(MemBatchWriter {
            batches: Arc::clone(&self.batches),
            num_columns: self.types.len(),
            chunk_size: self.cfg.chunk_size(),
            closed: false,
        })
    }
}

/// Writer appending sealed batches to the shared batch list.
pub struct MemBatchWriter {
    batches: Arc<RwLock<Vec<Arc<RowBatch>>>>,
    num_columns: usize,
    chunk_size: usize,
    closed: bool,
}

impl RowBatchWriter for MemBatchWriter {
    fn write(&mut self, batch: RowBatch) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        if batch.num_columns() != self.num_columns {
            return Err(Error::invalid_argument(format!(
                "batch has {} columns, store schema has {}",
                batch.num_columns(),
                self.num_columns
            )));
        }
        if batch.capacity() != self.chunk_size {
            return Err(Error::invalid_argument(format!(
                "batch capacity {} does not match store chunk size {}",
                batch.capacity(),
                self.chunk_size
            )));
        }
        debug!(rows = batch.num_values(), "appending batch");
        self.batches
            .write()
            .expect("batch list lock poisoned")
            .push(Arc::new(batch));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        self.closed = true;
        Ok(())
    }
}

/// Reader over a snapshot of the batch sequence.
pub struct MemBatchReader {
    batches: Vec<Arc<RowBatch>>,
    projection: Option<Vec<usize>>,
}

impl RowBatchReader for MemBatchReader {
    fn read(&self, batch_index: usize) -> Result<BatchHandle> {
        self.batches
            .get(batch_index)
            .cloned()
            .map(BatchHandle::new)
            .ok_or(Error::NotFound)
    }

    fn num_batches(&self) -> usize {
        self.batches.len()
    }

    fn projection(&self) -> Option<&[usize]> {
        self.projection.as_deref()
    }
}
