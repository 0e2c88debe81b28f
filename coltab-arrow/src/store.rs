//! Table store persisting batches as Arrow IPC stream blobs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use arrow::datatypes::SchemaRef;
use arrow::ipc::reader::StreamReader;
use arrow::ipc::writer::StreamWriter;
use coltab_chunk::{ColumnType, RowBatch, RowBatchFactory};
use coltab_result::{Error, Result};
use coltab_store::{
    BatchHandle, RowBatchReader, RowBatchReaderConfig, RowBatchWriter, TableReadStore,
    TableStore, TableStoreConfig,
};
use tracing::debug;

use crate::convert::{batch_to_record, record_to_batch, schema_for};

/// Store serializing every sealed batch into its own Arrow IPC stream.
///
/// Each blob is self-contained, so batches can be materialized in any
/// order and the reader projection decides which columns are rebuilt.
pub struct ArrowTableStore {
    types: Arc<[ColumnType]>,
    cfg: TableStoreConfig,
    schema: SchemaRef,
    blobs: Arc<RwLock<Vec<Vec<u8>>>>,
    writer_created: AtomicBool,
    closed: AtomicBool,
}

impl ArrowTableStore {
    pub fn new(types: impl Into<Arc<[ColumnType]>>, cfg: TableStoreConfig) -> Result<Self> {
        let types = types.into();
        if types.is_empty() {
            return Err(Error::invalid_argument(
                "schema must have at least one column",
            ));
        }
        let schema = schema_for(&types);
        Ok(Self {
            types,
            cfg,
            schema,
            blobs: Arc::new(RwLock::new(Vec::new())),
            writer_created: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    /// Total serialized size of all written batches.
    pub fn stored_bytes(&self) -> usize {
        self.blobs
            .read()
            .expect("blob list lock poisoned")
            .iter()
            .map(Vec::len)
            .sum()
    }
}

impl TableReadStore for ArrowTableStore {
    type Reader = ArrowBatchReader;

    fn column_types(&self) -> &[ColumnType] {
        &self.types
    }

    fn create_reader(&self, config: RowBatchReaderConfig) -> Result<ArrowBatchReader> {
        config.validate(self.types.len())?;
        let num_batches = self.blobs.read().expect("blob list lock poisoned").len();
        Ok(ArrowBatchReader {
            blobs: Arc::clone(&self.blobs),
            num_batches,
            types: Arc::clone(&self.types),
            projection: config.column_indices().map(<[usize]>::to_vec),
        })
    }

    fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(bytes = self.stored_bytes(), "closing arrow table store");
        }
        Ok(())
    }
}

impl TableStore for ArrowTableStore {
    type Writer = ArrowBatchWriter;

    fn create_factory(&self) -> Result<RowBatchFactory> {
        RowBatchFactory::new(Arc::clone(&self.types), self.cfg.chunk_size())
    }

    fn create_writer(&self) -> Result<ArrowBatchWriter> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::Closed);
        }
        if self.writer_created.swap(true, Ordering::SeqCst) {
            return Err(Error::invalid_argument(
                "store already handed out its writer",
            ));
        }
        Ok(ArrowBatchWriter {
            blobs: Arc::clone(&self.blobs),
            schema: Arc::clone(&self.schema),
            num_columns: self.types.len(),
            chunk_size: self.cfg.chunk_size(),
            closed: false,
        })
    }
}

/// Writer serializing each batch before appending it to the blob list.
pub struct ArrowBatchWriter {
    blobs: Arc<RwLock<Vec<Vec<u8>>>>,
    schema: SchemaRef,
    num_columns: usize,
    chunk_size: usize,
    closed: bool,
}

impl RowBatchWriter for ArrowBatchWriter {
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
        let record = batch_to_record(&batch, &self.schema)?;
        let mut writer = StreamWriter::try_new(Vec::new(), self.schema.as_ref())?;
        writer.write(&record)?;
        writer.finish()?;
        let blob = writer.into_inner()?;
        debug!(rows = batch.num_values(), bytes = blob.len(), "serialized batch");
        self.blobs
            .write()
            .expect("blob list lock poisoned")
            .push(blob);
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

/// Reader materializing batches from their IPC blobs on every read.
pub struct ArrowBatchReader {
    blobs: Arc<RwLock<Vec<Vec<u8>>>>,
    num_batches: usize,
    types: Arc<[ColumnType]>,
    projection: Option<Vec<usize>>,
}

impl RowBatchReader for ArrowBatchReader {
    fn read(&self, batch_index: usize) -> Result<BatchHandle> {
        if batch_index >= self.num_batches {
            return Err(Error::NotFound);
        }
        let blobs = self.blobs.read().expect("blob list lock poisoned");
        let blob = &blobs[batch_index];
        let mut reader = StreamReader::try_new(blob.as_slice(), None)?;
        let record = reader
            .next()
            .ok_or_else(|| Error::Internal("serialized batch stream is empty".into()))??;
        let batch = record_to_batch(&record, &self.types, self.projection.as_deref())?;
        Ok(BatchHandle::new(Arc::new(batch)))
    }

    fn num_batches(&self) -> usize {
        self.num_batches
    }

    fn projection(&self) -> Option<&[usize]> {
        self.projection.as_deref()
    }
}
