//! Store contracts shared by every backend.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use coltab_chunk::{ColumnType, RowBatch, RowBatchFactory};
use coltab_result::Result;

use crate::config::RowBatchReaderConfig;

/// Counter bumped each time an observed [`BatchHandle`] is dropped.
///
/// Attached by instrumenting wrappers; a handle notifies its probe at most
/// once, so the counter equals the number of released handles.
#[derive(Debug, Default)]
pub struct ReleaseProbe {
    released: AtomicU64,
}

impl ReleaseProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }
}

/// Shared reference to a sealed batch handed out by a reader.
///
/// Dropping the handle is the read-side release of the batch; ownership
/// guarantees it happens exactly once per handle.
pub struct BatchHandle {
    batch: Arc<RowBatch>,
    probe: Option<Arc<ReleaseProbe>>,
}

impl BatchHandle {
    pub fn new(batch: Arc<RowBatch>) -> Self {
        Self { batch, probe: None }
    }

    /// Attach a release probe notified when this handle is dropped.
    pub fn with_probe(mut self, probe: Arc<ReleaseProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn batch(&self) -> &RowBatch {
        &self.batch
    }
}

impl Deref for BatchHandle {
    type Target = RowBatch;

    fn deref(&self) -> &RowBatch {
        &self.batch
    }
}

impl Drop for BatchHandle {
    fn drop(&mut self) {
        if let Some(probe) = self.probe.take() {
            probe.released.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Write side of a store.
///
/// `write` is called once per completed batch, in row order, never
/// concurrently: the receiver is exclusive (`&mut self`) and each store
/// hands out a single writer per session.
pub trait RowBatchWriter: Send {
    /// Append one sealed batch. The batch is consumed; the producer cannot
    /// mutate it after hand-off.
    fn write(&mut self, batch: RowBatch) -> Result<()>;

    /// Finish the write session. Closing twice is an error.
    fn close(&mut self) -> Result<()>;
}

/// Read side of a store, scoped to one projection.
pub trait RowBatchReader {
    /// Fetch the batch at `batch_index`, or [`coltab_result::Error::NotFound`]
    /// past the written sequence.
    fn read(&self, batch_index: usize) -> Result<BatchHandle>;

    /// Number of batches visible to this reader.
    fn num_batches(&self) -> usize;

    /// Columns this reader materializes; `None` means all.
    fn projection(&self) -> Option<&[usize]>;
}

/// Read-only store surface: schema plus reader creation.
pub trait TableReadStore: Send + Sync {
    type Reader: RowBatchReader;

    /// Column-type schema, fixed for the table's lifetime.
    fn column_types(&self) -> &[ColumnType];

    fn create_reader(&self, config: RowBatchReaderConfig) -> Result<Self::Reader>;

    /// Release store resources. Closing twice is a no-op.
    fn close(&self) -> Result<()>;
}

/// Full store surface: adds the batch factory and the writer.
pub trait TableStore: TableReadStore {
    type Writer: RowBatchWriter;

    /// Factory producing batches shaped for this store's schema and chunk
    /// size.
    fn create_factory(&self) -> Result<RowBatchFactory>;

    /// Hand out the write session's single writer. A second call is an
    /// error.
    fn create_writer(&self) -> Result<Self::Writer>;
}

/// Drive a set of already-evaluated close results, surfacing the first
/// failure while every close still ran.
pub fn close_first_error(results: impl IntoIterator<Item = Result<()>>) -> Result<()> {
    let mut first = None;
    for result in results {
        if let Err(err) = result {
            first.get_or_insert(err);
        }
    }
    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
