//! A wrapper around any store that instruments its operations.
//!
//! Used by tests to verify the one-release-per-batch guarantee: read
//! handles are tagged with a [`ReleaseProbe`], so the number of released
//! handles is observable without cooperation from the inner store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use coltab_chunk::{ColumnType, RowBatch, RowBatchFactory};
use coltab_result::Result;

use crate::config::RowBatchReaderConfig;
use crate::traits::{
    BatchHandle, ReleaseProbe, RowBatchReader, RowBatchWriter, TableReadStore, TableStore,
};

/// Thread-safe store operation counters.
#[derive(Debug, Default)]
pub struct StoreStats {
    batches_written: AtomicU64,
    rows_written: AtomicU64,
    batches_read: AtomicU64,
    writer_closes: AtomicU64,
    store_closes: AtomicU64,
    release_probe: Arc<ReleaseProbe>,
}

impl StoreStats {
    /// Capture a point-in-time snapshot of the accumulated counters.
    pub fn snapshot(&self) -> StoreStatsSnapshot {
        StoreStatsSnapshot {
            batches_written: self.batches_written.load(Ordering::Relaxed),
            rows_written: self.rows_written.load(Ordering::Relaxed),
            batches_read: self.batches_read.load(Ordering::Relaxed),
            handles_released: self.release_probe.released(),
            writer_closes: self.writer_closes.load(Ordering::Relaxed),
            store_closes: self.store_closes.load(Ordering::Relaxed),
        }
    }
}

/// Immutable copy of [`StoreStats`] counters captured at a specific moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStatsSnapshot {
    pub batches_written: u64,
    pub rows_written: u64,
    pub batches_read: u64,
    pub handles_released: u64,
    pub writer_closes: u64,
    pub store_closes: u64,
}

/// Store wrapper counting writes, reads, handle releases and closes.
pub struct InstrumentedTableStore<S> {
    inner: S,
    stats: Arc<StoreStats>,
}

impl<S> InstrumentedTableStore<S> {
    /// Wrap a store and return the instrumented version along with a handle
    /// to its statistics.
    pub fn new(inner: S) -> (Self, Arc<StoreStats>) {
        let stats = Arc::new(StoreStats::default());
        (
            Self {
                inner,
                stats: Arc::clone(&stats),
            },
            stats,
        )
    }
}

impl<S: TableReadStore> TableReadStore for InstrumentedTableStore<S> {
    type Reader = InstrumentedBatchReader<S::Reader>;

    fn column_types(&self) -> &[ColumnType] {
        self.inner.column_types()
    }

    fn create_reader(&self, config: RowBatchReaderConfig) -> Result<Self::Reader> {
        Ok(InstrumentedBatchReader {
            inner: self.inner.create_reader(config)?,
            stats: Arc::clone(&self.stats),
        })
    }

    fn close(&self) -> Result<()> {
        self.stats.store_closes.fetch_add(1, Ordering::Relaxed);
        self.inner.close()
    }
}

impl<S: TableStore> TableStore for InstrumentedTableStore<S> {
    type Writer = InstrumentedBatchWriter<S::Writer>;

    fn create_factory(&self) -> Result<RowBatchFactory> {
        self.inner.create_factory()
    }

    fn create_writer(&self) -> Result<Self::Writer> {
        Ok(InstrumentedBatchWriter {
            inner: self.inner.create_writer()?,
            stats: Arc::clone(&self.stats),
        })
    }
}

pub struct InstrumentedBatchWriter<W> {
    inner: W,
    stats: Arc<StoreStats>,
}

impl<W: RowBatchWriter> RowBatchWriter for InstrumentedBatchWriter<W> {
    fn write(&mut self, batch: RowBatch) -> Result<()> {
        self.stats.batches_written.fetch_add(1, Ordering::Relaxed);
        self.stats
            .rows_written
            .fetch_add(batch.num_values() as u64, Ordering::Relaxed);
        self.inner.write(batch)
    }

    fn close(&mut self) -> Result<()> {
        self.stats.writer_closes.fetch_add(1, Ordering::Relaxed);
        self.inner.close()
    }
}

pub struct InstrumentedBatchReader<R> {
    inner: R,
    stats: Arc<StoreStats>,
}

impl<R: RowBatchReader> RowBatchReader for InstrumentedBatchReader<R> {
    fn read(&self, batch_index: usize) -> Result<BatchHandle> {
        self.stats.batches_read.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .inner
            .read(batch_index)?
            .with_probe(Arc::clone(&self.stats.release_probe)))
    }

    fn num_batches(&self) -> usize {
        self.inner.num_batches()
    }

    fn projection(&self) -> Option<&[usize]> {
        self.inner.projection()
    }
}
