//! Domain-preprocessing store decorator.
//!
//! Wraps a delegate store and observes every written batch exactly once:
//! for each tracked column, the calculator registered for that column's
//! type maps the batch's chunk to a partial [`Domain`], which is merged
//! into a table-scoped accumulator. The batch is then forwarded unchanged.
//!
//! Calculators are resolved once at construction. The accumulator is
//! shared between the store and its writer behind a mutex, so merges stay
//! serialized even when the writer runs on another thread.

use std::sync::{Arc, Mutex};

use coltab_chunk::{ColumnType, Domain, DomainCalculator, RowBatch, RowBatchFactory};
use coltab_result::{Error, Result};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::config::RowBatchReaderConfig;
use crate::traits::{RowBatchWriter, TableReadStore, TableStore};

/// Default cap on tracked distinct text values per column.
pub const DEFAULT_DISTINCT_THRESHOLD: usize = 120;

/// Which columns to track and how many distinct text values to keep.
#[derive(Debug, Clone)]
pub struct DomainConfig {
    enabled_columns: Option<Vec<usize>>,
    distinct_threshold: usize,
}

impl DomainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track only the given column indices (default: every column whose
    /// type has a calculator).
    pub fn with_columns(mut self, column_indices: Vec<usize>) -> Self {
        self.enabled_columns = Some(column_indices);
        self
    }

    pub fn with_distinct_threshold(mut self, threshold: usize) -> Self {
        self.distinct_threshold = threshold;
        self
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            enabled_columns: None,
            distinct_threshold: DEFAULT_DISTINCT_THRESHOLD,
        }
    }
}

type DomainMap = FxHashMap<usize, Domain>;

/// Store decorator computing per-column domains while data streams through.
#[derive(Debug)]
pub struct DomainTableStore<S> {
    inner: S,
    calculators: Arc<[(usize, DomainCalculator)]>,
    domains: Arc<Mutex<DomainMap>>,
}

impl<S: TableStore> DomainTableStore<S> {
    pub fn new(inner: S, config: DomainConfig) -> Result<Self> {
        let types = inner.column_types();
        let enabled: Vec<usize> = match &config.enabled_columns {
            Some(columns) => {
                for &index in columns {
                    if index >= types.len() {
                        return Err(Error::invalid_argument(format!(
                            "domain-tracked column {index} outside schema of {} columns",
                            types.len()
                        )));
                    }
                }
                columns.clone()
            }
            None => (0..types.len()).collect(),
        };
        let calculators: Vec<(usize, DomainCalculator)> = enabled
            .into_iter()
            .filter_map(|index| {
                DomainCalculator::for_type(&types[index], config.distinct_threshold)
                    .map(|calc| (index, calc))
            })
            .collect();
        Ok(Self {
            inner,
            calculators: calculators.into(),
            domains: Arc::new(Mutex::new(FxHashMap::default())),
        })
    }

    /// Read-only snapshot of the accumulated domains, keyed by column index.
    pub fn domains(&self) -> FxHashMap<usize, Domain> {
        self.domains
            .lock()
            .expect("domain accumulator lock poisoned")
            .clone()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: TableStore> TableReadStore for DomainTableStore<S> {
    type Reader = S::Reader;

    fn column_types(&self) -> &[ColumnType] {
        self.inner.column_types()
    }

    fn create_reader(&self, config: RowBatchReaderConfig) -> Result<Self::Reader> {
        self.inner.create_reader(config)
    }

    fn close(&self) -> Result<()> {
        self.inner.close()
    }
}

impl<S: TableStore> TableStore for DomainTableStore<S> {
    type Writer = DomainBatchWriter<S::Writer>;

    fn create_factory(&self) -> Result<RowBatchFactory> {
        self.inner.create_factory()
    }

    fn create_writer(&self) -> Result<Self::Writer> {
        Ok(DomainBatchWriter {
            inner: self.inner.create_writer()?,
            calculators: Arc::clone(&self.calculators),
            domains: Arc::clone(&self.domains),
        })
    }
}

/// Writer running the domain calculators before forwarding each batch.
pub struct DomainBatchWriter<W> {
    inner: W,
    calculators: Arc<[(usize, DomainCalculator)]>,
    domains: Arc<Mutex<DomainMap>>,
}

impl<W: RowBatchWriter> RowBatchWriter for DomainBatchWriter<W> {
    fn write(&mut self, batch: RowBatch) -> Result<()> {
        for (column, calc) in self.calculators.iter() {
            let partial = calc.apply(batch.column(*column))?;
            let mut map = self.domains.lock().expect("domain accumulator lock poisoned");
            let merged = match map.get(column) {
                Some(stored) => calc.merge(stored, &partial)?,
                None => partial,
            };
            trace!(column = *column, "merged domain contribution");
            map.insert(*column, merged);
        }
        self.inner.write(batch)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}
