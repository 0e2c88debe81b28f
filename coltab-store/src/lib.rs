//! Table store contracts and the supplied store implementations.
//!
//! A [`TableStore`] owns a table's column-type schema and its sequence of
//! sealed row batches. Writers receive completed batches by value, once
//! each, in row order; readers hand sealed batches back out as shared
//! [`BatchHandle`]s whose drop is the read-side release event.
//!
//! [`DomainTableStore`] decorates any store with per-column domain
//! calculation: every written batch is observed exactly once, partial
//! domains are merged associatively into a mutex-guarded accumulator, and
//! the batch is forwarded unchanged to the delegate.

#![forbid(unsafe_code)]

pub mod config;
pub mod domain_store;
pub mod instrumented;
pub mod mem;
pub mod traits;

pub use coltab_result::{Error, Result};
pub use config::{RowBatchReaderConfig, TableStoreConfig, DEFAULT_CHUNK_SIZE};
pub use domain_store::{DomainConfig, DomainTableStore, DEFAULT_DISTINCT_THRESHOLD};
pub use instrumented::{InstrumentedTableStore, StoreStats, StoreStatsSnapshot};
pub use mem::MemTableStore;
pub use traits::{
    close_first_error, BatchHandle, ReleaseProbe, RowBatchReader, RowBatchWriter, TableReadStore,
    TableStore,
};
