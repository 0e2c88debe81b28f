//! Coltab: a columnar table store with row-oriented cursors.
//!
//! This crate is the primary entrypoint for the coltab workspace. It
//! re-exports the data model, store contracts and cursor layer from the
//! underlying `coltab-*` crates, providing a unified API surface.
//!
//! # Architecture
//!
//! Coltab is organized as a layered workspace:
//!
//! - **Data model** (`coltab-chunk`): column types, fixed-capacity chunk
//!   buffers with validity bitmaps, row batches and domain statistics.
//! - **Stores** (`coltab-store`, `coltab-arrow`): the table-store
//!   contracts, an in-memory store, an Arrow IPC backed store, the
//!   instrumenting wrapper and the domain-preprocessing decorator.
//! - **Cursors** (`coltab-table`): row-oriented read/write cursors over
//!   the batch sequence and the legacy row/cell adapters.
//!
//! # Quick Start
//!
//! Stream rows into a domain-tracking store and read them back:
//!
//! ```rust
//! use coltab::{
//!     read_table, write_table, ColumnType, DomainConfig, DomainTableStore, MemTableStore,
//!     TableStoreConfig,
//! };
//!
//! # fn main() -> coltab::Result<()> {
//! let store = DomainTableStore::new(
//!     MemTableStore::new(
//!         vec![ColumnType::Utf8, ColumnType::F64],
//!         TableStoreConfig::default(),
//!     )?,
//!     DomainConfig::new(),
//! )?;
//!
//! let mut table = write_table(&store)?;
//! let cursor = table.cursor_mut();
//! for (key, value) in [("r0", 5.0), ("r1", 1.0)] {
//!     cursor.fwd()?;
//!     cursor.access_mut(0)?.set_utf8(key)?;
//!     cursor.access_mut(1)?.set_f64(value)?;
//! }
//! table.close()?;
//!
//! let read = read_table(&store);
//! let mut cursor = read.new_cursor()?;
//! let mut rows = 0;
//! while cursor.can_fwd() {
//!     cursor.fwd()?;
//!     rows += 1;
//! }
//! assert_eq!(rows, 2);
//! assert_eq!(store.domains()[&1].as_f64()?.maximum(), Some(5.0));
//! # Ok(())
//! # }
//! ```

pub use coltab_result::{Error, Result};

pub use coltab_chunk::{
    ChunkReadAccess, ChunkWriteAccess, ColumnChunk, ColumnType, Domain, DomainCalculator,
    F64Chunk, F64Domain, RowBatch, RowBatchFactory, StructChunk, Utf8Chunk, Utf8Domain,
};

pub use coltab_store::{
    close_first_error, BatchHandle, DomainConfig, DomainTableStore, InstrumentedTableStore,
    MemTableStore, ReleaseProbe, RowBatchReader, RowBatchReaderConfig, RowBatchWriter,
    StoreStats, StoreStatsSnapshot, TableReadStore, TableStore, TableStoreConfig,
};

pub use coltab_arrow::ArrowTableStore;

pub use coltab_table::{
    read_table, write_table, DataCell, DataRow, ReadTable, RowReadCursor, RowReader,
    RowWriteCursor, RowWriter, WriteTable,
};
