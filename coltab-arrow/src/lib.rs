//! Arrow-backed table store.
//!
//! Persists each sealed batch as a self-contained Arrow IPC stream blob.
//! Readers materialize chunks back from the blobs, honoring the reader
//! projection: only selected columns are rebuilt, the rest stay as
//! unallocated placeholders that report every row missing.

#![forbid(unsafe_code)]

pub mod convert;
pub mod store;

pub use coltab_result::{Error, Result};
pub use convert::{array_to_chunk, batch_to_record, chunk_to_array, record_to_batch, schema_for};
pub use store::ArrowTableStore;
