//! Columnar data model: column types, chunk buffers, row batches and
//! per-column domain statistics.
//!
//! A table is a sequence of fixed-capacity [`RowBatch`]es. Each batch owns
//! one [`ColumnChunk`] per top-level column; struct columns nest child
//! chunks recursively. Chunks pair a typed value buffer with a validity
//! bitmap (unset bit = missing value). A batch is filled in row order,
//! sealed to its valid-row count, and from then on immutable.
//!
//! Dispatch from a [`ColumnType`] to its chunk or domain-calculator
//! implementation is an exhaustive `match` over a closed set of variants,
//! so adding a column type fails to compile until every dispatch site
//! handles it.

#![forbid(unsafe_code)]

pub mod access;
pub mod batch;
pub mod chunk;
pub mod domain;
pub mod types;
mod validity;

pub use access::{ChunkReadAccess, ChunkWriteAccess};
pub use batch::{RowBatch, RowBatchFactory};
pub use chunk::{ColumnChunk, F64Chunk, StructChunk, Utf8Chunk};
pub use coltab_result::{Error, Result};
pub use domain::{
    Domain, DomainCalculator, F64Domain, F64DomainCalculator, Utf8Domain, Utf8DomainCalculator,
};
pub use types::ColumnType;
