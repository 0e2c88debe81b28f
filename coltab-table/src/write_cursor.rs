//! Forward-only row cursor filling and flushing batches.

use coltab_chunk::{ChunkWriteAccess, RowBatch, RowBatchFactory};
use coltab_result::{Error, Result};
use coltab_store::{close_first_error, RowBatchWriter};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    At(usize),
    Closed,
}

/// Row-oriented write cursor.
///
/// `fwd` advances onto a fresh row; callers then write every column's
/// value (or missing marker) through [`RowWriteCursor::access_mut`].
/// Pushing past a batch's capacity seals and flushes it and allocates the
/// next batch transparently.
///
/// Batches already handed to the store are not rolled back when a later
/// operation fails: flushing is at-least-delivered, and a failed flush
/// retires the cursor.
pub struct RowWriteCursor<W: RowBatchWriter> {
    factory: RowBatchFactory,
    writer: W,
    current: Option<RowBatch>,
    position: Position,
    closed: bool,
}

impl<W: RowBatchWriter> RowWriteCursor<W> {
    pub fn new(factory: RowBatchFactory, writer: W) -> Self {
        Self {
            factory,
            writer,
            current: None,
            position: Position::BeforeFirst,
            closed: false,
        }
    }

    pub fn num_columns(&self) -> usize {
        self.factory.column_types().len()
    }

    /// Advance onto the next row, allocating or switching batches as
    /// needed.
    pub fn fwd(&mut self) -> Result<()> {
        match self.position {
            Position::Closed => Err(Error::Closed),
            Position::BeforeFirst => {
                self.current = Some(self.factory.create());
                self.position = Position::At(0);
                Ok(())
            }
            Position::At(row) => {
                if row + 1 < self.factory.chunk_size() {
                    self.position = Position::At(row + 1);
                    Ok(())
                } else {
                    self.flush_current(self.factory.chunk_size())?;
                    self.current = Some(self.factory.create());
                    self.position = Position::At(0);
                    Ok(())
                }
            }
        }
    }

    /// Seal the current batch to `rows` and hand it to the writer. A
    /// failure retires the cursor; rows already flushed stay written.
    fn flush_current(&mut self, rows: usize) -> Result<()> {
        let Some(mut batch) = self.current.take() else {
            return Ok(());
        };
        if let Err(err) = batch.seal(rows) {
            self.position = Position::Closed;
            return Err(err);
        }
        trace!(rows, "write cursor flushing batch");
        if let Err(err) = self.writer.write(batch) {
            self.position = Position::Closed;
            return Err(err);
        }
        Ok(())
    }

    /// Write access bound to `column` at the current row.
    pub fn access_mut(&mut self, column: usize) -> Result<ChunkWriteAccess<'_>> {
        let row = match self.position {
            Position::At(row) => row,
            Position::Closed => return Err(Error::Closed),
            Position::BeforeFirst => {
                return Err(Error::invalid_argument("cursor is not positioned on a row"))
            }
        };
        let Some(batch) = self.current.as_mut() else {
            return Err(Error::Internal("cursor holds no batch".into()));
        };
        Ok(ChunkWriteAccess::new(batch.column_mut(column), row))
    }

    /// Seal and flush the trailing partial batch, then close the writer.
    ///
    /// Both steps are attempted even if the first fails; the first failure
    /// is surfaced. Closing an already-closed cursor is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let flush = match self.position {
            Position::At(row) => self.flush_current(row + 1),
            _ => {
                self.current = None;
                Ok(())
            }
        };
        self.position = Position::Closed;
        close_first_error([flush, self.writer.close()])
    }
}
