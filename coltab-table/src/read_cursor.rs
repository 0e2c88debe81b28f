//! Forward-only row cursor over a batch sequence.

use coltab_chunk::ChunkReadAccess;
use coltab_result::{Error, Result};
use coltab_store::{BatchHandle, RowBatchReader};
use tracing::trace;

/// Cursor position within the batch sequence.
///
/// `BeforeFirst` covers the unbound state and the bound-before-row-0
/// state: batches are pulled lazily, so the first `fwd` both binds batch 0
/// and lands on its first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    At(usize),
    Exhausted,
}

/// Row-oriented read cursor.
///
/// Crossing a batch boundary drops the finished [`BatchHandle`] (the one
/// read-side release of that batch), pulls the next batch from the reader
/// and resets the in-batch row index. A reader error latches the cursor
/// into `Exhausted`, so a failed cursor cannot be reused.
pub struct RowReadCursor<R: RowBatchReader> {
    reader: R,
    num_batches: usize,
    next_batch: usize,
    current: Option<BatchHandle>,
    max_row: usize,
    position: Position,
}

impl<R: RowBatchReader> RowReadCursor<R> {
    pub fn new(reader: R) -> Self {
        let num_batches = reader.num_batches();
        Self {
            reader,
            num_batches,
            next_batch: 0,
            current: None,
            max_row: 0,
            position: Position::BeforeFirst,
        }
    }

    /// Whether another row exists in the current batch or any batch after
    /// it.
    pub fn can_fwd(&self) -> bool {
        match self.position {
            Position::BeforeFirst => self.next_batch < self.num_batches,
            Position::At(row) => row < self.max_row || self.next_batch < self.num_batches,
            Position::Exhausted => false,
        }
    }

    /// Advance to the next row, switching batches when the current one is
    /// exhausted. Advancing past the last row is a contract violation.
    pub fn fwd(&mut self) -> Result<()> {
        match self.position {
            Position::Exhausted => Err(Error::CursorExhausted),
            Position::BeforeFirst => self.switch_to_next_batch(),
            Position::At(row) if row < self.max_row => {
                self.position = Position::At(row + 1);
                Ok(())
            }
            Position::At(_) => {
                if self.next_batch < self.num_batches {
                    self.switch_to_next_batch()
                } else {
                    self.current = None;
                    self.position = Position::Exhausted;
                    Err(Error::CursorExhausted)
                }
            }
        }
    }

    fn switch_to_next_batch(&mut self) -> Result<()> {
        // dropping the handle is the one read-side release of the batch
        self.current = None;
        if self.next_batch >= self.num_batches {
            self.position = Position::Exhausted;
            return Err(Error::CursorExhausted);
        }
        let handle = match self.reader.read(self.next_batch) {
            Ok(handle) => handle,
            Err(err) => {
                self.position = Position::Exhausted;
                return Err(err);
            }
        };
        if handle.num_values() == 0 {
            self.position = Position::Exhausted;
            return Err(Error::Internal(format!(
                "batch {} has no rows",
                self.next_batch
            )));
        }
        trace!(
            batch = self.next_batch,
            rows = handle.num_values(),
            "read cursor switched batch"
        );
        self.max_row = handle.num_values() - 1;
        self.current = Some(handle);
        self.next_batch += 1;
        self.position = Position::At(0);
        Ok(())
    }

    /// Access bound to `column` at the current row.
    ///
    /// The borrow ends before the next `fwd`, so an access can never
    /// observe a stale batch. Columns excluded by the reader projection
    /// are refused.
    pub fn access(&self, column: usize) -> Result<ChunkReadAccess<'_>> {
        let row = match self.position {
            Position::At(row) => row,
            Position::Exhausted => return Err(Error::CursorExhausted),
            Position::BeforeFirst => {
                return Err(Error::invalid_argument("cursor is not positioned on a row"))
            }
        };
        if let Some(projection) = self.reader.projection() {
            if !projection.contains(&column) {
                return Err(Error::invalid_argument(format!(
                    "column {column} is not materialized by this reader"
                )));
            }
        }
        let Some(handle) = &self.current else {
            return Err(Error::Internal("cursor holds no batch".into()));
        };
        Ok(ChunkReadAccess::new(handle.batch().column(column), row))
    }

    /// Release the currently held batch and retire the cursor.
    pub fn close(&mut self) -> Result<()> {
        self.current = None;
        self.position = Position::Exhausted;
        Ok(())
    }
}
