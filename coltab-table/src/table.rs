//! Table-level entry points wiring cursors to stores.

use coltab_result::Result;
use coltab_store::{RowBatchReaderConfig, RowBatchWriter, TableReadStore, TableStore};

use crate::read_cursor::RowReadCursor;
use crate::write_cursor::RowWriteCursor;

/// Writable view over a store: one write cursor per write session.
pub struct WriteTable<W: RowBatchWriter> {
    num_columns: usize,
    cursor: RowWriteCursor<W>,
}

/// Open the write session of `store`.
pub fn write_table<S: TableStore>(store: &S) -> Result<WriteTable<S::Writer>> {
    let factory = store.create_factory()?;
    let writer = store.create_writer()?;
    Ok(WriteTable {
        num_columns: factory.column_types().len(),
        cursor: RowWriteCursor::new(factory, writer),
    })
}

impl<W: RowBatchWriter> WriteTable<W> {
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn cursor_mut(&mut self) -> &mut RowWriteCursor<W> {
        &mut self.cursor
    }

    /// Flush the trailing batch and close the writer; both steps are
    /// attempted, the first failure wins.
    pub fn close(mut self) -> Result<()> {
        self.cursor.close()
    }
}

/// Readable view over a store; cursors are created per traversal.
pub struct ReadTable<'a, S: TableReadStore> {
    store: &'a S,
}

pub fn read_table<S: TableReadStore>(store: &S) -> ReadTable<'_, S> {
    ReadTable { store }
}

impl<S: TableReadStore> ReadTable<'_, S> {
    pub fn num_columns(&self) -> usize {
        self.store.column_types().len()
    }

    /// Cursor over every column.
    pub fn new_cursor(&self) -> Result<RowReadCursor<S::Reader>> {
        self.new_cursor_with(RowBatchReaderConfig::all())
    }

    /// Cursor over the columns selected by `config`.
    pub fn new_cursor_with(
        &self,
        config: RowBatchReaderConfig,
    ) -> Result<RowReadCursor<S::Reader>> {
        Ok(RowReadCursor::new(self.store.create_reader(config)?))
    }
}
