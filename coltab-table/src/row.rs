//! Legacy row/cell object model over typed cursors.
//!
//! Column 0 of the store schema is the row-key column (`utf8`) by adapter
//! convention; the remaining columns map to cells by index. Per-column
//! type dispatch is resolved once at adapter construction into a fixed
//! [`CellKind`] table, so per-row work is a closed `match` with no
//! re-resolution.

use coltab_chunk::ColumnType;
use coltab_result::{Error, Result};
use coltab_store::{RowBatchReader, RowBatchWriter};

use crate::read_cursor::RowReadCursor;
use crate::write_cursor::RowWriteCursor;

/// A cell of a legacy row. [`DataCell::Missing`] is the canonical missing
/// cell: adapters substitute it whenever the underlying value reports
/// missing, never a type-specific cell built from undefined data.
#[derive(Debug, Clone, PartialEq)]
pub enum DataCell {
    F64(f64),
    Utf8(String),
    Missing,
}

impl DataCell {
    pub fn is_missing(&self) -> bool {
        matches!(self, DataCell::Missing)
    }
}

/// Row identifier plus ordered cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    key: String,
    cells: Vec<DataCell>,
}

impl DataRow {
    pub fn new(key: impl Into<String>, cells: Vec<DataCell>) -> Self {
        Self {
            key: key.into(),
            cells,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cells(&self) -> &[DataCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> &DataCell {
        &self.cells[index]
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }
}

#[derive(Debug, Clone, Copy)]
enum CellKind {
    F64,
    Utf8,
}

/// Resolve the per-column cell dispatch for a schema: column 0 must be the
/// `utf8` row key; struct columns have no legacy cell representation.
fn cell_kinds(types: &[ColumnType]) -> Result<Vec<CellKind>> {
    let Some((key_type, data_types)) = types.split_first() else {
        return Err(Error::invalid_argument(
            "row adapters need a row-key column",
        ));
    };
    if !matches!(key_type, ColumnType::Utf8) {
        return Err(Error::type_mismatch("utf8", key_type.name()));
    }
    data_types
        .iter()
        .map(|ty| match ty {
            ColumnType::F64 => Ok(CellKind::F64),
            ColumnType::Utf8 => Ok(CellKind::Utf8),
            ColumnType::Struct(_) => Err(Error::type_mismatch("f64 or utf8", "struct")),
        })
        .collect()
}

/// Iterator producing legacy rows from a read cursor.
pub struct RowReader<R: RowBatchReader> {
    cursor: RowReadCursor<R>,
    kinds: Vec<CellKind>,
}

impl<R: RowBatchReader> RowReader<R> {
    pub fn new(cursor: RowReadCursor<R>, types: &[ColumnType]) -> Result<Self> {
        Ok(Self {
            kinds: cell_kinds(types)?,
            cursor,
        })
    }

    fn read_row(&mut self) -> Result<DataRow> {
        self.cursor.fwd()?;
        let key_access = self.cursor.access(0)?;
        if key_access.is_missing() {
            return Err(Error::Internal("row key is missing".into()));
        }
        let key = key_access.utf8()?.to_string();
        let mut cells = Vec::with_capacity(self.kinds.len());
        for (offset, kind) in self.kinds.iter().enumerate() {
            let access = self.cursor.access(offset + 1)?;
            let cell = if access.is_missing() {
                DataCell::Missing
            } else {
                match kind {
                    CellKind::F64 => DataCell::F64(access.f64()?),
                    CellKind::Utf8 => DataCell::Utf8(access.utf8()?.to_string()),
                }
            };
            cells.push(cell);
        }
        Ok(DataRow::new(key, cells))
    }

    pub fn close(&mut self) -> Result<()> {
        self.cursor.close()
    }
}

impl<R: RowBatchReader> Iterator for RowReader<R> {
    type Item = Result<DataRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.can_fwd() {
            return None;
        }
        Some(self.read_row())
    }
}

/// Consumer pushing legacy rows through a write cursor.
pub struct RowWriter<W: RowBatchWriter> {
    cursor: RowWriteCursor<W>,
    kinds: Vec<CellKind>,
}

impl<W: RowBatchWriter> RowWriter<W> {
    pub fn new(cursor: RowWriteCursor<W>, types: &[ColumnType]) -> Result<Self> {
        Ok(Self {
            kinds: cell_kinds(types)?,
            cursor,
        })
    }

    /// Write the key and every cell of `row`, advancing the cursor first.
    pub fn push(&mut self, row: &DataRow) -> Result<()> {
        if row.num_cells() != self.kinds.len() {
            return Err(Error::invalid_argument(format!(
                "row has {} cells, table expects {}",
                row.num_cells(),
                self.kinds.len()
            )));
        }
        self.cursor.fwd()?;
        self.cursor.access_mut(0)?.set_utf8(row.key())?;
        for (offset, (kind, cell)) in self.kinds.iter().zip(row.cells()).enumerate() {
            let mut access = self.cursor.access_mut(offset + 1)?;
            match (kind, cell) {
                (_, DataCell::Missing) => access.set_missing()?,
                (CellKind::F64, DataCell::F64(value)) => access.set_f64(*value)?,
                (CellKind::Utf8, DataCell::Utf8(value)) => access.set_utf8(value)?,
                (CellKind::F64, DataCell::Utf8(_)) => {
                    return Err(Error::type_mismatch("f64", "utf8"))
                }
                (CellKind::Utf8, DataCell::F64(_)) => {
                    return Err(Error::type_mismatch("utf8", "f64"))
                }
            }
        }
        Ok(())
    }

    /// Flush the trailing batch and close the underlying writer.
    pub fn close(&mut self) -> Result<()> {
        self.cursor.close()
    }
}
