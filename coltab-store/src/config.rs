//! Run-time configuration (no hidden constants).

use coltab_result::{Error, Result};

/// Default rows-per-batch for stores created without an explicit size.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Store-wide settings fixed at construction.
#[derive(Debug, Clone)]
pub struct TableStoreConfig {
    chunk_size: usize,
}

impl TableStoreConfig {
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::invalid_argument("chunk size must be positive"));
        }
        Ok(Self { chunk_size })
    }

    /// Capacity, in rows, of every batch produced for this store.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for TableStoreConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Projection passed to [`crate::TableReadStore::create_reader`].
///
/// `None` column indices mean "materialize all columns".
#[derive(Debug, Clone, Default)]
pub struct RowBatchReaderConfig {
    column_indices: Option<Vec<usize>>,
}

impl RowBatchReaderConfig {
    /// Materialize every column.
    pub fn all() -> Self {
        Self::default()
    }

    /// Materialize only the given column indices.
    pub fn with_columns(column_indices: Vec<usize>) -> Self {
        Self {
            column_indices: Some(column_indices),
        }
    }

    pub fn column_indices(&self) -> Option<&[usize]> {
        self.column_indices.as_deref()
    }

    /// Check every selected index against the schema width.
    pub fn validate(&self, num_columns: usize) -> Result<()> {
        if let Some(indices) = &self.column_indices {
            for &index in indices {
                if index >= num_columns {
                    return Err(Error::invalid_argument(format!(
                        "projected column {index} outside schema of {num_columns} columns"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_chunk_size_is_a_configuration_error() {
        assert!(TableStoreConfig::new(0).is_err());
        assert_eq!(TableStoreConfig::new(8).unwrap().chunk_size(), 8);
        assert_eq!(TableStoreConfig::default().chunk_size(), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn projection_validation() {
        assert!(RowBatchReaderConfig::all().validate(2).is_ok());
        assert!(RowBatchReaderConfig::with_columns(vec![0, 1]).validate(2).is_ok());
        assert!(RowBatchReaderConfig::with_columns(vec![2]).validate(2).is_err());
    }
}
