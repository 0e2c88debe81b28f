//! Conversion between column chunks and Arrow arrays.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray, StructArray};
use arrow::buffer::NullBuffer;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use coltab_chunk::{ColumnChunk, ColumnType, F64Chunk, RowBatch, StructChunk, Utf8Chunk};
use coltab_result::{Error, Result};

/// Arrow schema for a column-type array. Fields are named by position;
/// reads match columns positionally, so names only matter for debugging.
pub fn schema_for(types: &[ColumnType]) -> SchemaRef {
    let fields: Vec<Field> = types
        .iter()
        .enumerate()
        .map(|(i, ty)| field_for(&format!("c{i}"), ty))
        .collect();
    Arc::new(Schema::new(fields))
}

fn field_for(name: &str, column_type: &ColumnType) -> Field {
    match column_type {
        ColumnType::F64 => Field::new(name, DataType::Float64, true),
        ColumnType::Utf8 => Field::new(name, DataType::Utf8, true),
        ColumnType::Struct(children) => {
            let child_fields: Vec<Field> = children
                .iter()
                .enumerate()
                .map(|(j, child)| field_for(&format!("c{j}"), child))
                .collect();
            Field::new(name, DataType::Struct(child_fields.into()), true)
        }
    }
}

/// Convert one sealed chunk into an Arrow array of `num_values` rows.
pub fn chunk_to_array(chunk: &ColumnChunk) -> Result<ArrayRef> {
    let n = chunk.num_values();
    match chunk {
        ColumnChunk::F64(c) => {
            let array = Float64Array::from_iter((0..n).map(|i| {
                if c.is_missing(i) {
                    None
                } else {
                    Some(c.value(i))
                }
            }));
            Ok(Arc::new(array))
        }
        ColumnChunk::Utf8(c) => {
            let array = StringArray::from_iter((0..n).map(|i| {
                if c.is_missing(i) {
                    None
                } else {
                    Some(c.value(i))
                }
            }));
            Ok(Arc::new(array))
        }
        ColumnChunk::Struct(c) => {
            let mut arrays = Vec::with_capacity(c.num_children());
            let mut fields = Vec::with_capacity(c.num_children());
            for j in 0..c.num_children() {
                let child = c.child(j);
                fields.push(field_for(&format!("c{j}"), &child.column_type()));
                arrays.push(chunk_to_array(child)?);
            }
            let nulls: NullBuffer = (0..n).map(|i| !c.is_missing(i)).collect();
            let array = StructArray::try_new(fields.into(), arrays, Some(nulls))?;
            Ok(Arc::new(array))
        }
    }
}

/// Rebuild a sealed chunk from an Arrow array.
pub fn array_to_chunk(array: &dyn Array, column_type: &ColumnType) -> Result<ColumnChunk> {
    let n = array.len();
    let mut chunk = match column_type {
        ColumnType::F64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| Error::Internal("f64 column downcast failed".into()))?;
            let mut c = F64Chunk::new();
            c.allocate(n);
            for i in 0..n {
                if arr.is_null(i) {
                    c.set_missing(i);
                } else {
                    c.set(i, arr.value(i));
                }
            }
            ColumnChunk::F64(c)
        }
        ColumnType::Utf8 => {
            let arr = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| Error::Internal("utf8 column downcast failed".into()))?;
            let mut c = Utf8Chunk::new();
            c.allocate(n);
            for i in 0..n {
                if arr.is_null(i) {
                    c.set_missing(i);
                } else {
                    c.set(i, arr.value(i));
                }
            }
            ColumnChunk::Utf8(c)
        }
        ColumnType::Struct(children) => {
            let arr = array
                .as_any()
                .downcast_ref::<StructArray>()
                .ok_or_else(|| Error::Internal("struct column downcast failed".into()))?;
            if arr.num_columns() != children.len() {
                return Err(Error::Internal(format!(
                    "struct column has {} children, schema expects {}",
                    arr.num_columns(),
                    children.len()
                )));
            }
            let child_chunks = children
                .iter()
                .enumerate()
                .map(|(j, child_type)| array_to_chunk(arr.column(j).as_ref(), child_type))
                .collect::<Result<Vec<_>>>()?;
            let mut c = StructChunk::new(child_chunks);
            c.allocate_validity(n);
            for i in 0..n {
                if !arr.is_null(i) {
                    c.set_valid(i);
                }
            }
            ColumnChunk::Struct(c)
        }
    };
    chunk.seal(n);
    Ok(chunk)
}

/// Convert a sealed batch into an Arrow record batch under `schema`.
pub fn batch_to_record(batch: &RowBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    let columns = batch
        .columns()
        .iter()
        .map(chunk_to_array)
        .collect::<Result<Vec<_>>>()?;
    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_values()));
    Ok(RecordBatch::try_new_with_options(
        Arc::clone(schema),
        columns,
        &options,
    )?)
}

/// Rebuild a sealed batch from an Arrow record batch.
///
/// Columns outside `projection` become unallocated placeholder chunks that
/// report every row missing.
pub fn record_to_batch(
    record: &RecordBatch,
    types: &[ColumnType],
    projection: Option<&[usize]>,
) -> Result<RowBatch> {
    if record.num_columns() != types.len() {
        return Err(Error::Internal(format!(
            "serialized batch has {} columns, schema expects {}",
            record.num_columns(),
            types.len()
        )));
    }
    let n = record.num_rows();
    let mut chunks = Vec::with_capacity(types.len());
    for (i, column_type) in types.iter().enumerate() {
        let selected = projection.is_none_or(|p| p.contains(&i));
        let chunk = if selected {
            array_to_chunk(record.column(i).as_ref(), column_type)?
        } else {
            ColumnChunk::for_type(column_type)
        };
        chunks.push(chunk);
    }
    let mut batch = RowBatch::new(chunks, n);
    batch.seal(n)?;
    Ok(batch)
}
