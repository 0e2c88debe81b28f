use coltab_chunk::ColumnType;
use coltab_result::{Error, Result};
use coltab_store::{MemTableStore, TableStore, TableStoreConfig};
use coltab_table::{read_table, DataCell, DataRow, RowReader, RowWriteCursor, RowWriter};

fn schema() -> Vec<ColumnType> {
    vec![ColumnType::Utf8, ColumnType::F64, ColumnType::Utf8]
}

fn store(chunk_size: usize) -> MemTableStore {
    MemTableStore::new(schema(), TableStoreConfig::new(chunk_size).unwrap()).unwrap()
}

fn writer(store: &MemTableStore) -> Result<RowWriter<<MemTableStore as TableStore>::Writer>> {
    let cursor = RowWriteCursor::new(store.create_factory()?, store.create_writer()?);
    RowWriter::new(cursor, &schema())
}

#[test]
fn rows_roundtrip_with_canonical_missing_cells() {
    let store = store(2);
    let rows = vec![
        DataRow::new("r0", vec![DataCell::F64(5.0), DataCell::Utf8("a".into())]),
        DataRow::new("r1", vec![DataCell::Missing, DataCell::Utf8("b".into())]),
        DataRow::new("r2", vec![DataCell::F64(-1.0), DataCell::Missing]),
    ];

    let mut writer = writer(&store).unwrap();
    for row in &rows {
        writer.push(row).unwrap();
    }
    writer.close().unwrap();

    let table = read_table(&store);
    let reader = RowReader::new(table.new_cursor().unwrap(), &schema()).unwrap();
    let read: Vec<DataRow> = reader.collect::<Result<_>>().unwrap();
    assert_eq!(read, rows);
    assert!(read[1].cell(0).is_missing());
    assert!(read[2].cell(1).is_missing());
}

#[test]
fn push_rejects_mismatched_cell_types() {
    let store = store(4);
    let mut writer = writer(&store).unwrap();
    let row = DataRow::new(
        "bad",
        vec![DataCell::Utf8("not a number".into()), DataCell::Missing],
    );
    assert!(matches!(
        writer.push(&row),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn push_rejects_wrong_cell_count() {
    let store = store(4);
    let mut writer = writer(&store).unwrap();
    let row = DataRow::new("short", vec![DataCell::F64(1.0)]);
    assert!(matches!(
        writer.push(&row),
        Err(Error::InvalidArgumentError(_))
    ));
}

#[test]
fn reader_over_an_empty_table_yields_no_rows() {
    let store = store(4);
    let mut writer = writer(&store).unwrap();
    writer.close().unwrap();

    let table = read_table(&store);
    let mut reader = RowReader::new(table.new_cursor().unwrap(), &schema()).unwrap();
    assert!(reader.next().is_none());
}
