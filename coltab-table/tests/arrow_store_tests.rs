//! Cursor and adapter traversal over the Arrow-backed store must match the
//! in-memory store row for row.

use coltab_arrow::ArrowTableStore;
use coltab_chunk::ColumnType;
use coltab_result::{Error, Result};
use coltab_store::{
    MemTableStore, RowBatchReaderConfig, TableReadStore, TableStore, TableStoreConfig,
};
use coltab_table::{
    read_table, write_table, DataCell, DataRow, RowReader, RowWriteCursor, RowWriter,
};

fn schema() -> Vec<ColumnType> {
    vec![ColumnType::Utf8, ColumnType::F64, ColumnType::Utf8]
}

fn sample_rows(n: usize) -> Vec<DataRow> {
    (0..n)
        .map(|i| {
            let value = if i % 4 == 1 {
                DataCell::Missing
            } else {
                DataCell::F64(i as f64 * 1.5)
            };
            let label = if i % 3 == 2 {
                DataCell::Missing
            } else {
                DataCell::Utf8(format!("label-{i}"))
            };
            DataRow::new(format!("row-{i}"), vec![value, label])
        })
        .collect()
}

fn push_rows<S: TableStore>(store: &S, rows: &[DataRow]) -> Result<()> {
    let cursor = RowWriteCursor::new(store.create_factory()?, store.create_writer()?);
    let mut writer = RowWriter::new(cursor, store.column_types())?;
    for row in rows {
        writer.push(row)?;
    }
    writer.close()
}

fn collect_rows<S: TableReadStore>(store: &S) -> Result<Vec<DataRow>> {
    let table = read_table(store);
    let reader = RowReader::new(table.new_cursor()?, store.column_types())?;
    reader.collect()
}

#[test]
fn arrow_store_roundtrip_matches_mem_store() {
    let rows = sample_rows(7);
    let arrow_store =
        ArrowTableStore::new(schema(), TableStoreConfig::new(3).unwrap()).unwrap();
    let mem_store = MemTableStore::new(schema(), TableStoreConfig::new(3).unwrap()).unwrap();

    push_rows(&arrow_store, &rows).unwrap();
    push_rows(&mem_store, &rows).unwrap();
    assert!(arrow_store.stored_bytes() > 0);

    let from_arrow = collect_rows(&arrow_store).unwrap();
    let from_mem = collect_rows(&mem_store).unwrap();
    assert_eq!(from_arrow, rows);
    assert_eq!(from_arrow, from_mem);
}

#[test]
fn arrow_reader_projection_is_enforced_by_the_cursor() {
    let store = ArrowTableStore::new(schema(), TableStoreConfig::new(2).unwrap()).unwrap();
    push_rows(&store, &sample_rows(3)).unwrap();

    let table = read_table(&store);
    let mut cursor = table
        .new_cursor_with(RowBatchReaderConfig::with_columns(vec![0, 2]))
        .unwrap();
    cursor.fwd().unwrap();
    assert_eq!(cursor.access(0).unwrap().utf8().unwrap(), "row-0");
    assert_eq!(cursor.access(2).unwrap().utf8().unwrap(), "label-0");
    assert!(matches!(
        cursor.access(1),
        Err(Error::InvalidArgumentError(_))
    ));
}

#[test]
fn arrow_store_struct_columns_roundtrip() {
    let types = vec![
        ColumnType::Utf8,
        ColumnType::Struct(vec![ColumnType::F64, ColumnType::Utf8]),
    ];
    let store =
        ArrowTableStore::new(types, TableStoreConfig::new(3).unwrap()).unwrap();

    let mut table = write_table(&store).unwrap();
    let cursor = table.cursor_mut();
    for i in 0..4 {
        cursor.fwd().unwrap();
        cursor
            .access_mut(0)
            .unwrap()
            .set_utf8(&format!("row-{i}"))
            .unwrap();
        let mut access = cursor.access_mut(1).unwrap();
        if i == 2 {
            access.set_missing().unwrap();
        } else {
            access.child(0).unwrap().set_f64(i as f64 * 2.0).unwrap();
            if i == 3 {
                access.child(1).unwrap().set_missing().unwrap();
            } else {
                access.child(1).unwrap().set_utf8(&format!("s{i}")).unwrap();
            }
        }
    }
    table.close().unwrap();

    let table = read_table(&store);
    let mut cursor = table.new_cursor().unwrap();

    cursor.fwd().unwrap();
    let access = cursor.access(1).unwrap();
    assert_eq!(access.child(0).unwrap().f64().unwrap(), 0.0);
    assert_eq!(access.child(1).unwrap().utf8().unwrap(), "s0");

    cursor.fwd().unwrap();
    cursor.fwd().unwrap();
    assert!(cursor.access(1).unwrap().is_missing());

    cursor.fwd().unwrap();
    let access = cursor.access(1).unwrap();
    assert!(!access.is_missing());
    assert_eq!(access.child(0).unwrap().f64().unwrap(), 6.0);
    assert!(access.child(1).unwrap().is_missing());
    assert!(!cursor.can_fwd());
}

#[test]
fn arrow_store_hands_out_a_single_writer() {
    let store = ArrowTableStore::new(schema(), TableStoreConfig::new(2).unwrap()).unwrap();
    let _writer = store.create_writer().unwrap();
    assert!(store.create_writer().is_err());
}
