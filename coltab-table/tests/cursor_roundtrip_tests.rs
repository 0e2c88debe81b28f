use coltab_chunk::ColumnType;
use coltab_result::{Error, Result};
use coltab_store::{
    DomainConfig, DomainTableStore, InstrumentedTableStore, MemTableStore, RowBatchReader,
    RowBatchReaderConfig, TableReadStore, TableStore, TableStoreConfig,
};
use coltab_table::{read_table, write_table};

fn schema() -> Vec<ColumnType> {
    vec![ColumnType::Utf8, ColumnType::F64, ColumnType::Utf8]
}

fn mem_store(chunk_size: usize) -> MemTableStore {
    MemTableStore::new(schema(), TableStoreConfig::new(chunk_size).unwrap()).unwrap()
}

type Row = (String, Option<f64>, Option<String>);

fn write_rows<S: TableStore>(store: &S, rows: &[Row]) -> Result<()> {
    let mut table = write_table(store)?;
    let cursor = table.cursor_mut();
    for (key, value, label) in rows {
        cursor.fwd()?;
        cursor.access_mut(0)?.set_utf8(key)?;
        match value {
            Some(value) => cursor.access_mut(1)?.set_f64(*value)?,
            None => cursor.access_mut(1)?.set_missing()?,
        }
        match label {
            Some(label) => cursor.access_mut(2)?.set_utf8(label)?,
            None => cursor.access_mut(2)?.set_missing()?,
        }
    }
    table.close()
}

fn read_rows<S: TableReadStore>(store: &S) -> Result<Vec<Row>> {
    let table = read_table(store);
    let mut cursor = table.new_cursor()?;
    let mut rows = Vec::new();
    while cursor.can_fwd() {
        cursor.fwd()?;
        let key = cursor.access(0)?.utf8()?.to_string();
        let value = {
            let access = cursor.access(1)?;
            if access.is_missing() {
                None
            } else {
                Some(access.f64()?)
            }
        };
        let label = {
            let access = cursor.access(2)?;
            if access.is_missing() {
                None
            } else {
                Some(access.utf8()?.to_string())
            }
        };
        rows.push((key, value, label));
    }
    cursor.close()?;
    Ok(rows)
}

fn sample_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let value = if i % 5 == 3 { None } else { Some(i as f64 * 0.5) };
            let label = if i % 7 == 2 {
                None
            } else {
                Some(format!("label-{i}"))
            };
            (format!("row-{i}"), value, label)
        })
        .collect()
}

#[test]
fn three_rows_with_chunk_size_two_produce_two_batches() {
    let store = mem_store(2);
    write_rows(&store, &sample_rows(3)).unwrap();
    assert_eq!(store.num_batches(), 2);

    let reader = store.create_reader(RowBatchReaderConfig::all()).unwrap();
    assert_eq!(reader.read(0).unwrap().num_values(), 2);
    assert_eq!(reader.read(1).unwrap().num_values(), 1);
}

#[test]
fn can_fwd_spans_batch_boundaries() {
    let store = mem_store(2);
    write_rows(&store, &sample_rows(3)).unwrap();

    let table = read_table(&store);
    let mut cursor = table.new_cursor().unwrap();
    cursor.fwd().unwrap();
    cursor.fwd().unwrap();
    // first batch exhausted, second still unread
    assert!(cursor.can_fwd());
    cursor.fwd().unwrap();
    assert!(!cursor.can_fwd());
    assert!(matches!(cursor.fwd(), Err(Error::CursorExhausted)));
}

#[test]
fn roundtrip_preserves_rows_and_missing_state() {
    for (chunk_size, n) in [(2, 3), (4, 4), (4, 9), (16, 5)] {
        let store = mem_store(chunk_size);
        let rows = sample_rows(n);
        write_rows(&store, &rows).unwrap();
        assert_eq!(read_rows(&store).unwrap(), rows);
    }
}

#[test]
fn randomized_roundtrip_across_chunk_boundaries() {
    use rand::Rng;

    let mut rng = rand::rng();
    for _ in 0..20 {
        let chunk_size = rng.random_range(1..=8);
        let n = rng.random_range(1..=50);
        let rows: Vec<Row> = (0..n)
            .map(|i| {
                let value = if rng.random_bool(0.2) {
                    None
                } else {
                    Some(rng.random::<f64>())
                };
                let label = if rng.random_bool(0.2) {
                    None
                } else {
                    Some(format!("v{}", rng.random_range(0..100)))
                };
                (format!("row-{i}"), value, label)
            })
            .collect();

        let store = mem_store(chunk_size);
        write_rows(&store, &rows).unwrap();
        assert_eq!(read_rows(&store).unwrap(), rows);
    }
}

#[test]
fn projection_refuses_unselected_columns() {
    let store = mem_store(4);
    write_rows(&store, &sample_rows(2)).unwrap();

    let table = read_table(&store);
    let mut cursor = table
        .new_cursor_with(RowBatchReaderConfig::with_columns(vec![0, 1]))
        .unwrap();
    cursor.fwd().unwrap();
    assert_eq!(cursor.access(0).unwrap().utf8().unwrap(), "row-0");
    assert!(cursor.access(1).is_ok());
    assert!(matches!(
        cursor.access(2),
        Err(Error::InvalidArgumentError(_))
    ));
}

#[test]
fn typed_access_against_wrong_column_is_reported() {
    let store = mem_store(4);
    write_rows(&store, &sample_rows(1)).unwrap();

    let table = read_table(&store);
    let mut cursor = table.new_cursor().unwrap();
    cursor.fwd().unwrap();
    assert!(matches!(
        cursor.access(1).unwrap().utf8(),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn instrumented_store_sees_exactly_one_release_per_batch() {
    let (store, stats) = InstrumentedTableStore::new(mem_store(2));
    write_rows(&store, &sample_rows(5)).unwrap();

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.batches_written, 3);
    assert_eq!(snapshot.rows_written, 5);
    assert_eq!(snapshot.writer_closes, 1);

    assert_eq!(read_rows(&store).unwrap().len(), 5);
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.batches_read, 3);
    assert_eq!(snapshot.handles_released, 3);
}

#[test]
fn closing_a_cursor_mid_table_releases_the_held_batch() {
    let (store, stats) = InstrumentedTableStore::new(mem_store(2));
    write_rows(&store, &sample_rows(4)).unwrap();

    let table = read_table(&store);
    let mut cursor = table.new_cursor().unwrap();
    cursor.fwd().unwrap();
    assert_eq!(stats.snapshot().handles_released, 0);
    cursor.close().unwrap();
    assert_eq!(stats.snapshot().handles_released, 1);
    // closing again releases nothing further
    cursor.close().unwrap();
    assert_eq!(stats.snapshot().handles_released, 1);
}

#[test]
fn struct_columns_roundtrip_through_cursors() {
    let types = vec![
        ColumnType::Utf8,
        ColumnType::Struct(vec![ColumnType::F64, ColumnType::Utf8]),
    ];
    let mem = MemTableStore::new(types, TableStoreConfig::new(2).unwrap()).unwrap();
    let (store, stats) = InstrumentedTableStore::new(mem);

    let mut table = write_table(&store).unwrap();
    let cursor = table.cursor_mut();
    for i in 0..3 {
        cursor.fwd().unwrap();
        cursor
            .access_mut(0)
            .unwrap()
            .set_utf8(&format!("row-{i}"))
            .unwrap();
        let mut access = cursor.access_mut(1).unwrap();
        if i == 1 {
            access.set_missing().unwrap();
        } else {
            access.child(0).unwrap().set_f64(i as f64).unwrap();
            access.child(1).unwrap().set_utf8("nested").unwrap();
        }
    }
    table.close().unwrap();

    let table = read_table(&store);
    let mut cursor = table.new_cursor().unwrap();
    cursor.fwd().unwrap();
    let access = cursor.access(1).unwrap();
    assert!(!access.is_missing());
    assert_eq!(access.child(0).unwrap().f64().unwrap(), 0.0);
    assert_eq!(access.child(1).unwrap().utf8().unwrap(), "nested");

    cursor.fwd().unwrap();
    assert!(cursor.access(1).unwrap().is_missing());

    cursor.fwd().unwrap();
    assert_eq!(cursor.access(1).unwrap().child(0).unwrap().f64().unwrap(), 2.0);
    cursor.close().unwrap();

    // both struct-typed batches were released exactly once
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.batches_read, 2);
    assert_eq!(snapshot.handles_released, 2);
}

#[test]
fn domain_snapshot_matches_a_multi_batch_write_session() {
    let store = DomainTableStore::new(mem_store(2), DomainConfig::new()).unwrap();
    let rows: Vec<Row> = [(5.0, "a"), (1.0, "b"), (9.0, "a"), (1.0, "c")]
        .iter()
        .enumerate()
        .map(|(i, (v, l))| (format!("row-{i}"), Some(*v), Some(l.to_string())))
        .collect();
    write_rows(&store, &rows).unwrap();

    let domains = store.domains();
    let values = domains[&1].as_f64().unwrap();
    assert_eq!(values.minimum(), Some(1.0));
    assert_eq!(values.maximum(), Some(9.0));
    assert_eq!(values.num_missing(), 0);
    assert_eq!(values.num_non_missing(), 4);

    let labels = domains[&2].as_utf8().unwrap();
    let distinct: Vec<_> = labels.values().unwrap().iter().cloned().collect();
    assert_eq!(distinct, ["a", "b", "c"]);

    // key column is tracked too: four non-missing distinct keys
    assert_eq!(domains[&0].num_non_missing(), 4);
}

#[test]
fn write_cursor_refuses_use_after_close() {
    let store = mem_store(2);
    let mut table = write_table(&store).unwrap();
    table.cursor_mut().fwd().unwrap();
    table
        .cursor_mut()
        .access_mut(0)
        .unwrap()
        .set_utf8("only")
        .unwrap();
    table.cursor_mut().close().unwrap();
    // partial batch was flushed on close
    assert_eq!(store.num_batches(), 1);

    let err = table.cursor_mut().fwd().unwrap_err();
    assert!(matches!(err, Error::Closed));
}
