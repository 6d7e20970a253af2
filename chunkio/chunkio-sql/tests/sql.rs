use chrono::{DateTime, NaiveDate, NaiveTime};
use chunkio_core::{
    Array, BinaryArray, BooleanArray, Chunk, DataType, DateArray, Field, Float32Array,
    Float64Array, Int8Array, Int64Array, Int32Array, ReaderState, StringArray, TimeArray,
    TimeUnit, TimestampArray, TimestampValue, UInt64Array,
};
use chunkio_sql::{SqlConnector, SqlError, SqlValue, sqlite_data_type};
use rstest::rstest;

fn memory_db() -> SqlConnector {
    SqlConnector::connect(":memory:").unwrap()
}

fn int_chunk(values: Vec<Option<i32>>) -> Chunk {
    Chunk::try_new([Array::from(Int32Array::from(values))]).unwrap()
}

fn query_all(db: &mut SqlConnector, statement: &str) -> Vec<Chunk> {
    db.execute(statement, Some(1024))
        .unwrap()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn count_rows(db: &mut SqlConnector, table: &str) -> Chunk {
    let mut chunks = query_all(db, &format!("SELECT count(*) FROM {table}"));
    chunks.remove(0)
}

#[test]
fn insert_and_select_round_trip() {
    let mut db = memory_db();
    assert!(db.execute("CREATE TABLE t (c1 INT, c2 TEXT)", None).unwrap().is_none());

    let chunk = Chunk::try_new([
        Array::from(Int32Array::from(vec![Some(1), None])),
        StringArray::from_iter([Some("aa"), None]).into(),
    ])
    .unwrap();
    assert_eq!(db.write("INSERT INTO t VALUES (?, ?)", &chunk).unwrap(), 2);

    let mut cursor = db.execute("SELECT c1, c2 FROM t", Some(1024)).unwrap().unwrap();
    assert_eq!(
        cursor.fields(),
        &[
            Field::new("c1", DataType::Int32, true),
            Field::new("c2", DataType::Utf8, true),
        ]
    );
    let first = cursor.next().unwrap().unwrap();
    assert_eq!(first.arrays(), chunk.arrays());
    assert!(cursor.next().is_none());
}

#[test]
fn statements_without_result_set_return_none() {
    let mut db = memory_db();
    assert!(db.execute("CREATE TABLE t (c1 INT)", None).unwrap().is_none());
    assert!(db.execute("INSERT INTO t VALUES (1)", None).unwrap().is_none());
    assert!(db.execute("DELETE FROM t", Some(10)).unwrap().is_none());
}

#[test]
fn result_set_is_split_into_batches() {
    let mut db = memory_db();
    db.execute("CREATE TABLE t (c1 INT)", None).unwrap();
    db.write(
        "INSERT INTO t VALUES (?)",
        &int_chunk(vec![Some(1), Some(2), None, Some(4), Some(5)]),
    )
    .unwrap();

    let cursor = db.execute("SELECT c1 FROM t", Some(2)).unwrap().unwrap();
    assert_eq!(cursor.batch_size(), 2);
    let chunks = cursor.collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(
        chunks,
        vec![
            int_chunk(vec![Some(1), Some(2)]),
            int_chunk(vec![None, Some(4)]),
            int_chunk(vec![Some(5)]),
        ]
    );
}

#[test]
fn empty_result_set_yields_fields_and_no_chunks() {
    let mut db = memory_db();
    db.execute("CREATE TABLE t (c1 BIGINT)", None).unwrap();

    let mut cursor = db.execute("SELECT c1 FROM t", Some(8)).unwrap().unwrap();
    assert_eq!(cursor.fields(), &[Field::new("c1", DataType::Int64, true)]);
    assert_eq!(cursor.state(), ReaderState::Opened);
    assert!(cursor.next().is_none());
    assert!(cursor.next().is_none());
    assert_eq!(cursor.state(), ReaderState::Exhausted);
}

#[test]
fn result_set_requires_batch_size() {
    let mut db = memory_db();
    db.execute("CREATE TABLE t (c1 INT)", None).unwrap();
    assert!(matches!(
        db.execute("SELECT c1 FROM t", None),
        Err(SqlError::BatchSizeRequired)
    ));
}

#[test]
fn zero_batch_size_is_rejected_before_running() {
    let mut db = memory_db();
    assert!(matches!(
        db.execute("CREATE TABLE t (c1 INT)", Some(0)),
        Err(SqlError::InvalidBatchSize)
    ));
    // The table was never created.
    assert!(matches!(
        db.execute("SELECT c1 FROM t", Some(1)),
        Err(SqlError::Driver(_))
    ));
}

#[test]
fn malformed_statement_is_a_driver_error() {
    let mut db = memory_db();
    let err = db.execute("SELEC 1", Some(1)).err().unwrap();
    assert!(matches!(err, SqlError::Driver(_)), "{err:?}");
    assert!(err.to_string().contains("syntax error"), "{err}");
}

#[test]
fn parameter_count_must_match_columns() {
    let mut db = memory_db();
    db.execute("CREATE TABLE t (c1 INT, c2 INT)", None).unwrap();

    let err = db
        .write("INSERT INTO t VALUES (?, ?)", &int_chunk(vec![Some(1)]))
        .unwrap_err();
    assert!(matches!(
        err,
        SqlError::TypeMismatch {
            parameters: 2,
            columns: 1
        }
    ));
    assert_eq!(
        count_rows(&mut db, "t"),
        Chunk::try_new([Array::from(StringArray::from_iter([Some("0")]))]).unwrap()
    );
}

#[test]
fn failed_row_rolls_back_whole_write() {
    let mut db = memory_db();
    db.execute("CREATE TABLE t (c1 INT UNIQUE)", None).unwrap();

    let err = db
        .write(
            "INSERT INTO t VALUES (?)",
            &int_chunk(vec![Some(1), Some(2), Some(1)]),
        )
        .unwrap_err();
    assert!(matches!(err, SqlError::Driver(_)), "{err:?}");

    assert!(query_all(&mut db, "SELECT c1 FROM t").is_empty());
    // The connection is usable afterwards.
    db.write("INSERT INTO t VALUES (?)", &int_chunk(vec![Some(1)]))
        .unwrap();
    assert_eq!(query_all(&mut db, "SELECT c1 FROM t"), vec![int_chunk(vec![Some(1)])]);
}

#[test]
fn unsigned_values_beyond_i64_are_rejected_before_writing() {
    let mut db = memory_db();
    db.execute("CREATE TABLE t (c1 BIGINT)", None).unwrap();

    let chunk = Chunk::try_new([Array::from(UInt64Array::from(vec![Some(1), Some(u64::MAX)]))])
        .unwrap();
    let err = db.write("INSERT INTO t VALUES (?)", &chunk).unwrap_err();
    assert!(
        matches!(err, SqlError::Conversion { row: 1, ref column, .. } if column == "?1"),
        "{err:?}"
    );
    assert!(query_all(&mut db, "SELECT c1 FROM t").is_empty());
}

#[test]
fn unconvertible_cell_ends_iteration() {
    let mut db = memory_db();
    db.execute("CREATE TABLE t (c1 INT)", None).unwrap();
    db.execute("INSERT INTO t VALUES (1), ('abc'), (3)", None)
        .unwrap();

    let mut cursor = db.execute("SELECT c1 FROM t", Some(1)).unwrap().unwrap();
    assert_eq!(cursor.next().unwrap().unwrap(), int_chunk(vec![Some(1)]));
    let err = cursor.next().unwrap().unwrap_err();
    assert!(
        matches!(err, SqlError::Conversion { row: 1, ref column, .. } if column == "c1"),
        "{err:?}"
    );
    assert_eq!(cursor.state(), ReaderState::Failed);
    assert!(cursor.next().is_none());
}

#[test]
fn declared_types_round_trip() {
    let mut db = memory_db();
    db.execute(
        "CREATE TABLE t (
            b BOOLEAN, i TINYINT, n BIGINT, r REAL, d DOUBLE PRECISION,
            s VARCHAR(16), bin BLOB, day DATE, tod TIME, ts TIMESTAMP
        )",
        None,
    )
    .unwrap();

    let ts = NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_micro_opt(13, 5, 9, 250)
        .unwrap();
    let chunk = Chunk::try_new([
        Array::from(BooleanArray::from(vec![Some(true), Some(false), None])),
        Int8Array::from(vec![Some(-128), None, Some(127)]).into(),
        Int64Array::from(vec![Some(i64::MIN), Some(0), None]).into(),
        Float64Array::from(vec![Some(1.5), None, Some(-2.25)]).into(),
        Float64Array::from(vec![Some(0.1), Some(1e300), None]).into(),
        StringArray::from_iter([Some("é"), Some(""), None]).into(),
        BinaryArray::from_iter([Some(b"\x00\xff".as_slice()), None, Some(b"".as_slice())]).into(),
        DateArray::from_iter([NaiveDate::from_ymd_opt(1969, 12, 31), None, None]).into(),
        TimeArray::from_iter([None, NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999), None])
            .into(),
        TimestampArray::try_new(
            [Some(TimestampValue::from(ts)), None, None],
            TimeUnit::Microsecond,
            None,
        )
        .unwrap()
        .into(),
    ])
    .unwrap();
    db.write(
        "INSERT INTO t VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        &chunk,
    )
    .unwrap();

    let cursor = db.execute("SELECT * FROM t", Some(16)).unwrap().unwrap();
    let types: Vec<DataType> = cursor.fields().iter().map(|f| f.data_type().clone()).collect();
    assert_eq!(types, chunk.data_types());
    assert!(cursor.fields().iter().all(Field::is_nullable));
    assert_eq!(cursor.collect::<Result<Vec<_>, _>>().unwrap(), vec![chunk]);
}

#[test]
fn real_columns_keep_double_precision() {
    let mut db = memory_db();
    db.execute("CREATE TABLE t (x REAL)", None).unwrap();
    let written = Chunk::try_new([Array::from(Float64Array::from(vec![
        Some(0.1),
        Some(16_777_217.0),
        None,
    ]))])
    .unwrap();
    db.write("INSERT INTO t VALUES (?)", &written).unwrap();

    let cursor = db.execute("SELECT x FROM t", Some(16)).unwrap().unwrap();
    assert_eq!(cursor.fields()[0].data_type(), &DataType::Float64);
    assert_eq!(cursor.collect::<Result<Vec<_>, _>>().unwrap(), vec![written]);
}

#[test]
fn single_precision_values_widen_to_double() {
    let mut db = memory_db();
    db.execute("CREATE TABLE t (x FLOAT4)", None).unwrap();
    let chunk =
        Chunk::try_new([Array::from(Float32Array::from(vec![Some(0.1f32), None]))]).unwrap();
    db.write("INSERT INTO t VALUES (?)", &chunk).unwrap();

    let expected =
        Chunk::try_new([Array::from(Float64Array::from(vec![Some(f64::from(0.1f32)), None]))])
            .unwrap();
    assert_eq!(query_all(&mut db, "SELECT x FROM t"), vec![expected]);
}

#[test]
fn zoned_timestamps_are_read_back_as_utc() {
    let mut db = memory_db();
    db.execute("CREATE TABLE t (ts DATETIME)", None).unwrap();

    let zoned = DateTime::parse_from_rfc3339("2021-01-15T10:00:00.123+01:00").unwrap();
    let written = TimestampArray::try_new(
        [Some(TimestampValue::from(zoned))],
        TimeUnit::Millisecond,
        Some("+01:00"),
    )
    .unwrap();
    let chunk = Chunk::try_new([Array::from(written)]).unwrap();
    db.write("INSERT INTO t VALUES (?)", &chunk).unwrap();
    db.execute("INSERT INTO t VALUES ('2021-01-15 09:00:00')", None)
        .unwrap();

    let expected = TimestampArray::try_new(
        [
            Some(TimestampValue::from(zoned.naive_utc())),
            Some(NaiveDate::from_ymd_opt(2021, 1, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
                .into()),
        ],
        TimeUnit::Microsecond,
        None,
    )
    .unwrap();
    let chunks = query_all(&mut db, "SELECT ts FROM t");
    assert_eq!(chunks[0].arrays(), &[Array::from(expected)]);
}

#[test]
fn expression_columns_are_text() {
    let mut db = memory_db();
    let chunks = query_all(&mut db, "SELECT 1 + 1 AS two, NULL AS nothing, 0.5 AS half");
    assert_eq!(
        chunks[0],
        Chunk::try_new([
            Array::from(StringArray::from_iter([Some("2")])),
            StringArray::from_iter([None::<&str>]).into(),
            StringArray::from_iter([Some("0.5")]).into(),
        ])
        .unwrap()
    );
}

#[rstest]
#[case(Some("TINYINT"), DataType::Int8)]
#[case(Some("smallint"), DataType::Int16)]
#[case(Some("INT"), DataType::Int32)]
#[case(Some("Integer"), DataType::Int32)]
#[case(Some("MEDIUMINT"), DataType::Int32)]
#[case(Some("BIGINT"), DataType::Int64)]
#[case(Some("INT8"), DataType::Int64)]
#[case(Some("BOOL"), DataType::Boolean)]
#[case(Some("boolean"), DataType::Boolean)]
#[case(Some("REAL"), DataType::Float64)]
#[case(Some("FLOAT4"), DataType::Float64)]
#[case(Some("DOUBLE"), DataType::Float64)]
#[case(Some("double  precision"), DataType::Float64)]
#[case(Some("FLOAT"), DataType::Float64)]
#[case(Some("FLOAT8"), DataType::Float64)]
#[case(Some("NUMERIC"), DataType::Float64)]
#[case(Some("DECIMAL(10, 2)"), DataType::Float64)]
#[case(Some("CHAR(3)"), DataType::Utf8)]
#[case(Some("VARCHAR(255)"), DataType::Utf8)]
#[case(Some("TEXT"), DataType::Utf8)]
#[case(Some("CLOB"), DataType::Utf8)]
#[case(Some("NCHAR"), DataType::Utf8)]
#[case(Some("NVARCHAR(10)"), DataType::Utf8)]
#[case(Some("BLOB"), DataType::Binary)]
#[case(Some("DATE"), DataType::Date32)]
#[case(Some("TIME"), DataType::Time64)]
#[case(Some("DATETIME"), DataType::timestamp(TimeUnit::Microsecond, None))]
#[case(Some("timestamp"), DataType::timestamp(TimeUnit::Microsecond, None))]
#[case(Some("UNSIGNED BIG INT"), DataType::Utf8)]
#[case(Some("JSON"), DataType::Utf8)]
#[case(Some(""), DataType::Utf8)]
#[case(None, DataType::Utf8)]
fn sqlite_declared_type_mapping(#[case] decl_type: Option<&str>, #[case] expected: DataType) {
    assert_eq!(sqlite_data_type(decl_type), expected);
}

#[rstest]
#[case("")]
#[case("sqlite://")]
fn empty_connection_string_is_rejected(#[case] connection_string: &str) {
    assert!(matches!(
        SqlConnector::connect(connection_string),
        Err(SqlError::Driver(_))
    ));
}

#[test]
fn unreachable_database_is_a_driver_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("db.sqlite");
    assert!(matches!(
        SqlConnector::connect(path.to_str().unwrap()),
        Err(SqlError::Driver(_))
    ));
}

#[test]
fn file_database_persists_between_connections() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("db.sqlite").display());

    let mut db = SqlConnector::connect(&url).unwrap();
    db.execute("CREATE TABLE t (c1 INT)", None).unwrap();
    db.write("INSERT INTO t VALUES (?)", &int_chunk(vec![Some(7), None]))
        .unwrap();
    drop(db);

    let mut db = SqlConnector::connect(&url).unwrap();
    assert_eq!(
        query_all(&mut db, "SELECT c1 FROM t"),
        vec![int_chunk(vec![Some(7), None])]
    );
}

#[test]
fn uri_connection_string_is_accepted() {
    let mut db = SqlConnector::connect("file:shared?mode=memory").unwrap();
    assert_eq!(
        query_all(&mut db, "SELECT 'ok'"),
        vec![Chunk::try_new([Array::from(StringArray::from_iter([Some("ok")]))]).unwrap()]
    );
}

#[test]
fn sql_value_accessors_coerce_storage_classes() {
    assert_eq!(SqlValue::Integer(3).try_f64(), Ok(Some(3.0)));
    assert_eq!(SqlValue::Integer(0).try_bool(), Ok(Some(false)));
    assert_eq!(SqlValue::Null.try_i64(), Ok(None));
    assert_eq!(
        SqlValue::Real(2.5).try_text().unwrap().as_deref(),
        Some("2.5")
    );
    assert_eq!(SqlValue::from("ab").try_blob(), Ok(Some(b"ab".as_slice())));
    let err = SqlValue::Blob(vec![1]).try_i64().unwrap_err();
    assert_eq!(err.to_string(), "expected integer, found blob");
    assert!(SqlValue::Blob(vec![0xff]).try_text().is_err());
}
