
use std::{io::Cursor, sync::Arc};

use arrow::{
    array::{ArrayRef, Float16Array, Time64MicrosecondArray},
    datatypes::{DataType as ArrowDataType, Field as ArrowField, Schema as ArrowSchema, TimeUnit},
    ipc::writer::FileWriter,
    record_batch::RecordBatch,
};
use chunkio::{
    Array, Chunk, CodecError, DataType, Error, Field, Int32Array, IpcCompression, IpcReader,
    IpcWriteOptions, IpcWriter, ReaderState, Schema, SchemaError, arrow::ConvertError,
};
use rstest::rstest;
use test_helpers::*;

fn write_ipc(schema: Schema, chunks: &[Chunk], options: IpcWriteOptions) -> Vec<u8> {
    let mut writer = IpcWriter::try_new(Vec::new(), schema, options).unwrap();
    for chunk in chunks {
        writer.write(chunk).unwrap();
    }
    writer.finish().unwrap()
}

fn read_ipc(bytes: Vec<u8>) -> (Schema, Vec<Chunk>) {
    let reader = IpcReader::try_new(Cursor::new(bytes)).unwrap();
    let schema = reader.schema().clone();
    let chunks = reader.collect::<Result<Vec<_>, _>>().unwrap();
    (schema, chunks)
}

/// IPC file written with arrow directly, for inputs chunkio would refuse to write.
fn raw_ipc(fields: Vec<ArrowField>, columns: Vec<Vec<ArrayRef>>) -> Vec<u8> {
    let schema = Arc::new(ArrowSchema::new(fields));
    let mut writer = FileWriter::try_new(Vec::new(), &schema).unwrap();
    for arrays in columns {
        writer
            .write(&RecordBatch::try_new(schema.clone(), arrays).unwrap())
            .unwrap();
    }
    writer.into_inner().unwrap()
}

#[test]
fn nullable_uint32_round_trip() {
    let chunk = uint32_chunk(vec![Some(1), None]);
    let bytes = write_ipc(uint32_schema(), &[chunk.clone()], IpcWriteOptions::default());

    let (schema, chunks) = read_ipc(bytes);
    assert_eq!(schema, uint32_schema());
    assert_eq!(
        schema.fields(),
        &[Field::new("c0", DataType::UInt32, true)]
    );
    assert_eq!(chunks, vec![chunk]);
}

#[test]
fn all_types_round_trip() {
    let bytes = write_ipc(
        all_types_schema(),
        &[all_types_chunk()],
        IpcWriteOptions::default(),
    );
    let (schema, chunks) = read_ipc(bytes);
    assert_eq!(schema, all_types_schema());
    assert_eq!(chunks, vec![all_types_chunk()]);
}

#[rstest]
#[case::none(IpcCompression::None)]
#[case::lz4(IpcCompression::Lz4Frame)]
#[case::zstd(IpcCompression::Zstd)]
fn compressed_files_round_trip(#[case] compression: IpcCompression) {
    let chunks = vec![large_uint32_chunk(), uint32_chunk(vec![None])];
    let bytes = write_ipc(
        uint32_schema(),
        &chunks,
        IpcWriteOptions::default().with_compression(compression),
    );
    assert_eq!(read_ipc(bytes).1, chunks);
}

#[test]
fn each_write_becomes_one_batch() {
    let chunks = vec![
        uint32_chunk(vec![Some(1)]),
        uint32_chunk(vec![Some(2), Some(3)]),
        uint32_chunk(vec![]),
        uint32_chunk(vec![None, None, Some(4)]),
    ];
    let bytes = write_ipc(uint32_schema(), &chunks, IpcWriteOptions::default());

    let reader = IpcReader::try_new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.num_batches(), 4);
    let lens: Vec<usize> = reader.map(|c| c.unwrap().len()).collect();
    assert_eq!(lens, vec![1, 2, 0, 3]);
}

#[test]
fn file_without_batches_has_schema_only() {
    let bytes = write_ipc(all_types_schema(), &[], IpcWriteOptions::default());
    let (schema, chunks) = read_ipc(bytes);
    assert_eq!(schema, all_types_schema());
    assert!(chunks.is_empty());
}

#[test]
fn mismatched_chunk_is_rejected_before_writing() {
    let expected = write_ipc(
        uint32_schema(),
        &[uint32_chunk(vec![Some(7)])],
        IpcWriteOptions::default(),
    );

    let mut writer = IpcWriter::try_new(Vec::new(), uint32_schema(), Default::default()).unwrap();
    writer.write(&uint32_chunk(vec![Some(7)])).unwrap();
    let wrong_type = Chunk::try_new([Array::from(Int32Array::from(vec![Some(1)]))]).unwrap();
    let err = writer.write(&wrong_type).unwrap_err();
    assert!(matches!(
        err,
        Error::TypeMismatch(SchemaError::ColumnType { index: 0, .. })
    ));
    let wrong_arity = Chunk::try_new(Vec::new()).unwrap();
    assert!(matches!(
        writer.write(&wrong_arity),
        Err(Error::TypeMismatch(SchemaError::ColumnCount { .. }))
    ));

    // A rejected chunk leaves no trace in the output.
    assert_eq!(writer.finish().unwrap(), expected);
}

#[test]
fn nulls_in_non_nullable_field_are_a_type_mismatch() {
    let schema = Schema::new(vec![Field::new("c0", DataType::UInt32, false)]);
    let mut writer = IpcWriter::try_new(Vec::new(), schema, Default::default()).unwrap();
    assert!(matches!(
        writer.write(&uint32_chunk(vec![None])),
        Err(Error::TypeMismatch(SchemaError::NullInNonNullable { .. }))
    ));
    writer.write(&uint32_chunk(vec![Some(1)])).unwrap();
}

#[test]
fn exhausted_reader_keeps_returning_none() {
    let bytes = write_ipc(
        uint32_schema(),
        &[uint32_chunk(vec![Some(1)])],
        IpcWriteOptions::default(),
    );
    let mut reader = IpcReader::try_new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.state(), ReaderState::Opened);
    assert!(reader.next().unwrap().is_ok());
    assert_eq!(reader.state(), ReaderState::Iterating);
    assert!(reader.next().is_none());
    assert!(reader.next().is_none());
    assert_eq!(reader.state(), ReaderState::Exhausted);
}

#[test]
fn decode_error_ends_iteration() {
    let time = |v: i64| vec![Arc::new(Time64MicrosecondArray::from(vec![v])) as ArrayRef];
    let bytes = raw_ipc(
        vec![ArrowField::new("t", ArrowDataType::Time64(TimeUnit::Microsecond), true)],
        vec![time(1), time(86_400_000_000), time(2)],
    );

    let mut reader = IpcReader::try_new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.schema().fields()[0].data_type(), &DataType::Time64);
    assert!(reader.next().unwrap().is_ok());
    assert!(matches!(reader.next(), Some(Err(Error::Decode(_)))));
    assert_eq!(reader.state(), ReaderState::Failed);
    assert!(reader.next().is_none());
}

#[test]
fn unsupported_column_type_fails_on_open() {
    let bytes = raw_ipc(
        vec![ArrowField::new("h", ArrowDataType::Float16, true)],
        vec![vec![Arc::new(Float16Array::from(vec![None])) as ArrayRef]],
    );
    let err = IpcReader::try_new(Cursor::new(bytes)).err().unwrap();
    assert!(matches!(
        err,
        Error::Decode(CodecError::Convert(ConvertError::UnsupportedType(
            ArrowDataType::Float16
        )))
    ));
}

#[test]
fn garbage_input_is_a_decode_error() {
    let err = IpcReader::try_new(Cursor::new(b"definitely not arrow".to_vec()))
        .err()
        .unwrap();
    assert!(matches!(err, Error::Decode(_)), "{err:?}");
}

#[test]
fn short_source_is_a_decode_error() {
    let err = IpcReader::try_new(Cursor::new(b"ARROW".to_vec())).err().unwrap();
    assert!(matches!(err, Error::Decode(CodecError::Truncated(_))), "{err:?}");
}

#[test]
fn truncated_file_is_a_decode_error() {
    let chunks = [uint32_chunk(vec![Some(1), None])];
    let bytes = write_ipc(uint32_schema(), &chunks, Default::default());
    for len in [8, bytes.len() / 2, bytes.len() - 1] {
        let err = IpcReader::try_new(Cursor::new(bytes[..len].to_vec())).err().unwrap();
        assert!(matches!(err, Error::Decode(_)), "{len}: {err:?}");
    }
}

#[test]
fn failed_encode_poisons_writer() {
    let mut writer =
        IpcWriter::try_new(FailingSink::new(4096), uint32_schema(), Default::default()).unwrap();
    assert!(writer.write(&large_uint32_chunk()).is_err());
    assert!(matches!(
        writer.write(&uint32_chunk(vec![Some(1)])),
        Err(Error::Poisoned)
    ));
    assert!(matches!(writer.finish(), Err(Error::Poisoned)));
}

#[test]
fn file_round_trip_through_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.arrow");

    let mut writer = IpcWriter::create(&path, all_types_schema(), Default::default()).unwrap();
    writer.write(&all_types_chunk()).unwrap();
    writer.finish().unwrap();

    let reader = IpcReader::open(&path).unwrap();
    assert_eq!(reader.schema(), &all_types_schema());
    assert_eq!(
        reader.collect::<Result<Vec<_>, _>>().unwrap(),
        vec![all_types_chunk()]
    );
}

#[test]
fn dropped_writer_still_writes_footer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.arrow");
    {
        let mut writer = IpcWriter::create(&path, uint32_schema(), Default::default()).unwrap();
        writer.write(&uint32_chunk(vec![Some(1), None])).unwrap();
    }

    let chunks = IpcReader::open(&path)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(chunks, vec![uint32_chunk(vec![Some(1), None])]);
}

#[test]
fn missing_file_is_a_resource_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = IpcReader::open(dir.path().join("missing.arrow")).err().unwrap();
    assert!(matches!(err, Error::Resource(_)));
}
