use std::sync::Arc;

use arrow::datatypes::{
    DataType as ArrowDataType, Field as ArrowField, Fields, Schema as ArrowSchema,
    TimeUnit as ArrowTimeUnit,
};
use chunkio_arrow::{ConvertError, datatype_from_arrow, schema_from_arrow, schema_to_arrow};
use chunkio_core::{DataType, Field, Schema, TimeUnit};

fn all_types_schema() -> Schema {
    Schema::new(vec![
        Field::new("b", DataType::Boolean, false),
        Field::new("i8", DataType::Int8, false),
        Field::new("i16", DataType::Int16, false),
        Field::new("i32", DataType::Int32, true),
        Field::new("i64", DataType::Int64, true),
        Field::new("u8", DataType::UInt8, false),
        Field::new("u16", DataType::UInt16, false),
        Field::new("u32", DataType::UInt32, true),
        Field::new("u64", DataType::UInt64, true),
        Field::new("f32", DataType::Float32, true),
        Field::new("f64", DataType::Float64, true),
        Field::new("s", DataType::Utf8, true),
        Field::new("ls", DataType::LargeUtf8, true),
        Field::new("bin", DataType::Binary, true),
        Field::new("lbin", DataType::LargeBinary, true),
        Field::new("ts", DataType::timestamp(TimeUnit::Millisecond, Some("Europe/Paris")), true),
        Field::new("ts_naive", DataType::timestamp(TimeUnit::Nanosecond, None), true),
        Field::new("d", DataType::Date32, true),
        Field::new("t", DataType::Time64, true),
    ])
}

#[test]
fn schema_to_arrow_converts_every_type() {
    let arrow = schema_to_arrow(&all_types_schema());
    let types: Vec<ArrowDataType> = arrow.fields().iter().map(|f| f.data_type().clone()).collect();
    assert_eq!(
        types,
        vec![
            ArrowDataType::Boolean,
            ArrowDataType::Int8,
            ArrowDataType::Int16,
            ArrowDataType::Int32,
            ArrowDataType::Int64,
            ArrowDataType::UInt8,
            ArrowDataType::UInt16,
            ArrowDataType::UInt32,
            ArrowDataType::UInt64,
            ArrowDataType::Float32,
            ArrowDataType::Float64,
            ArrowDataType::Utf8,
            ArrowDataType::LargeUtf8,
            ArrowDataType::Binary,
            ArrowDataType::LargeBinary,
            ArrowDataType::Timestamp(ArrowTimeUnit::Millisecond, Some(Arc::from("Europe/Paris"))),
            ArrowDataType::Timestamp(ArrowTimeUnit::Nanosecond, None),
            ArrowDataType::Date32,
            ArrowDataType::Time64(ArrowTimeUnit::Microsecond),
        ]
    );
    assert!(!arrow.field(0).is_nullable());
    assert!(arrow.field(3).is_nullable());
    assert_eq!(arrow.field(11).name(), "s");
}

#[test]
fn schema_survives_arrow_conversion() {
    let schema = all_types_schema();
    assert_eq!(schema_from_arrow(&schema_to_arrow(&schema)).unwrap(), schema);
}

#[test]
fn nested_arrow_types_are_unsupported() {
    let schema = ArrowSchema::new(vec![
        ArrowField::new("ok", ArrowDataType::Int32, true),
        ArrowField::new(
            "nested",
            ArrowDataType::Struct(Fields::from(vec![ArrowField::new(
                "a",
                ArrowDataType::Int32,
                true,
            )])),
            true,
        ),
    ]);
    let err = schema_from_arrow(&schema).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedType(ArrowDataType::Struct(_))));
}

#[test]
fn only_microsecond_time64_is_supported() {
    assert!(matches!(
        datatype_from_arrow(&ArrowDataType::Time64(ArrowTimeUnit::Nanosecond)),
        Err(ConvertError::UnsupportedType(_))
    ));
    assert!(matches!(
        datatype_from_arrow(&ArrowDataType::Time32(ArrowTimeUnit::Second)),
        Err(ConvertError::UnsupportedType(_))
    ));
    assert_eq!(
        datatype_from_arrow(&ArrowDataType::Time64(ArrowTimeUnit::Microsecond)).unwrap(),
        DataType::Time64
    );
}
