use std::sync::Arc;

use arrow::datatypes::{
    DataType as ArrowDataType, Field as ArrowField, Schema as ArrowSchema,
    TimeUnit as ArrowTimeUnit,
};
use chunkio_core::{DataType, Field, Schema, TimeUnit};

use crate::ConvertError;

// ---------------------------------------------------------------------------
// chunkio -> Arrow
// ---------------------------------------------------------------------------

/// Converts a chunkio `Schema` into an Arrow `Schema`, field by field.
pub fn schema_to_arrow(schema: &Schema) -> ArrowSchema {
    ArrowSchema::new(schema.iter().map(field_to_arrow).collect::<Vec<_>>())
}

pub fn field_to_arrow(field: &Field) -> ArrowField {
    ArrowField::new(
        field.name(),
        datatype_to_arrow(field.data_type()),
        field.is_nullable(),
    )
}

pub fn datatype_to_arrow(dt: &DataType) -> ArrowDataType {
    match dt {
        DataType::Boolean => ArrowDataType::Boolean,
        DataType::Int8 => ArrowDataType::Int8,
        DataType::Int16 => ArrowDataType::Int16,
        DataType::Int32 => ArrowDataType::Int32,
        DataType::Int64 => ArrowDataType::Int64,
        DataType::UInt8 => ArrowDataType::UInt8,
        DataType::UInt16 => ArrowDataType::UInt16,
        DataType::UInt32 => ArrowDataType::UInt32,
        DataType::UInt64 => ArrowDataType::UInt64,
        DataType::Float32 => ArrowDataType::Float32,
        DataType::Float64 => ArrowDataType::Float64,
        DataType::Utf8 => ArrowDataType::Utf8,
        DataType::LargeUtf8 => ArrowDataType::LargeUtf8,
        DataType::Binary => ArrowDataType::Binary,
        DataType::LargeBinary => ArrowDataType::LargeBinary,
        DataType::Timestamp(unit, tz) => {
            ArrowDataType::Timestamp(unit_to_arrow(*unit), tz.as_deref().map(Arc::from))
        }
        DataType::Date32 => ArrowDataType::Date32,
        DataType::Time64 => ArrowDataType::Time64(ArrowTimeUnit::Microsecond),
    }
}

pub(crate) fn unit_to_arrow(unit: TimeUnit) -> ArrowTimeUnit {
    match unit {
        TimeUnit::Second => ArrowTimeUnit::Second,
        TimeUnit::Millisecond => ArrowTimeUnit::Millisecond,
        TimeUnit::Microsecond => ArrowTimeUnit::Microsecond,
        TimeUnit::Nanosecond => ArrowTimeUnit::Nanosecond,
    }
}

// ---------------------------------------------------------------------------
// Arrow -> chunkio
// ---------------------------------------------------------------------------

/// Converts an Arrow `Schema` read from a file footer into a chunkio `Schema`.
///
/// Fails with [`ConvertError::UnsupportedType`] on the first field whose type
/// has no chunkio counterpart (nested, dictionary, decimal, ...).
pub fn schema_from_arrow(schema: &ArrowSchema) -> Result<Schema, ConvertError> {
    schema
        .fields()
        .iter()
        .map(|f| field_from_arrow(f))
        .collect::<Result<Vec<_>, _>>()
        .map(Schema::new)
}

pub fn field_from_arrow(field: &ArrowField) -> Result<Field, ConvertError> {
    Ok(Field::new(
        field.name(),
        datatype_from_arrow(field.data_type())?,
        field.is_nullable(),
    ))
}

pub fn datatype_from_arrow(dt: &ArrowDataType) -> Result<DataType, ConvertError> {
    Ok(match dt {
        ArrowDataType::Boolean => DataType::Boolean,
        ArrowDataType::Int8 => DataType::Int8,
        ArrowDataType::Int16 => DataType::Int16,
        ArrowDataType::Int32 => DataType::Int32,
        ArrowDataType::Int64 => DataType::Int64,
        ArrowDataType::UInt8 => DataType::UInt8,
        ArrowDataType::UInt16 => DataType::UInt16,
        ArrowDataType::UInt32 => DataType::UInt32,
        ArrowDataType::UInt64 => DataType::UInt64,
        ArrowDataType::Float32 => DataType::Float32,
        ArrowDataType::Float64 => DataType::Float64,
        ArrowDataType::Utf8 => DataType::Utf8,
        ArrowDataType::LargeUtf8 => DataType::LargeUtf8,
        ArrowDataType::Binary => DataType::Binary,
        ArrowDataType::LargeBinary => DataType::LargeBinary,
        ArrowDataType::Timestamp(unit, tz) => {
            DataType::timestamp(unit_from_arrow(*unit), tz.as_deref())
        }
        ArrowDataType::Date32 => DataType::Date32,
        ArrowDataType::Time64(ArrowTimeUnit::Microsecond) => DataType::Time64,
        other => return Err(ConvertError::UnsupportedType(other.clone())),
    })
}

pub(crate) fn unit_from_arrow(unit: ArrowTimeUnit) -> TimeUnit {
    match unit {
        ArrowTimeUnit::Second => TimeUnit::Second,
        ArrowTimeUnit::Millisecond => TimeUnit::Millisecond,
        ArrowTimeUnit::Microsecond => TimeUnit::Microsecond,
        ArrowTimeUnit::Nanosecond => TimeUnit::Nanosecond,
    }
}
