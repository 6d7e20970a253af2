use arrow::{
    array::{self as arrow_array, Array as _},
    datatypes::{ArrowPrimitiveType, DataType as ArrowDataType, TimeUnit as ArrowTimeUnit},
};
use chunkio_core::{
    Array, BinaryArray, DateArray, Int64Array, LargeBinaryArray, LargeStringArray, NativeType,
    PrimitiveArray, StringArray, TimeArray, TimestampArray,
};

use crate::{ConvertError, schema_convert::unit_from_arrow};

macro_rules! downcast {
    ($array:expr, $T:ty) => {
        $array
            .as_any()
            .downcast_ref::<$T>()
            .ok_or_else(|| ConvertError::UnsupportedType($array.data_type().clone()))?
    };
}

fn primitive<P>(array: &dyn arrow_array::Array) -> Result<PrimitiveArray<P::Native>, ConvertError>
where
    P: ArrowPrimitiveType,
    P::Native: NativeType,
{
    Ok(downcast!(array, arrow_array::PrimitiveArray<P>)
        .iter()
        .collect())
}

/// Rebuilds the chunkio array matching the Arrow array's type tag.
///
/// Fails with [`ConvertError::UnsupportedType`] on any tag outside the
/// chunkio type set, and with [`ConvertError::Array`] when temporal values do
/// not map to calendar values.
pub fn array_from_arrow(array: &dyn arrow_array::Array) -> Result<Array, ConvertError> {
    use arrow::datatypes as t;

    Ok(match array.data_type() {
        ArrowDataType::Boolean => downcast!(array, arrow_array::BooleanArray)
            .iter()
            .collect::<chunkio_core::BooleanArray>()
            .into(),
        ArrowDataType::Int8 => primitive::<t::Int8Type>(array)?.into(),
        ArrowDataType::Int16 => primitive::<t::Int16Type>(array)?.into(),
        ArrowDataType::Int32 => primitive::<t::Int32Type>(array)?.into(),
        ArrowDataType::Int64 => primitive::<t::Int64Type>(array)?.into(),
        ArrowDataType::UInt8 => primitive::<t::UInt8Type>(array)?.into(),
        ArrowDataType::UInt16 => primitive::<t::UInt16Type>(array)?.into(),
        ArrowDataType::UInt32 => primitive::<t::UInt32Type>(array)?.into(),
        ArrowDataType::UInt64 => primitive::<t::UInt64Type>(array)?.into(),
        ArrowDataType::Float32 => primitive::<t::Float32Type>(array)?.into(),
        ArrowDataType::Float64 => primitive::<t::Float64Type>(array)?.into(),
        ArrowDataType::Utf8 => {
            StringArray::try_from_iter(downcast!(array, arrow_array::StringArray).iter())?.into()
        }
        ArrowDataType::LargeUtf8 => LargeStringArray::try_from_iter(
            downcast!(array, arrow_array::LargeStringArray).iter(),
        )?
        .into(),
        ArrowDataType::Binary => {
            BinaryArray::try_from_iter(downcast!(array, arrow_array::BinaryArray).iter())?.into()
        }
        ArrowDataType::LargeBinary => LargeBinaryArray::try_from_iter(
            downcast!(array, arrow_array::LargeBinaryArray).iter(),
        )?
        .into(),
        ArrowDataType::Timestamp(unit, tz) => {
            let raw: Int64Array = match unit {
                ArrowTimeUnit::Second => primitive::<t::TimestampSecondType>(array)?,
                ArrowTimeUnit::Millisecond => primitive::<t::TimestampMillisecondType>(array)?,
                ArrowTimeUnit::Microsecond => primitive::<t::TimestampMicrosecondType>(array)?,
                ArrowTimeUnit::Nanosecond => primitive::<t::TimestampNanosecondType>(array)?,
            };
            TimestampArray::try_from_raw(raw, unit_from_arrow(*unit), tz.as_deref())?.into()
        }
        ArrowDataType::Date32 => {
            DateArray::try_from_days(primitive::<t::Date32Type>(array)?)?.into()
        }
        ArrowDataType::Time64(ArrowTimeUnit::Microsecond) => {
            TimeArray::try_from_micros(primitive::<t::Time64MicrosecondType>(array)?)?.into()
        }
        other => return Err(ConvertError::UnsupportedType(other.clone())),
    })
}
