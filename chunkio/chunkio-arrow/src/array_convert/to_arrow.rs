use std::sync::Arc;

use arrow::array::{
    self as arrow_array, ArrayRef, Date32Array, Time64MicrosecondArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray,
};
use chunkio_core::{Array, TimeUnit, TimestampArray};

macro_rules! from_iter {
    ($T:ty, $iter:expr) => {
        Arc::new(<$T>::from_iter($iter)) as ArrayRef
    };
}

/// Copies a chunkio array into the matching Arrow array.
pub fn array_to_arrow(array: &Array) -> ArrayRef {
    match array {
        Array::Boolean(a) => from_iter!(arrow_array::BooleanArray, a.iter()),
        Array::Int8(a) => from_iter!(arrow_array::Int8Array, a.iter()),
        Array::Int16(a) => from_iter!(arrow_array::Int16Array, a.iter()),
        Array::Int32(a) => from_iter!(arrow_array::Int32Array, a.iter()),
        Array::Int64(a) => from_iter!(arrow_array::Int64Array, a.iter()),
        Array::UInt8(a) => from_iter!(arrow_array::UInt8Array, a.iter()),
        Array::UInt16(a) => from_iter!(arrow_array::UInt16Array, a.iter()),
        Array::UInt32(a) => from_iter!(arrow_array::UInt32Array, a.iter()),
        Array::UInt64(a) => from_iter!(arrow_array::UInt64Array, a.iter()),
        Array::Float32(a) => from_iter!(arrow_array::Float32Array, a.iter()),
        Array::Float64(a) => from_iter!(arrow_array::Float64Array, a.iter()),
        Array::Utf8(a) => from_iter!(arrow_array::StringArray, a.iter()),
        Array::LargeUtf8(a) => from_iter!(arrow_array::LargeStringArray, a.iter()),
        Array::Binary(a) => from_iter!(arrow_array::BinaryArray, a.iter()),
        Array::LargeBinary(a) => from_iter!(arrow_array::LargeBinaryArray, a.iter()),
        Array::Timestamp(a) => timestamp_to_arrow(a),
        Array::Date32(a) => from_iter!(Date32Array, a.days().iter()),
        Array::Time64(a) => from_iter!(Time64MicrosecondArray, a.micros().iter()),
    }
}

fn timestamp_to_arrow(array: &TimestampArray) -> ArrayRef {
    let raw = array.raw().iter();
    let tz = array.timezone();
    match array.unit() {
        TimeUnit::Second => Arc::new(TimestampSecondArray::from_iter(raw).with_timezone_opt(tz)),
        TimeUnit::Millisecond => {
            Arc::new(TimestampMillisecondArray::from_iter(raw).with_timezone_opt(tz))
        }
        TimeUnit::Microsecond => {
            Arc::new(TimestampMicrosecondArray::from_iter(raw).with_timezone_opt(tz))
        }
        TimeUnit::Nanosecond => {
            Arc::new(TimestampNanosecondArray::from_iter(raw).with_timezone_opt(tz))
        }
    }
}
