//! Immutable, null-aware arrays, one concrete type per [`DataType`].

mod binary;
mod primitive;
mod temporal;

use std::fmt::{self, Display, Formatter};

pub use binary::{
    BinaryArray, GenericBinaryArray, GenericStringArray, LargeBinaryArray, LargeStringArray,
    Offset, StringArray,
};
pub use primitive::{
    BooleanArray, Float32Array, Float64Array, Int8Array, Int16Array, Int32Array, Int64Array,
    NativeType, PrimitiveArray, UInt8Array, UInt16Array, UInt32Array, UInt64Array,
};
pub use temporal::{DateArray, TimeArray, TimestampArray};

use crate::{Bitmap, DataType};

/// Writes `[v0, None, v2]`, rendering present values with `write_value`.
pub(crate) fn write_values<T>(
    f: &mut Formatter<'_>,
    values: impl Iterator<Item = Option<T>>,
    mut write_value: impl FnMut(&mut Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, value) in values.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match value {
            Some(v) => write_value(f, v)?,
            None => f.write_str("None")?,
        }
    }
    f.write_str("]")
}

/// Any array, tagged by its logical type.
///
/// Equality requires the same variant (hence the same [`DataType`]), the same
/// length and position-wise equal elements, where null equals null.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    Boolean(BooleanArray),
    Int8(Int8Array),
    Int16(Int16Array),
    Int32(Int32Array),
    Int64(Int64Array),
    UInt8(UInt8Array),
    UInt16(UInt16Array),
    UInt32(UInt32Array),
    UInt64(UInt64Array),
    Float32(Float32Array),
    Float64(Float64Array),
    Utf8(StringArray),
    LargeUtf8(LargeStringArray),
    Binary(BinaryArray),
    LargeBinary(LargeBinaryArray),
    Timestamp(TimestampArray),
    Date32(DateArray),
    Time64(TimeArray),
}

macro_rules! with_array {
    ($array:expr, $inner:ident => $body:expr) => {
        match $array {
            Array::Boolean($inner) => $body,
            Array::Int8($inner) => $body,
            Array::Int16($inner) => $body,
            Array::Int32($inner) => $body,
            Array::Int64($inner) => $body,
            Array::UInt8($inner) => $body,
            Array::UInt16($inner) => $body,
            Array::UInt32($inner) => $body,
            Array::UInt64($inner) => $body,
            Array::Float32($inner) => $body,
            Array::Float64($inner) => $body,
            Array::Utf8($inner) => $body,
            Array::LargeUtf8($inner) => $body,
            Array::Binary($inner) => $body,
            Array::LargeBinary($inner) => $body,
            Array::Timestamp($inner) => $body,
            Array::Date32($inner) => $body,
            Array::Time64($inner) => $body,
        }
    };
}

impl Array {
    pub fn data_type(&self) -> DataType {
        with_array!(self, a => a.data_type())
    }

    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn is_null(&self, index: usize) -> bool {
        with_array!(self, a => a.is_null(index))
    }

    pub fn null_count(&self) -> usize {
        with_array!(self, a => a.null_count())
    }

    pub fn validity(&self) -> Option<&Bitmap> {
        with_array!(self, a => a.validity())
    }
}

impl Display for Array {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        with_array!(self, a => Display::fmt(a, f))
    }
}

macro_rules! impl_from_array {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Array {
                fn from(array: $ty) -> Self {
                    Array::$variant(array)
                }
            }
        )*
    };
}

impl_from_array!(
    Boolean(BooleanArray),
    Int8(Int8Array),
    Int16(Int16Array),
    Int32(Int32Array),
    Int64(Int64Array),
    UInt8(UInt8Array),
    UInt16(UInt16Array),
    UInt32(UInt32Array),
    UInt64(UInt64Array),
    Float32(Float32Array),
    Float64(Float64Array),
    Utf8(StringArray),
    LargeUtf8(LargeStringArray),
    Binary(BinaryArray),
    LargeBinary(LargeBinaryArray),
    Timestamp(TimestampArray),
    Date32(DateArray),
    Time64(TimeArray),
);
