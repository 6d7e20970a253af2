use std::fmt::{self, Debug, Display, Formatter};

use crate::{ArrayError, Bitmap, DataType};

use super::write_values;

/// Fixed-width value types storable in a [`PrimitiveArray`].
pub trait NativeType: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    const DATA_TYPE: DataType;
}

macro_rules! native_type {
    ($ty:ty, $dt:ident) => {
        impl NativeType for $ty {
            const DATA_TYPE: DataType = DataType::$dt;
        }
    };
}

native_type!(bool, Boolean);
native_type!(i8, Int8);
native_type!(i16, Int16);
native_type!(i32, Int32);
native_type!(i64, Int64);
native_type!(u8, UInt8);
native_type!(u16, UInt16);
native_type!(u32, UInt32);
native_type!(u64, UInt64);
native_type!(f32, Float32);
native_type!(f64, Float64);

/// Immutable, null-aware sequence of fixed-width values.
///
/// Null slots hold an unspecified value in the buffer; they never take part in
/// equality.
#[derive(Debug, Clone)]
pub struct PrimitiveArray<T: NativeType> {
    values: Vec<T>,
    validity: Option<Bitmap>,
}

pub type BooleanArray = PrimitiveArray<bool>;
pub type Int8Array = PrimitiveArray<i8>;
pub type Int16Array = PrimitiveArray<i16>;
pub type Int32Array = PrimitiveArray<i32>;
pub type Int64Array = PrimitiveArray<i64>;
pub type UInt8Array = PrimitiveArray<u8>;
pub type UInt16Array = PrimitiveArray<u16>;
pub type UInt32Array = PrimitiveArray<u32>;
pub type UInt64Array = PrimitiveArray<u64>;
pub type Float32Array = PrimitiveArray<f32>;
pub type Float64Array = PrimitiveArray<f64>;

impl<T: NativeType> PrimitiveArray<T> {
    /// Builds an array from a value buffer and an optional validity bitmap.
    pub fn try_new(values: Vec<T>, validity: Option<Bitmap>) -> Result<Self, ArrayError> {
        if let Some(bitmap) = &validity {
            if bitmap.len() != values.len() {
                return Err(ArrayError::ValidityLengthMismatch {
                    len: values.len(),
                    validity_len: bitmap.len(),
                });
            }
        }
        Ok(Self {
            values,
            validity: validity.and_then(Bitmap::into_validity),
        })
    }

    /// Builds an array without nulls.
    pub fn from_values(values: Vec<T>) -> Self {
        Self {
            values,
            validity: None,
        }
    }

    pub fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// # Panics
    /// Panics if `index >= self.len()`, whether or not the array has nulls.
    pub fn is_valid(&self, index: usize) -> bool {
        assert!(index < self.len(), "index {index} out of bounds for length {}", self.len());
        self.validity.as_ref().is_none_or(|bitmap| bitmap.get(index))
    }

    pub fn is_null(&self, index: usize) -> bool {
        !self.is_valid(index)
    }

    pub fn null_count(&self) -> usize {
        self.validity.as_ref().map_or(0, Bitmap::unset_bits)
    }

    /// Returns the element at `index`, `None` when it is null or out of bounds.
    pub fn get(&self, index: usize) -> Option<T> {
        if index < self.len() && self.is_valid(index) {
            Some(self.values[index])
        } else {
            None
        }
    }

    /// Raw value buffer, including the placeholders stored at null slots.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<T>> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }
}

impl<T: NativeType> FromIterator<Option<T>> for PrimitiveArray<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let capacity = iter.size_hint().0;
        let mut values = Vec::with_capacity(capacity);
        let mut validity = Bitmap::with_capacity(capacity);
        for item in iter {
            validity.push(item.is_some());
            values.push(item.unwrap_or_default());
        }
        Self {
            values,
            validity: validity.into_validity(),
        }
    }
}

impl<T: NativeType> From<Vec<Option<T>>> for PrimitiveArray<T> {
    fn from(values: Vec<Option<T>>) -> Self {
        values.into_iter().collect()
    }
}

impl<T: NativeType> PartialEq for PrimitiveArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: NativeType> Display for PrimitiveArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", T::DATA_TYPE)?;
        write_values(f, self.iter(), |f, v| write!(f, "{v:?}"))
    }
}
