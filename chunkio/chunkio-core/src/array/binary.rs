use std::fmt::{self, Debug, Display, Formatter};

use crate::{ArrayError, Bitmap, DataType};

use super::write_values;

/// Offset width of variable-length arrays: `i32` for the regular variants and
/// `i64` for the large ones.
pub trait Offset: Copy + Default + Debug + Send + Sync + 'static {
    const IS_LARGE: bool;
    const MAX: usize;

    fn from_usize(value: usize) -> Option<Self>;
    fn to_usize(self) -> Option<usize>;
}

impl Offset for i32 {
    const IS_LARGE: bool = false;
    const MAX: usize = i32::MAX as usize;

    fn from_usize(value: usize) -> Option<Self> {
        i32::try_from(value).ok()
    }

    fn to_usize(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

impl Offset for i64 {
    const IS_LARGE: bool = true;
    const MAX: usize = i64::MAX as usize;

    fn from_usize(value: usize) -> Option<Self> {
        i64::try_from(value).ok()
    }

    fn to_usize(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

/// Offsets validated against a value buffer of `values_len` bytes, converted
/// to `usize` once so element access never re-checks them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Offsets {
    starts: Vec<usize>,
}

impl Offsets {
    fn with_capacity(len: usize) -> Self {
        let mut starts = Vec::with_capacity(len + 1);
        starts.push(0);
        Self { starts }
    }

    fn try_from_raw<O: Offset>(
        raw: &[O],
        values_len: usize,
        data_type: DataType,
    ) -> Result<Self, ArrayError> {
        let invalid = |detail: String| ArrayError::InvalidOffsets {
            data_type: data_type.clone(),
            detail,
        };
        if raw.is_empty() {
            return Err(invalid("offsets must contain at least one entry".into()));
        }
        let mut starts = Vec::with_capacity(raw.len());
        for (i, offset) in raw.iter().enumerate() {
            let offset = offset
                .to_usize()
                .ok_or_else(|| invalid(format!("negative offset at {i}")))?;
            if starts.last().is_some_and(|prev| offset < *prev) {
                return Err(invalid(format!("offsets decrease at {i}")));
            }
            starts.push(offset);
        }
        if starts.last().copied() != Some(values_len) {
            return Err(invalid(format!(
                "last offset does not match {values_len} value bytes"
            )));
        }
        Ok(Self { starts })
    }

    fn len(&self) -> usize {
        self.starts.len() - 1
    }

    fn range(&self, index: usize) -> std::ops::Range<usize> {
        self.starts[index]..self.starts[index + 1]
    }

    fn to_raw<O: Offset>(&self) -> Vec<O> {
        // Every start was bounded by `O::MAX` at construction.
        self.starts
            .iter()
            .map(|start| O::from_usize(*start).unwrap_or_default())
            .collect()
    }
}

/// Appends one element's bytes, failing once the total exceeds `O::MAX`.
fn push_value<O: Offset>(
    offsets: &mut Offsets,
    values: &mut Vec<u8>,
    bytes: &[u8],
    data_type: impl FnOnce() -> DataType,
) -> Result<(), ArrayError> {
    values.extend_from_slice(bytes);
    if values.len() > O::MAX {
        return Err(ArrayError::OffsetOverflow {
            data_type: data_type(),
            max: O::MAX,
        });
    }
    offsets.starts.push(values.len());
    Ok(())
}

fn check_validity(len: usize, validity: &Option<Bitmap>) -> Result<(), ArrayError> {
    match validity {
        Some(bitmap) if bitmap.len() != len => Err(ArrayError::ValidityLengthMismatch {
            len,
            validity_len: bitmap.len(),
        }),
        _ => Ok(()),
    }
}

/// Immutable, null-aware sequence of byte strings.
#[derive(Debug, Clone)]
pub struct GenericBinaryArray<O: Offset> {
    offsets: Offsets,
    values: Vec<u8>,
    validity: Option<Bitmap>,
    _offset: std::marker::PhantomData<O>,
}

pub type BinaryArray = GenericBinaryArray<i32>;
pub type LargeBinaryArray = GenericBinaryArray<i64>;

impl<O: Offset> GenericBinaryArray<O> {
    /// Builds an array from raw offsets, value bytes and optional validity.
    pub fn try_new(
        offsets: &[O],
        values: Vec<u8>,
        validity: Option<Bitmap>,
    ) -> Result<Self, ArrayError> {
        let offsets = Offsets::try_from_raw(offsets, values.len(), Self::DATA_TYPE)?;
        check_validity(offsets.len(), &validity)?;
        Ok(Self {
            offsets,
            values,
            validity: validity.and_then(Bitmap::into_validity),
            _offset: std::marker::PhantomData,
        })
    }

    /// Builds an array from optional byte strings.
    ///
    /// Fails with [`ArrayError::OffsetOverflow`] when the total byte length
    /// does not fit the offset width.
    pub fn try_from_iter<I, B>(iter: I) -> Result<Self, ArrayError>
    where
        I: IntoIterator<Item = Option<B>>,
        B: AsRef<[u8]>,
    {
        let iter = iter.into_iter();
        let capacity = iter.size_hint().0;
        let mut offsets = Offsets::with_capacity(capacity);
        let mut values = Vec::new();
        let mut validity = Bitmap::with_capacity(capacity);
        for item in iter {
            validity.push(item.is_some());
            let bytes = item.as_ref().map_or(&[][..], |b| b.as_ref());
            push_value::<O>(&mut offsets, &mut values, bytes, || Self::DATA_TYPE)?;
        }
        Ok(Self {
            offsets,
            values,
            validity: validity.into_validity(),
            _offset: std::marker::PhantomData,
        })
    }

    const DATA_TYPE: DataType = if O::IS_LARGE {
        DataType::LargeBinary
    } else {
        DataType::Binary
    };

    pub fn data_type(&self) -> DataType {
        Self::DATA_TYPE
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

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

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index < self.len() && self.is_valid(index) {
            Some(&self.values[self.offsets.range(index)])
        } else {
            None
        }
    }

    pub fn offsets(&self) -> Vec<O> {
        self.offsets.to_raw()
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<&[u8]>> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }
}

/// # Panics
/// Panics when the total byte length does not fit the offset width; use
/// [`GenericBinaryArray::try_from_iter`] to handle that case.
impl<O: Offset, B: AsRef<[u8]>> FromIterator<Option<B>> for GenericBinaryArray<O> {
    fn from_iter<I: IntoIterator<Item = Option<B>>>(iter: I) -> Self {
        match Self::try_from_iter(iter) {
            Ok(array) => array,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<O: Offset> PartialEq for GenericBinaryArray<O> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<O: Offset> Display for GenericBinaryArray<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::DATA_TYPE)?;
        write_values(f, self.iter(), |f, v| {
            f.write_str("0x")?;
            v.iter().try_for_each(|b| write!(f, "{b:02x}"))
        })
    }
}

/// Immutable, null-aware sequence of UTF-8 strings.
#[derive(Debug, Clone)]
pub struct GenericStringArray<O: Offset> {
    offsets: Offsets,
    values: String,
    validity: Option<Bitmap>,
    _offset: std::marker::PhantomData<O>,
}

pub type StringArray = GenericStringArray<i32>;
pub type LargeStringArray = GenericStringArray<i64>;

impl<O: Offset> GenericStringArray<O> {
    /// Builds an array from raw offsets, UTF-8 value bytes and optional
    /// validity. Every offset must fall on a character boundary.
    pub fn try_new(
        offsets: &[O],
        values: Vec<u8>,
        validity: Option<Bitmap>,
    ) -> Result<Self, ArrayError> {
        let values = String::from_utf8(values)?;
        let offsets = Offsets::try_from_raw(offsets, values.len(), Self::DATA_TYPE)?;
        if let Some(i) = offsets.starts.iter().position(|s| !values.is_char_boundary(*s)) {
            return Err(ArrayError::InvalidOffsets {
                data_type: Self::DATA_TYPE,
                detail: format!("offset {i} splits a character"),
            });
        }
        check_validity(offsets.len(), &validity)?;
        Ok(Self {
            offsets,
            values,
            validity: validity.and_then(Bitmap::into_validity),
            _offset: std::marker::PhantomData,
        })
    }

    /// Builds an array from optional strings.
    ///
    /// Fails with [`ArrayError::OffsetOverflow`] when the total byte length
    /// does not fit the offset width.
    pub fn try_from_iter<I, S>(iter: I) -> Result<Self, ArrayError>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let iter = iter.into_iter();
        let capacity = iter.size_hint().0;
        let mut offsets = Offsets::with_capacity(capacity);
        let mut values = Vec::new();
        let mut validity = Bitmap::with_capacity(capacity);
        for item in iter {
            validity.push(item.is_some());
            let text = item.as_ref().map_or("", |s| s.as_ref());
            push_value::<O>(&mut offsets, &mut values, text.as_bytes(), || {
                Self::DATA_TYPE
            })?;
        }
        Ok(Self {
            offsets,
            // Concatenation of `&str`s.
            values: String::from_utf8(values)?,
            validity: validity.into_validity(),
            _offset: std::marker::PhantomData,
        })
    }

    const DATA_TYPE: DataType = if O::IS_LARGE {
        DataType::LargeUtf8
    } else {
        DataType::Utf8
    };

    pub fn data_type(&self) -> DataType {
        Self::DATA_TYPE
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

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

    pub fn get(&self, index: usize) -> Option<&str> {
        if index < self.len() && self.is_valid(index) {
            Some(&self.values[self.offsets.range(index)])
        } else {
            None
        }
    }

    pub fn offsets(&self) -> Vec<O> {
        self.offsets.to_raw()
    }

    pub fn values(&self) -> &str {
        &self.values
    }

    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<&str>> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }
}

/// # Panics
/// Panics when the total byte length does not fit the offset width; use
/// [`GenericStringArray::try_from_iter`] to handle that case.
impl<O: Offset, S: AsRef<str>> FromIterator<Option<S>> for GenericStringArray<O> {
    fn from_iter<I: IntoIterator<Item = Option<S>>>(iter: I) -> Self {
        match Self::try_from_iter(iter) {
            Ok(array) => array,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<O: Offset> PartialEq for GenericStringArray<O> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<O: Offset> Display for GenericStringArray<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::DATA_TYPE)?;
        write_values(f, self.iter(), |f, v| write!(f, "{v:?}"))
    }
}
