//! Date, time and timestamp arrays.
//!
//! Each wraps a plain integer array; the temporal codec is applied only when
//! values enter (construction) or leave (iteration) the array.

use std::fmt::{self, Display, Formatter};

use chrono::{NaiveDate, NaiveTime};

use crate::temporal::{self, TimestampValue, Timezone};
use crate::{ArrayError, Bitmap, DataType, Int32Array, Int64Array, TimeUnit};

use super::write_values;

/// Rejects stored integers that do not decode, so iteration never fails.
fn check_decodable<T: crate::NativeType + Into<i64>, R>(
    raw: &crate::PrimitiveArray<T>,
    data_type: &DataType,
    decode: impl Fn(T) -> Option<R>,
) -> Result<(), ArrayError> {
    for (index, value) in raw.iter().enumerate() {
        if let Some(value) = value {
            if decode(value).is_none() {
                return Err(ArrayError::OutOfRange {
                    index,
                    value: value.into(),
                    data_type: data_type.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Calendar dates stored as `i32` days since 1970-01-01.
#[derive(Debug, Clone, PartialEq)]
pub struct DateArray {
    days: Int32Array,
}

impl DateArray {
    /// Wraps raw day offsets, checking each maps to a calendar date.
    pub fn try_from_days(days: Int32Array) -> Result<Self, ArrayError> {
        check_decodable(&days, &DataType::Date32, temporal::decode_date)?;
        Ok(Self { days })
    }

    pub fn data_type(&self) -> DataType {
        DataType::Date32
    }

    pub fn days(&self) -> &Int32Array {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.days.is_null(index)
    }

    pub fn null_count(&self) -> usize {
        self.days.null_count()
    }

    pub fn validity(&self) -> Option<&Bitmap> {
        self.days.validity()
    }

    pub fn get(&self, index: usize) -> Option<NaiveDate> {
        self.days.get(index).and_then(temporal::decode_date)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<NaiveDate>> + '_ {
        self.days.iter().map(|v| v.and_then(temporal::decode_date))
    }
}

impl FromIterator<Option<NaiveDate>> for DateArray {
    fn from_iter<I: IntoIterator<Item = Option<NaiveDate>>>(iter: I) -> Self {
        Self {
            days: iter
                .into_iter()
                .map(|v| v.map(temporal::encode_date))
                .collect(),
        }
    }
}

impl Display for DateArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Date32")?;
        write_values(f, self.iter(), |f, v| write!(f, "{v}"))
    }
}

/// Naive wall-clock times stored as `i64` microseconds since midnight.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeArray {
    micros: Int64Array,
}

impl TimeArray {
    /// Wraps raw microsecond offsets, checking each lies within one day.
    pub fn try_from_micros(micros: Int64Array) -> Result<Self, ArrayError> {
        check_decodable(&micros, &DataType::Time64, temporal::decode_time)?;
        Ok(Self { micros })
    }

    pub fn data_type(&self) -> DataType {
        DataType::Time64
    }

    pub fn micros(&self) -> &Int64Array {
        &self.micros
    }

    pub fn len(&self) -> usize {
        self.micros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.micros.is_empty()
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.micros.is_null(index)
    }

    pub fn null_count(&self) -> usize {
        self.micros.null_count()
    }

    pub fn validity(&self) -> Option<&Bitmap> {
        self.micros.validity()
    }

    pub fn get(&self, index: usize) -> Option<NaiveTime> {
        self.micros.get(index).and_then(temporal::decode_time)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<NaiveTime>> + '_ {
        self.micros.iter().map(|v| v.and_then(temporal::decode_time))
    }
}

impl FromIterator<Option<NaiveTime>> for TimeArray {
    fn from_iter<I: IntoIterator<Item = Option<NaiveTime>>>(iter: I) -> Self {
        Self {
            micros: iter
                .into_iter()
                .map(|v| v.map(temporal::encode_time))
                .collect(),
        }
    }
}

impl Display for TimeArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Time64")?;
        write_values(f, self.iter(), |f, v| write!(f, "{v}"))
    }
}

/// Datetimes stored as `i64` counts of a [`TimeUnit`] since the epoch, all
/// sharing one optional [`Timezone`].
#[derive(Debug, Clone)]
pub struct TimestampArray {
    values: Int64Array,
    unit: TimeUnit,
    timezone: Option<Timezone>,
}

impl TimestampArray {
    /// Builds an array with an explicit unit and timezone.
    ///
    /// Every non-null value must be zoned with `timezone`'s offset at its
    /// instant, or naive when `timezone` is `None`; otherwise this fails with
    /// [`ArrayError::TimezoneMismatch`].
    pub fn try_new<I>(values: I, unit: TimeUnit, timezone: Option<&str>) -> Result<Self, ArrayError>
    where
        I: IntoIterator<Item = Option<TimestampValue>>,
    {
        let timezone = timezone.map(Timezone::parse).transpose()?;
        Self::encode_all(values.into_iter(), unit, timezone)
    }

    /// Builds an array whose timezone is taken from the first non-null value:
    /// none for a naive value, its offset (`±HH:MM`) for a zoned one.
    pub fn try_from_values<I>(values: I, unit: TimeUnit) -> Result<Self, ArrayError>
    where
        I: IntoIterator<Item = Option<TimestampValue>>,
    {
        let mut values = values.into_iter().peekable();
        let mut leading_nulls = 0usize;
        while values.next_if(Option::is_none).is_some() {
            leading_nulls += 1;
        }
        let timezone = match values.peek() {
            Some(Some(value)) => value.offset().map(Timezone::fixed),
            _ => None,
        };
        let values = std::iter::repeat_n(None, leading_nulls).chain(values);
        Self::encode_all(values, unit, timezone)
    }

    fn encode_all(
        values: impl Iterator<Item = Option<TimestampValue>>,
        unit: TimeUnit,
        timezone: Option<Timezone>,
    ) -> Result<Self, ArrayError> {
        let values = values
            .enumerate()
            .map(|(index, value)| {
                value
                    .map(|v| v.encode(index, unit, timezone.as_ref()))
                    .transpose()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            values: values.into_iter().collect(),
            unit,
            timezone,
        })
    }

    /// Wraps raw counts of `unit`, checking each maps to a calendar instant.
    pub fn try_from_raw(
        values: Int64Array,
        unit: TimeUnit,
        timezone: Option<&str>,
    ) -> Result<Self, ArrayError> {
        let timezone = timezone.map(Timezone::parse).transpose()?;
        let data_type = DataType::timestamp(unit, timezone.as_ref().map(Timezone::name));
        check_decodable(&values, &data_type, |v| temporal::decode_timestamp(v, unit))?;
        Ok(Self {
            values,
            unit,
            timezone,
        })
    }

    pub fn data_type(&self) -> DataType {
        DataType::timestamp(self.unit, self.timezone())
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_ref().map(Timezone::name)
    }

    /// The stored integers.
    pub fn raw(&self) -> &Int64Array {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.values.is_null(index)
    }

    pub fn null_count(&self) -> usize {
        self.values.null_count()
    }

    pub fn validity(&self) -> Option<&Bitmap> {
        self.values.validity()
    }

    pub fn get(&self, index: usize) -> Option<TimestampValue> {
        self.values
            .get(index)
            .and_then(|v| TimestampValue::decode(v, self.unit, self.timezone.as_ref()))
    }

    /// Yields each element with the array's timezone reattached.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<TimestampValue>> + '_ {
        self.values
            .iter()
            .map(|v| v.and_then(|v| TimestampValue::decode(v, self.unit, self.timezone.as_ref())))
    }
}

impl PartialEq for TimestampArray {
    fn eq(&self, other: &Self) -> bool {
        self.data_type() == other.data_type() && self.values == other.values
    }
}

impl Display for TimestampArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data_type())?;
        write_values(f, self.iter(), |f, v| write!(f, "{v}"))
    }
}
