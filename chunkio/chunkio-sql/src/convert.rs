//! Conversion between chunk columns and rows of [`SqlValue`]s.
//!
//! Dates, times and timestamps travel as ISO-8601 text: `YYYY-MM-DD`,
//! `HH:MM:SS[.ffffff]` and `YYYY-MM-DDTHH:MM:SS[.ffffff][±HH:MM]`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use chunkio_core::{
    Array, BinaryArray, BooleanArray, Chunk, DataType, DateArray, Field, Float32Array,
    Float64Array, Int8Array, Int16Array, Int32Array, Int64Array, LargeBinaryArray,
    LargeStringArray, NativeType, PrimitiveArray, StringArray, TimeArray, TimestampArray,
    TimestampValue, UInt8Array, UInt16Array, UInt32Array, UInt64Array,
};

use crate::{
    error::{Result, SqlError, ValueTypeError},
    value::SqlValue,
};

// ---------------------------------------------------------------------------
// Chunk -> rows
// ---------------------------------------------------------------------------

/// Transposes `chunk` into one parameter row per chunk row.
///
/// Conversion errors name the column by its parameter position (`?1`, ...).
pub fn chunk_to_rows(chunk: &Chunk) -> Result<Vec<Vec<SqlValue>>> {
    let mut rows = vec![Vec::with_capacity(chunk.num_columns()); chunk.len()];
    for (index, array) in chunk.arrays().iter().enumerate() {
        let name = format!("?{}", index + 1);
        for (row, value) in rows.iter_mut().zip(array_to_values(&name, array)?) {
            row.push(value);
        }
    }
    Ok(rows)
}

fn integers<T: NativeType + Into<i64>>(array: &PrimitiveArray<T>) -> Vec<SqlValue> {
    array.iter().map(|v| v.map(Into::<i64>::into).into()).collect()
}

fn array_to_values(name: &str, array: &Array) -> Result<Vec<SqlValue>> {
    let values: Vec<SqlValue> = match array {
        Array::Boolean(a) => a.iter().map(|v| v.map(i64::from).into()).collect(),
        Array::Int8(a) => integers(a),
        Array::Int16(a) => integers(a),
        Array::Int32(a) => integers(a),
        Array::Int64(a) => integers(a),
        Array::UInt8(a) => integers(a),
        Array::UInt16(a) => integers(a),
        Array::UInt32(a) => integers(a),
        Array::UInt64(a) => a
            .iter()
            .enumerate()
            .map(|(row, v)| match v {
                None => Ok(SqlValue::Null),
                Some(v) => i64::try_from(v).map(SqlValue::Integer).map_err(|_| {
                    SqlError::Conversion {
                        row,
                        column: name.to_string(),
                        data_type: DataType::UInt64,
                        source: ValueTypeError::new("integer", format!("unsigned {v}")),
                    }
                }),
            })
            .collect::<Result<_>>()?,
        Array::Float32(a) => a.iter().map(|v| v.map(f64::from).into()).collect(),
        Array::Float64(a) => a.iter().map(SqlValue::from).collect(),
        Array::Utf8(a) => a.iter().map(SqlValue::from).collect(),
        Array::LargeUtf8(a) => a.iter().map(SqlValue::from).collect(),
        Array::Binary(a) => a.iter().map(|v| v.map(<[u8]>::to_vec).into()).collect(),
        Array::LargeBinary(a) => a.iter().map(|v| v.map(<[u8]>::to_vec).into()).collect(),
        Array::Timestamp(a) => a.iter().map(|v| v.map(|v| v.to_string()).into()).collect(),
        Array::Date32(a) => a.iter().map(|v| v.map(|v| v.to_string()).into()).collect(),
        Array::Time64(a) => a.iter().map(|v| v.map(|v| v.to_string()).into()).collect(),
    };
    Ok(values)
}

// ---------------------------------------------------------------------------
// Rows -> chunk
// ---------------------------------------------------------------------------

/// Builds one chunk from result rows, column `i` typed by `fields[i]`.
pub fn rows_to_chunk(fields: &[Field], rows: &[Vec<SqlValue>]) -> Result<Chunk> {
    let arrays = fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let column = rows
                .iter()
                .map(|row| row.get(index).unwrap_or(&SqlValue::Null));
            column_to_array(field, column)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Chunk::try_new(arrays)?)
}

/// Converts each cell with `f`, tagging failures with their position.
fn cells<'a, T>(
    field: &Field,
    column: impl Iterator<Item = &'a SqlValue>,
    f: impl Fn(&'a SqlValue) -> Result<Option<T>, ValueTypeError>,
) -> Result<Vec<Option<T>>> {
    column
        .enumerate()
        .map(|(row, value)| {
            f(value).map_err(|source| SqlError::Conversion {
                row,
                column: field.name().to_string(),
                data_type: field.data_type().clone(),
                source,
            })
        })
        .collect()
}

fn narrow<T: TryFrom<i64>>(value: &SqlValue) -> Result<Option<T>, ValueTypeError> {
    value
        .try_i64()?
        .map(|v| T::try_from(v).map_err(|_| ValueTypeError::new("smaller integer", v.to_string())))
        .transpose()
}

/// Accepts only doubles that survive the round trip through `f32`.
fn narrow_f32(value: &SqlValue) -> Result<Option<f32>, ValueTypeError> {
    value
        .try_f64()?
        .map(|v| {
            let narrowed = v as f32;
            if f64::from(narrowed) == v || v.is_nan() {
                Ok(narrowed)
            } else {
                Err(ValueTypeError::new("single-precision float", v.to_string()))
            }
        })
        .transpose()
}

fn parse_text<T>(
    value: &SqlValue,
    expected: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ValueTypeError> {
    match value {
        SqlValue::Null => Ok(None),
        SqlValue::Text(s) => parse(s.trim())
            .map(Some)
            .ok_or_else(|| ValueTypeError::new(expected, format!("text '{s}'"))),
        other => Err(other.type_mismatch(expected)),
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn timestamp_cell(value: &SqlValue) -> Result<Option<TimestampValue>, ValueTypeError> {
    // Integers are read as Unix seconds.
    if let SqlValue::Integer(secs) = value {
        return DateTime::from_timestamp(*secs, 0)
            .map(|dt| Some(dt.naive_utc().into()))
            .ok_or_else(|| ValueTypeError::new("timestamp", format!("integer {secs}")));
    }
    parse_text(value, "timestamp", parse_datetime).map(|v| v.map(TimestampValue::from))
}

fn column_to_array<'a>(
    field: &Field,
    column: impl Iterator<Item = &'a SqlValue>,
) -> Result<Array> {
    let array: Array = match field.data_type() {
        DataType::Boolean => {
            BooleanArray::from(cells(field, column, SqlValue::try_bool)?).into()
        }
        DataType::Int8 => Int8Array::from(cells(field, column, narrow::<i8>)?).into(),
        DataType::Int16 => Int16Array::from(cells(field, column, narrow::<i16>)?).into(),
        DataType::Int32 => Int32Array::from(cells(field, column, narrow::<i32>)?).into(),
        DataType::Int64 => Int64Array::from(cells(field, column, SqlValue::try_i64)?).into(),
        DataType::UInt8 => UInt8Array::from(cells(field, column, narrow::<u8>)?).into(),
        DataType::UInt16 => UInt16Array::from(cells(field, column, narrow::<u16>)?).into(),
        DataType::UInt32 => UInt32Array::from(cells(field, column, narrow::<u32>)?).into(),
        DataType::UInt64 => UInt64Array::from(cells(field, column, narrow::<u64>)?).into(),
        DataType::Float32 => Float32Array::from(cells(field, column, narrow_f32)?).into(),
        DataType::Float64 => Float64Array::from(cells(field, column, SqlValue::try_f64)?).into(),
        DataType::Utf8 => {
            StringArray::try_from_iter(cells(field, column, SqlValue::try_text)?)?.into()
        }
        DataType::LargeUtf8 => {
            LargeStringArray::try_from_iter(cells(field, column, SqlValue::try_text)?)?.into()
        }
        DataType::Binary => {
            BinaryArray::try_from_iter(cells(field, column, SqlValue::try_blob)?)?.into()
        }
        DataType::LargeBinary => {
            LargeBinaryArray::try_from_iter(cells(field, column, SqlValue::try_blob)?)?.into()
        }
        DataType::Date32 => DateArray::from_iter(cells(field, column, |v| {
            parse_text(v, "date", |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        })?)
        .into(),
        DataType::Time64 => TimeArray::from_iter(cells(field, column, |v| {
            parse_text(v, "time", |s| NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok())
        })?)
        .into(),
        DataType::Timestamp(unit, timezone) => {
            let values = cells(field, column, timestamp_cell)?;
            let naive = TimestampArray::try_new(values, *unit, None)?;
            match timezone {
                None => naive.into(),
                // Cells are read as UTC; reattach the zone to the same instants.
                Some(tz) => {
                    TimestampArray::try_from_raw(naive.raw().clone(), *unit, Some(tz.as_str()))?
                        .into()
                }
            }
        }
    };
    Ok(array)
}
