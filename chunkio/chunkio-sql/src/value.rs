//! Dynamically typed cell values exchanged with a SQL driver.

use std::borrow::Cow;

use crate::error::ValueTypeError;

/// One cell of a result row or one bound parameter.
///
/// The variants are the storage classes a SQL driver hands back; the
/// `try_*` accessors coerce them to the physical type of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn try_i64(&self) -> Result<Option<i64>, ValueTypeError> {
        match self {
            SqlValue::Integer(v) => Ok(Some(*v)),
            SqlValue::Null => Ok(None),
            _ => Err(self.type_mismatch("integer")),
        }
    }

    /// Integer cells are widened.
    pub fn try_f64(&self) -> Result<Option<f64>, ValueTypeError> {
        match self {
            SqlValue::Real(v) => Ok(Some(*v)),
            SqlValue::Integer(v) => Ok(Some(*v as f64)),
            SqlValue::Null => Ok(None),
            _ => Err(self.type_mismatch("real")),
        }
    }

    /// Any non-zero integer is `true`.
    pub fn try_bool(&self) -> Result<Option<bool>, ValueTypeError> {
        match self {
            SqlValue::Integer(v) => Ok(Some(*v != 0)),
            SqlValue::Null => Ok(None),
            _ => Err(self.type_mismatch("boolean")),
        }
    }

    /// Numbers are rendered in their shortest decimal form; blobs must be
    /// valid UTF-8.
    pub fn try_text(&self) -> Result<Option<Cow<'_, str>>, ValueTypeError> {
        match self {
            SqlValue::Text(v) => Ok(Some(Cow::Borrowed(v))),
            SqlValue::Integer(v) => Ok(Some(Cow::Owned(v.to_string()))),
            SqlValue::Real(v) => Ok(Some(Cow::Owned(v.to_string()))),
            SqlValue::Blob(v) => std::str::from_utf8(v)
                .map(|s| Some(Cow::Borrowed(s)))
                .map_err(|_| self.type_mismatch("text")),
            SqlValue::Null => Ok(None),
        }
    }

    pub fn try_blob(&self) -> Result<Option<&[u8]>, ValueTypeError> {
        match self {
            SqlValue::Blob(v) => Ok(Some(v)),
            SqlValue::Text(v) => Ok(Some(v.as_bytes())),
            SqlValue::Null => Ok(None),
            _ => Err(self.type_mismatch("blob")),
        }
    }

    pub fn type_mismatch(&self, expected: impl Into<String>) -> ValueTypeError {
        ValueTypeError::new(expected, self.storage_class())
    }

    pub fn storage_class(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Integer(_) => "integer",
            SqlValue::Real(_) => "real",
            SqlValue::Text(_) => "text",
            SqlValue::Blob(_) => "blob",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}
