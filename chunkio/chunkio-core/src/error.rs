//! Error types for array construction and schema conformance.

use crate::{DataType, TimeUnit};

/// Error raised while constructing an array or chunk.
///
/// No array or chunk exists when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArrayError {
    /// Arrays passed to a chunk do not share one length.
    #[error("chunk column {index} has length {actual}, expected {expected}")]
    ChunkLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// A validity bitmap does not cover exactly the values it describes.
    #[error("validity bitmap has {validity_len} bits for {len} values")]
    ValidityLengthMismatch { len: usize, validity_len: usize },

    /// Offsets of a string or binary array are malformed.
    #[error("invalid offsets for {data_type}: {detail}")]
    InvalidOffsets { data_type: DataType, detail: String },

    /// Total byte length does not fit the offset width of the array.
    #[error("{data_type} values exceed {max} bytes, use the large variant")]
    OffsetOverflow { data_type: DataType, max: usize },

    /// String data is not valid UTF-8.
    #[error("string array contains invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A timestamp element is not expressed in the array's timezone.
    #[error("timestamp at position {index} is in '{found}', array timezone is '{expected}'")]
    TimezoneMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    /// A timezone string is neither a fixed offset nor a known IANA name.
    #[error("invalid timezone '{0}'")]
    InvalidTimezone(String),

    /// A calendar value does not fit the integer representation at the unit.
    #[error("timestamp at position {index} overflows i64 at unit {unit}")]
    TimestampOverflow { index: usize, unit: TimeUnit },

    /// A stored integer does not correspond to a calendar value.
    #[error("value {value} at position {index} is out of range for {data_type}")]
    OutOfRange {
        index: usize,
        value: i64,
        data_type: DataType,
    },
}

/// Error raised when a chunk does not conform to a schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("chunk has {actual} columns, schema has {expected}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("column {index} ('{name}') has type {actual}, schema expects {expected}")]
    ColumnType {
        index: usize,
        name: String,
        expected: DataType,
        actual: DataType,
    },

    #[error("column {index} ('{name}') is not nullable but contains {null_count} nulls")]
    NullInNonNullable {
        index: usize,
        name: String,
        null_count: usize,
    },
}
