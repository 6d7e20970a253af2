//! Error types for the SQL bridge.

use chunkio_core::{ArrayError, DataType};

/// Errors produced by [`SqlConnector`](crate::SqlConnector) and
/// [`ChunkCursor`](crate::ChunkCursor).
#[derive(Debug, thiserror::Error)]
pub enum SqlError {
    /// The connection could not be opened, or the driver rejected a statement.
    #[error("database driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The statement's parameters do not line up with the chunk's columns;
    /// nothing was written.
    #[error("statement has {parameters} parameters, chunk has {columns} columns")]
    TypeMismatch { parameters: usize, columns: usize },

    /// A result batch could not be assembled into arrays.
    #[error(transparent)]
    Construction(#[from] ArrayError),

    /// A cell cannot be represented in its column's type.
    #[error("row {row}, column '{column}' ({data_type}): {source}")]
    Conversion {
        row: usize,
        column: String,
        data_type: DataType,
        #[source]
        source: ValueTypeError,
    },

    /// The statement returns rows but no batch size was given.
    #[error("statement returns rows, a batch size is required")]
    BatchSizeRequired,

    #[error("batch size must be at least 1")]
    InvalidBatchSize,
}

impl SqlError {
    pub(crate) fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        SqlError::Driver(Box::new(err))
    }
}

/// A cell holds a value that does not fit the requested type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected {expected}, found {actual}")]
pub struct ValueTypeError {
    pub expected: String,
    pub actual: String,
}

impl ValueTypeError {
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

pub type Result<T, E = SqlError> = std::result::Result<T, E>;
