use arrow::{datatypes::DataType as ArrowDataType, error::ArrowError};
use chunkio_core::{ArrayError, DataType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported Arrow data type: {0}")]
    UnsupportedType(ArrowDataType),
    #[error("record batch has {actual} columns, schema has {expected}")]
    ColumnCount { expected: usize, actual: usize },
    #[error("column {index} decoded as {actual}, schema declares {expected}")]
    ColumnType {
        index: usize,
        expected: DataType,
        actual: DataType,
    },
    #[error(transparent)]
    Array(#[from] ArrayError),
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}
