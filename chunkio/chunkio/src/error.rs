//! Error types for the stream readers and writers.

use std::io;

use arrow::error::ArrowError;
use chunkio_arrow::ConvertError;
use chunkio_core::{ArrayError, SchemaError};
use parquet::errors::ParquetError;

/// Errors produced by the IPC and Parquet readers and writers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A chunk does not conform to the writer's schema; nothing was written.
    #[error(transparent)]
    TypeMismatch(#[from] SchemaError),

    /// An array or chunk could not be constructed.
    #[error(transparent)]
    Construction(#[from] ArrayError),

    /// The source is malformed or truncated, or holds a type chunkio does not
    /// support.
    #[error("decode failed: {0}")]
    Decode(#[source] CodecError),

    /// The codec engine rejected a batch or the footer.
    #[error("encode failed: {0}")]
    Encode(#[source] CodecError),

    /// I/O error on the underlying file, source or sink.
    #[error(transparent)]
    Resource(#[from] io::Error),

    /// An earlier encode failure left the sink in an unknown state.
    #[error("writer is poisoned by an earlier encode failure")]
    Poisoned,

    /// The writer has already written its footer.
    #[error("writer is already finished")]
    Finished,
}

/// Failure reported by the codec engine or the Arrow adapter.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Arrow(ArrowError),
    #[error(transparent)]
    Parquet(ParquetError),
    #[error(transparent)]
    Convert(ConvertError),
    /// The source ended early or a recorded offset points outside it.
    #[error("truncated source: {0}")]
    Truncated(io::Error),
}

impl Error {
    pub(crate) fn decode(err: impl Into<Error>) -> Self {
        match err.into() {
            Error::Encode(e) => Error::Decode(e),
            Error::Construction(e) => Error::Decode(CodecError::Convert(ConvertError::Array(e))),
            Error::Resource(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidInput
                ) =>
            {
                Error::Decode(CodecError::Truncated(e))
            }
            other => other,
        }
    }
}

// Codec errors default to `Encode`; readers go through `Error::decode`.
// I/O failures surface as `Resource` whichever layer reports them.

impl From<ArrowError> for Error {
    fn from(err: ArrowError) -> Self {
        match err {
            ArrowError::IoError(_, source) => Error::Resource(source),
            other => Error::Encode(CodecError::Arrow(other)),
        }
    }
}

impl From<ParquetError> for Error {
    fn from(err: ParquetError) -> Self {
        match err {
            ParquetError::External(source) => match source.downcast::<io::Error>() {
                Ok(io) => Error::Resource(*io),
                Err(source) => Error::Encode(CodecError::Parquet(ParquetError::External(source))),
            },
            other => Error::Encode(CodecError::Parquet(other)),
        }
    }
}

impl From<ConvertError> for Error {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::Array(e) => Error::Construction(e),
            ConvertError::Arrow(e) => Error::from(e),
            other => Error::Encode(CodecError::Convert(other)),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
