//! Arrow integration layer for `chunkio`.
//!
//! This crate is the only place where the chunkio data model meets the Arrow
//! in-memory format used by the IPC and Parquet codecs:
//! 1. Convert a chunkio `Schema` to and from an Arrow `Schema`.
//! 2. Convert a `Chunk` to and from an Arrow `RecordBatch`.
//!
//! Arrow to chunkio dispatch is an explicit match over the Arrow type tag;
//! tags outside the chunkio type set (nested, dictionary, decimal, ...) are
//! rejected with [`ConvertError::UnsupportedType`].
//!
//! # Typical Flow
//! ```rust
//! use std::sync::Arc;
//!
//! use chunkio_arrow::{chunk_to_record_batch, record_batch_to_chunk, schema_to_arrow};
//! use chunkio_core::{Array, Chunk, DataType, Field, Schema, UInt32Array};
//!
//! let schema = Schema::new(vec![Field::new("c0", DataType::UInt32, true)]);
//! let chunk = Chunk::try_new([Array::from(UInt32Array::from(vec![Some(1), None]))]).unwrap();
//!
//! let batch = chunk_to_record_batch(&Arc::new(schema_to_arrow(&schema)), &chunk).unwrap();
//! assert_eq!(record_batch_to_chunk(&schema, &batch).unwrap(), chunk);
//! ```
pub mod array_convert;
pub mod error;
pub mod schema_convert;

pub use array_convert::{
    array_from_arrow, array_to_arrow, chunk_to_record_batch, record_batch_to_chunk,
};
pub use error::ConvertError;
pub use schema_convert::{
    datatype_from_arrow, datatype_to_arrow, field_from_arrow, field_to_arrow, schema_from_arrow,
    schema_to_arrow,
};
