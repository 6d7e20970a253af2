//! Codec-independent core types for `chunkio`.
//!
//! This crate provides the closed logical type set ([`DataType`]), the
//! [`Field`] / [`Schema`] model, immutable null-aware arrays (one variant per
//! logical type, unified by [`Array`]) and [`Chunk`], the equal-length column
//! grouping that readers and writers exchange. [`ReaderState`] is the
//! lifecycle shared by every chunk reader.
//!
//! Date, time and timestamp arrays store plain integers; the [`temporal`]
//! module converts between those integers and calendar values.

mod array;
mod bitmap;
mod chunk;
mod datatype;
mod error;
mod schema;
mod state;
pub mod temporal;

pub use array::{
    Array, BinaryArray, BooleanArray, DateArray, Float32Array, Float64Array, GenericBinaryArray,
    GenericStringArray, Int8Array, Int16Array, Int32Array, Int64Array, LargeBinaryArray,
    LargeStringArray, NativeType, Offset, PrimitiveArray, StringArray, TimeArray, TimestampArray,
    UInt8Array, UInt16Array, UInt32Array, UInt64Array,
};
pub use bitmap::Bitmap;
pub use chunk::Chunk;
pub use datatype::{DataType, TimeUnit};
pub use error::{ArrayError, SchemaError};
pub use schema::{Field, Schema, format_fields};
pub use state::ReaderState;
pub use temporal::{TimestampValue, Timezone};
