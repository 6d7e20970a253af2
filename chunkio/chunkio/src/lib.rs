//! Streaming readers and writers for typed, null-aware chunks.
//!
//! Two file formats are supported, both through the same lifecycle:
//! - Arrow IPC files ([`IpcReader`] / [`IpcWriter`]), one record batch per chunk;
//! - Parquet files ([`ParquetReader`] / [`ParquetWriter`]), one row group per
//!   chunk.
//!
//! Readers expose the file's [`Schema`] once opened and then yield
//! `Result<Chunk>` lazily, in file order. A decode error is yielded once and
//! ends the iteration.
//!
//! Writers fix their schema at construction, write the header immediately,
//! check every chunk against the schema before encoding it, and write the
//! footer on [`IpcWriter::finish`] / [`ParquetWriter::finish`] or when dropped.
//!
//! The data model is re-exported from [`chunkio_core`].
mod error;
mod ipc;
mod options;
mod parquet_file;

pub use chunkio_arrow as arrow;
pub use chunkio_core::*;
pub use error::{CodecError, Error, Result};
pub use ipc::{IpcReader, IpcWriter};
pub use options::{IpcCompression, IpcWriteOptions, ParquetCompression, ParquetWriteOptions};
pub use parquet_file::{ParquetReader, ParquetWriter, TableSource};
