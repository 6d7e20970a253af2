//! Arrow IPC file format: one record batch per chunk.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek, Write},
    path::Path,
    sync::Arc,
};

use arrow::{
    datatypes::SchemaRef,
    ipc::{
        CompressionType,
        reader::FileReader,
        writer::{FileWriter, IpcWriteOptions as ArrowIpcWriteOptions},
    },
};
use chunkio_arrow::{
    chunk_to_record_batch, record_batch_to_chunk, schema_from_arrow, schema_to_arrow,
};
use chunkio_core::{Chunk, ReaderState, Schema};

use crate::{
    error::{Error, Result},
    options::{IpcCompression, IpcWriteOptions},
};

/// Reads the record batches of an Arrow IPC file as chunks, in file order.
pub struct IpcReader<R: Read + Seek = BufReader<File>> {
    inner: FileReader<R>,
    schema: Schema,
    state: ReaderState,
}

impl IpcReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("open IPC file: {}", path.display());
        Self::try_new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> IpcReader<R> {
    /// Reads the footer and schema of an IPC file held by `source`.
    pub fn try_new(source: R) -> Result<Self> {
        let inner = FileReader::try_new(source, None).map_err(Error::decode)?;
        let schema = schema_from_arrow(&inner.schema()).map_err(Error::decode)?;
        tracing::debug!(
            "IPC reader opened: {} columns, {} batches",
            schema.len(),
            inner.num_batches()
        );
        Ok(Self {
            inner,
            schema,
            state: ReaderState::Opened,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of record batches recorded in the footer.
    pub fn num_batches(&self) -> usize {
        self.inner.num_batches()
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    fn read_next(&mut self) -> Option<Result<Chunk>> {
        let batch = match self.inner.next()? {
            Ok(batch) => batch,
            Err(e) => return Some(Err(Error::decode(e))),
        };
        tracing::trace!("IPC batch decoded: {} rows", batch.num_rows());
        Some(record_batch_to_chunk(&self.schema, &batch).map_err(Error::decode))
    }
}

impl<R: Read + Seek> Iterator for IpcReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.is_done() {
            return None;
        }
        let next = self.read_next();
        self.state.advance(next)
    }
}

/// Writes chunks as record batches of an Arrow IPC file.
///
/// The header is written on construction and the footer by
/// [`finish`](IpcWriter::finish), or on drop when `finish` was never called.
/// A failed encode poisons the writer and the footer is never written.
pub struct IpcWriter<W: Write = BufWriter<File>> {
    inner: Option<FileWriter<W>>,
    schema: Schema,
    arrow_schema: SchemaRef,
    poisoned: bool,
}

impl IpcWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and writes the header.
    pub fn create(
        path: impl AsRef<Path>,
        schema: Schema,
        options: IpcWriteOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("create IPC file: {}", path.display());
        Self::try_new(BufWriter::new(File::create(path)?), schema, options)
    }
}

impl<W: Write> IpcWriter<W> {
    pub fn try_new(sink: W, schema: Schema, options: IpcWriteOptions) -> Result<Self> {
        let arrow_schema = Arc::new(schema_to_arrow(&schema));
        let compression = match options.compression() {
            IpcCompression::None => None,
            IpcCompression::Lz4Frame => Some(CompressionType::LZ4_FRAME),
            IpcCompression::Zstd => Some(CompressionType::ZSTD),
        };
        let arrow_options = ArrowIpcWriteOptions::default().try_with_compression(compression)?;
        let inner = FileWriter::try_new_with_options(sink, &arrow_schema, arrow_options)?;
        tracing::debug!(
            "IPC writer opened: {} columns, compression {}",
            schema.len(),
            options.compression()
        );
        Ok(Self {
            inner: Some(inner),
            schema,
            arrow_schema,
            poisoned: false,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Appends `chunk` as one record batch.
    ///
    /// A chunk that does not conform to the schema fails with
    /// [`Error::TypeMismatch`] before anything is written.
    pub fn write(&mut self, chunk: &Chunk) -> Result<()> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        self.schema.check_chunk(chunk)?;
        let batch = chunk_to_record_batch(&self.arrow_schema, chunk)?;
        let inner = self.inner.as_mut().ok_or(Error::Finished)?;
        if let Err(e) = inner.write(&batch) {
            self.poisoned = true;
            return Err(e.into());
        }
        tracing::trace!("IPC batch written: {} rows", chunk.len());
        Ok(())
    }

    /// Writes the footer, flushes and returns the sink.
    pub fn finish(mut self) -> Result<W> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        let inner = self.inner.take().ok_or(Error::Finished)?;
        let mut sink = inner.into_inner()?;
        sink.flush()?;
        tracing::debug!("IPC writer finished");
        Ok(sink)
    }
}

impl<W: Write> Drop for IpcWriter<W> {
    fn drop(&mut self) {
        let Some(mut inner) = self.inner.take() else {
            return;
        };
        if self.poisoned {
            return;
        }
        let result = inner
            .finish()
            .map_err(Error::from)
            .and_then(|()| Ok(inner.get_mut().flush()?));
        if let Err(e) = result {
            tracing::warn!("failed to finalize IPC file on drop: {e}");
        }
    }
}
