//! Parquet file format: one row group per chunk.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    sync::Arc,
};

use arrow::{compute::concat_batches, datatypes::SchemaRef, record_batch::RecordBatch};
use bytes::Bytes;
use chunkio_arrow::{
    chunk_to_record_batch, record_batch_to_chunk, schema_from_arrow, schema_to_arrow,
};
use chunkio_core::{Chunk, ReaderState, Schema};
use parquet::{
    arrow::{
        ArrowWriter,
        arrow_reader::{ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReaderBuilder},
        arrow_writer::ArrowColumnWriter,
    },
    basic::{Compression, ZstdLevel},
    file::{
        properties::{EnabledStatistics, WriterProperties},
        reader::ChunkReader,
    },
};

use crate::{
    error::{Error, Result},
    options::{ParquetCompression, ParquetWriteOptions},
};

/// Random-access source a [`ParquetReader`] decodes row groups from.
///
/// Each row group is decoded through its own handle on the source, so the
/// source must be cheaply re-openable.
pub trait TableSource: ChunkReader + Sized + 'static {
    fn try_clone(&self) -> io::Result<Self>;
}

impl TableSource for File {
    fn try_clone(&self) -> io::Result<Self> {
        File::try_clone(self)
    }
}

impl TableSource for Bytes {
    fn try_clone(&self) -> io::Result<Self> {
        Ok(self.clone())
    }
}

/// Reads a Parquet file as one chunk per row group, in file order.
pub struct ParquetReader<S: TableSource = File> {
    source: S,
    metadata: ArrowReaderMetadata,
    schema: Schema,
    next_row_group: usize,
    state: ReaderState,
}

impl ParquetReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("open Parquet file: {}", path.display());
        Self::try_new(File::open(path)?)
    }
}

impl<S: TableSource> ParquetReader<S> {
    /// Reads the footer and schema of the Parquet file held by `source`.
    pub fn try_new(source: S) -> Result<Self> {
        let metadata = ArrowReaderMetadata::load(&source, ArrowReaderOptions::default())
            .map_err(Error::decode)?;
        let schema = schema_from_arrow(metadata.schema()).map_err(Error::decode)?;
        tracing::debug!(
            "Parquet reader opened: {} columns, {} row groups",
            schema.len(),
            metadata.metadata().num_row_groups()
        );
        Ok(Self {
            source,
            metadata,
            schema,
            next_row_group: 0,
            state: ReaderState::Opened,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn num_row_groups(&self) -> usize {
        self.metadata.metadata().num_row_groups()
    }

    /// Total number of rows recorded in the footer.
    pub fn num_rows(&self) -> i64 {
        self.metadata.metadata().file_metadata().num_rows()
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    fn read_row_group(&self, index: usize) -> Result<Chunk> {
        let rows = self.metadata.metadata().row_group(index).num_rows();
        if rows == 0 {
            let empty = RecordBatch::new_empty(self.metadata.schema().clone());
            return record_batch_to_chunk(&self.schema, &empty).map_err(Error::decode);
        }
        let batch_size = usize::try_from(rows).unwrap_or(0).max(1);
        let reader = ParquetRecordBatchReaderBuilder::new_with_metadata(
            self.source.try_clone()?,
            self.metadata.clone(),
        )
        .with_row_groups(vec![index])
        .with_batch_size(batch_size)
        .build()
        .map_err(Error::decode)?;
        let mut batches = reader
            .collect::<Result<Vec<RecordBatch>, _>>()
            .map_err(Error::decode)?;
        let batch = if batches.len() == 1 {
            batches.swap_remove(0)
        } else {
            concat_batches(self.metadata.schema(), &batches).map_err(Error::decode)?
        };
        tracing::trace!("Parquet row group {index} decoded: {} rows", batch.num_rows());
        record_batch_to_chunk(&self.schema, &batch).map_err(Error::decode)
    }
}

impl<S: TableSource> Iterator for ParquetReader<S> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.is_done() {
            return None;
        }
        let next = (self.next_row_group < self.num_row_groups()).then(|| {
            let index = self.next_row_group;
            self.next_row_group += 1;
            self.read_row_group(index)
        });
        self.state.advance(next)
    }
}

/// Writes chunks as row groups of a Parquet file.
///
/// Every [`write`](ParquetWriter::write) call produces exactly one row group;
/// the footer is written by [`finish`](ParquetWriter::finish), or on drop when
/// `finish` was never called. A failed encode poisons the writer and the
/// footer is never written.
pub struct ParquetWriter<W: Write + Send = BufWriter<File>> {
    inner: Option<ArrowWriter<W>>,
    schema: Schema,
    arrow_schema: SchemaRef,
    poisoned: bool,
}

impl ParquetWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and writes the header.
    pub fn create(
        path: impl AsRef<Path>,
        schema: Schema,
        options: ParquetWriteOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("create Parquet file: {}", path.display());
        Self::try_new(BufWriter::new(File::create(path)?), schema, options)
    }
}

fn writer_properties(options: &ParquetWriteOptions) -> Result<WriterProperties> {
    let compression = match options.compression() {
        ParquetCompression::Uncompressed => Compression::UNCOMPRESSED,
        ParquetCompression::Snappy => Compression::SNAPPY,
        ParquetCompression::Zstd(level) => Compression::ZSTD(ZstdLevel::try_new(level)?),
    };
    let statistics = if options.write_statistics() {
        EnabledStatistics::Page
    } else {
        EnabledStatistics::None
    };
    // Row groups are cut by explicit flushes only.
    let mut builder = WriterProperties::builder()
        .set_compression(compression)
        .set_statistics_enabled(statistics)
        .set_max_row_group_size(usize::MAX);
    if let Some(limit) = options.data_page_size_limit() {
        builder = builder.set_data_page_size_limit(limit);
    }
    Ok(builder.build())
}

impl<W: Write + Send> ParquetWriter<W> {
    pub fn try_new(sink: W, schema: Schema, options: ParquetWriteOptions) -> Result<Self> {
        let arrow_schema = Arc::new(schema_to_arrow(&schema));
        let props = writer_properties(&options)?;
        let inner = ArrowWriter::try_new(sink, arrow_schema.clone(), Some(props))?;
        tracing::debug!(
            "Parquet writer opened: {} columns, compression {:?}",
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

    /// Writes `chunk` as one row group.
    ///
    /// A chunk that does not conform to the schema fails with
    /// [`Error::TypeMismatch`] before anything is written. An empty chunk
    /// produces a row group with zero rows.
    pub fn write(&mut self, chunk: &Chunk) -> Result<()> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        self.schema.check_chunk(chunk)?;
        let batch = chunk_to_record_batch(&self.arrow_schema, chunk)?;
        let inner = self.inner.as_mut().ok_or(Error::Finished)?;
        let written = if batch.num_rows() == 0 {
            write_empty_row_group(inner)
        } else {
            inner.write(&batch).and_then(|()| inner.flush())
        };
        if let Err(e) = written {
            self.poisoned = true;
            return Err(e.into());
        }
        tracing::trace!("Parquet row group written: {} rows", chunk.len());
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
        tracing::debug!("Parquet writer finished");
        Ok(sink)
    }
}

// `ArrowWriter::write` skips empty batches, so the row group is assembled from
// closed column writers instead.
fn write_empty_row_group<W: Write + Send>(
    writer: &mut ArrowWriter<W>,
) -> parquet::errors::Result<()> {
    let chunks = writer
        .get_column_writers()?
        .into_iter()
        .map(ArrowColumnWriter::close)
        .collect::<parquet::errors::Result<Vec<_>>>()?;
    writer.append_row_group(chunks)
}

impl<W: Write + Send> Drop for ParquetWriter<W> {
    fn drop(&mut self) {
        let Some(inner) = self.inner.take() else {
            return;
        };
        if self.poisoned {
            return;
        }
        let result = inner
            .into_inner()
            .map_err(Error::from)
            .and_then(|mut sink| Ok(sink.flush()?));
        if let Err(e) = result {
            tracing::warn!("failed to finalize Parquet file on drop: {e}");
        }
    }
}
