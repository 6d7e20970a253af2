use std::path::Path;

use anyhow::Result;
use chunkio::{
    Chunk, IpcReader, IpcWriteOptions, IpcWriter, ParquetReader, ParquetWriteOptions,
    ParquetWriter, Schema,
};

use crate::format::FileFormat;

pub trait ChunkWriter {
    fn write_chunk(&mut self, chunk: &Chunk) -> Result<()>;
    fn finish(self: Box<Self>) -> Result<()>;
}

impl ChunkWriter for IpcWriter {
    fn write_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        Ok(self.write(chunk)?)
    }

    fn finish(self: Box<Self>) -> Result<()> {
        IpcWriter::finish(*self)?;
        Ok(())
    }
}

impl ChunkWriter for ParquetWriter {
    fn write_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        Ok(self.write(chunk)?)
    }

    fn finish(self: Box<Self>) -> Result<()> {
        ParquetWriter::finish(*self)?;
        Ok(())
    }
}

/// Writer options for both formats; only the one matching the output is used.
#[derive(Debug, Clone, Default)]
pub struct WriteSettings {
    pub ipc: IpcWriteOptions,
    pub parquet: ParquetWriteOptions,
}

pub fn create_writer(
    format: FileFormat,
    path: &Path,
    schema: Schema,
    settings: &WriteSettings,
) -> Result<Box<dyn ChunkWriter>> {
    Ok(match format {
        FileFormat::Ipc => Box::new(IpcWriter::create(path, schema, settings.ipc.clone())?),
        FileFormat::Parquet => {
            Box::new(ParquetWriter::create(path, schema, settings.parquet.clone())?)
        }
    })
}

pub type ChunkIter = Box<dyn Iterator<Item = chunkio::Result<Chunk>>>;

/// Opens `path` and returns its schema with the chunk stream.
pub fn open_reader(format: FileFormat, path: &Path) -> Result<(Schema, ChunkIter)> {
    Ok(match format {
        FileFormat::Ipc => {
            let reader = IpcReader::open(path)?;
            (reader.schema().clone(), Box::new(reader) as ChunkIter)
        }
        FileFormat::Parquet => {
            let reader = ParquetReader::open(path)?;
            (reader.schema().clone(), Box::new(reader) as ChunkIter)
        }
    })
}

/// Counts of what a copy wrote.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub chunks: usize,
    pub rows: usize,
}

/// Drains `chunks` into `writer` and finishes it.
pub fn copy_chunks<E>(
    chunks: impl Iterator<Item = Result<Chunk, E>>,
    mut writer: Box<dyn ChunkWriter>,
) -> Result<CopyStats>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let mut stats = CopyStats::default();
    for chunk in chunks {
        let chunk = chunk?;
        writer.write_chunk(&chunk)?;
        stats.chunks += 1;
        stats.rows += chunk.len();
    }
    writer.finish()?;
    Ok(stats)
}
