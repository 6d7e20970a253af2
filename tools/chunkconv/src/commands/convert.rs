use std::path::PathBuf;

use anyhow::{Result, bail};
use chunkio::{IpcCompression, ParquetCompression};
use clap::Args;

use super::{parse_ipc_compression, parse_parquet_compression};
use crate::{
    format::FileFormat,
    writer::{WriteSettings, copy_chunks, create_writer, open_reader},
};

#[derive(Args)]
pub struct ConvertArgs {
    /// Path to the input file
    input: PathBuf,

    /// Path to the output file
    output: PathBuf,

    /// Input format (inferred from the extension if not specified)
    #[arg(long, value_enum)]
    from: Option<FileFormat>,

    /// Output format (inferred from the extension if not specified)
    #[arg(long, value_enum)]
    to: Option<FileFormat>,

    /// IPC body compression: none | lz4 | zstd
    #[arg(long, value_parser = parse_ipc_compression, default_value = "none")]
    ipc_compression: IpcCompression,

    /// Parquet compression: uncompressed | snappy | zstd[:level]
    #[arg(long, value_parser = parse_parquet_compression, default_value = "uncompressed")]
    parquet_compression: ParquetCompression,

    /// Do not write Parquet page statistics
    #[arg(long)]
    no_statistics: bool,
}

impl ConvertArgs {
    pub fn run(self) -> Result<()> {
        let from = FileFormat::resolve(self.from, &self.input)?;
        let to = FileFormat::resolve(self.to, &self.output)?;
        if self.input == self.output {
            bail!("input and output are the same file: {}", self.input.display());
        }

        let settings = self.write_settings();
        let (schema, chunks) = open_reader(from, &self.input)?;
        let writer = create_writer(to, &self.output, schema, &settings)?;
        let stats = copy_chunks(chunks, writer)?;

        eprintln!(
            "Written {} rows in {} chunks to {}",
            stats.rows,
            stats.chunks,
            self.output.display()
        );
        Ok(())
    }

    fn write_settings(&self) -> WriteSettings {
        let mut settings = WriteSettings::default();
        settings.ipc = settings.ipc.with_compression(self.ipc_compression);
        settings.parquet = settings
            .parquet
            .with_compression(self.parquet_compression)
            .with_statistics(!self.no_statistics);
        settings
    }
}
