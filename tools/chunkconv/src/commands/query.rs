use std::path::PathBuf;

use anyhow::Result;
use chunkio::{IpcCompression, ParquetCompression};
use chunkio_sql::SqlConnector;
use clap::Args;

use super::{parse_ipc_compression, parse_parquet_compression};
use crate::{
    format::FileFormat,
    writer::{WriteSettings, copy_chunks, create_writer},
};

#[derive(Args)]
pub struct QueryArgs {
    /// SQL statement to run
    statement: String,

    /// Database: `:memory:`, a path or a `file:` URI, optionally prefixed with `sqlite://`
    #[arg(long)]
    db: String,

    /// Output file path; required when the statement returns rows
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (inferred from the extension if not specified)
    #[arg(short, long, value_enum)]
    format: Option<FileFormat>,

    /// Maximum rows per written batch / row group
    #[arg(long, default_value_t = 65_536)]
    batch_size: usize,

    /// IPC body compression: none | lz4 | zstd
    #[arg(long, value_parser = parse_ipc_compression, default_value = "none")]
    ipc_compression: IpcCompression,

    /// Parquet compression: uncompressed | snappy | zstd[:level]
    #[arg(long, value_parser = parse_parquet_compression, default_value = "uncompressed")]
    parquet_compression: ParquetCompression,
}

impl QueryArgs {
    pub fn run(self) -> Result<()> {
        let mut db = SqlConnector::connect(&self.db)?;
        let Some(cursor) = db.execute(&self.statement, Some(self.batch_size))? else {
            eprintln!("Statement executed, no result set");
            return Ok(());
        };

        let output = self
            .output
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("statement returns rows, pass -o <file>"))?;
        let format = FileFormat::resolve(self.format, output)?;
        let mut settings = WriteSettings::default();
        settings.ipc = settings.ipc.with_compression(self.ipc_compression);
        settings.parquet = settings.parquet.with_compression(self.parquet_compression);

        let writer = create_writer(format, output, cursor.schema().clone(), &settings)?;
        let stats = copy_chunks(cursor, writer)?;
        eprintln!(
            "Written {} rows in {} chunks to {}",
            stats.rows,
            stats.chunks,
            output.display()
        );
        Ok(())
    }
}
