use std::{fs, path::PathBuf};

use anyhow::Result;
use chunkio::format_fields;
use clap::Args;

use crate::{format::FileFormat, writer::open_reader};

#[derive(Args)]
pub struct SchemaArgs {
    /// Path to the IPC or Parquet file
    input: PathBuf,

    /// Input format (inferred from the extension if not specified)
    #[arg(short, long, value_enum)]
    format: Option<FileFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl SchemaArgs {
    pub fn run(self) -> Result<()> {
        let format = FileFormat::resolve(self.format, &self.input)?;
        let (schema, _) = open_reader(format, &self.input)?;
        let text = format_fields(&schema)?;

        match self.output {
            Some(path) => fs::write(path, format!("{text}\n"))?,
            None => println!("{text}"),
        }
        Ok(())
    }
}
