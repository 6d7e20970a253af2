use std::path::Path;

use anyhow::{Result, anyhow};
use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum FileFormat {
    Ipc,
    Parquet,
}

impl FileFormat {
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "arrow" | "ipc" | "feather" => Some(FileFormat::Ipc),
            "parquet" | "pq" => Some(FileFormat::Parquet),
            _ => None,
        }
    }

    /// Uses `explicit` when given, otherwise the extension of `path`.
    pub fn resolve(explicit: Option<Self>, path: &Path) -> Result<Self> {
        explicit.or_else(|| Self::from_extension(path)).ok_or_else(|| {
            anyhow!(
                "cannot tell the format of {} from its extension, pass it explicitly",
                path.display()
            )
        })
    }
}
