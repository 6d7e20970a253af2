//! Writer configuration.

use std::{fmt, str::FromStr};

/// Body compression of IPC record batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpcCompression {
    #[default]
    None,
    Lz4Frame,
    Zstd,
}

impl FromStr for IpcCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "lz4" | "lz4-frame" => Ok(Self::Lz4Frame),
            "zstd" => Ok(Self::Zstd),
            other => Err(format!(
                "unknown IPC compression '{other}'; expected one of: none, lz4, zstd"
            )),
        }
    }
}

impl fmt::Display for IpcCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Lz4Frame => "lz4",
            Self::Zstd => "zstd",
        })
    }
}

/// Options for [`IpcWriter`](crate::IpcWriter).
#[derive(Debug, Clone, Default)]
pub struct IpcWriteOptions {
    compression: IpcCompression,
}

impl IpcWriteOptions {
    pub fn with_compression(mut self, compression: IpcCompression) -> Self {
        self.compression = compression;
        self
    }

    pub fn compression(&self) -> IpcCompression {
        self.compression
    }
}

/// Column chunk compression of Parquet files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParquetCompression {
    #[default]
    Uncompressed,
    Snappy,
    /// Zstandard at the given level (1 to 22).
    Zstd(i32),
}

impl FromStr for ParquetCompression {
    type Err = String;

    /// Accepts `uncompressed`, `snappy`, `zstd` (level 3) or `zstd:<level>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.split_once(':') {
            Some(("zstd", level)) => level
                .parse()
                .map(Self::Zstd)
                .map_err(|_| format!("invalid zstd level '{level}'")),
            Some(_) => Err(format!("unknown Parquet compression '{s}'")),
            None => match lower.as_str() {
                "uncompressed" | "none" => Ok(Self::Uncompressed),
                "snappy" => Ok(Self::Snappy),
                "zstd" => Ok(Self::Zstd(3)),
                _ => Err(format!(
                    "unknown Parquet compression '{s}'; expected one of: uncompressed, snappy, zstd[:level]"
                )),
            },
        }
    }
}

/// Options for [`ParquetWriter`](crate::ParquetWriter).
///
/// Defaults to uncompressed pages with statistics enabled and the codec's
/// default data page size.
#[derive(Debug, Clone)]
pub struct ParquetWriteOptions {
    compression: ParquetCompression,
    write_statistics: bool,
    data_page_size_limit: Option<usize>,
}

impl Default for ParquetWriteOptions {
    fn default() -> Self {
        Self {
            compression: ParquetCompression::Uncompressed,
            write_statistics: true,
            data_page_size_limit: None,
        }
    }
}

impl ParquetWriteOptions {
    pub fn with_compression(mut self, compression: ParquetCompression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_statistics(mut self, write_statistics: bool) -> Self {
        self.write_statistics = write_statistics;
        self
    }

    /// Best-effort upper bound on the encoded size of one data page, in bytes.
    pub fn with_data_page_size_limit(mut self, limit: usize) -> Self {
        self.data_page_size_limit = Some(limit);
        self
    }

    pub fn compression(&self) -> ParquetCompression {
        self.compression
    }

    pub fn write_statistics(&self) -> bool {
        self.write_statistics
    }

    pub fn data_page_size_limit(&self) -> Option<usize> {
        self.data_page_size_limit
    }
}
