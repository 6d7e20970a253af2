pub mod convert;
pub mod query;
pub mod schema;

use chunkio::{IpcCompression, ParquetCompression};

pub(crate) fn parse_ipc_compression(raw: &str) -> Result<IpcCompression, String> {
    raw.parse()
}

pub(crate) fn parse_parquet_compression(raw: &str) -> Result<ParquetCompression, String> {
    raw.parse()
}
