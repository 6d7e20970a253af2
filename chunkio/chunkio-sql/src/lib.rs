//! SQL bridge for `chunkio`.
//!
//! [`SqlConnector`] runs statements on a [`SqlConnection`]. Statements that
//! produce a result set return a [`ChunkCursor`] that yields chunks of at most
//! `batch_size` rows; [`SqlConnector::write`] binds each row of a chunk to a
//! parameterized statement, all rows in one transaction.
//!
//! # Typical Flow
//! ```rust
//! use chunkio_core::{Array, Chunk, Int32Array, StringArray};
//! use chunkio_sql::SqlConnector;
//!
//! let mut db = SqlConnector::connect(":memory:").unwrap();
//! assert!(db.execute("CREATE TABLE t (c1 INT, c2 TEXT)", None).unwrap().is_none());
//!
//! let chunk = Chunk::try_new([
//!     Array::from(Int32Array::from(vec![Some(1), None])),
//!     StringArray::from_iter([Some("aa"), None]).into(),
//! ])
//! .unwrap();
//! db.write("INSERT INTO t VALUES (?, ?)", &chunk).unwrap();
//!
//! let cursor = db.execute("SELECT c1, c2 FROM t", Some(1024)).unwrap().unwrap();
//! let chunks = cursor.collect::<Result<Vec<_>, _>>().unwrap();
//! assert_eq!(chunks, vec![chunk]);
//! ```
mod bridge;
pub mod convert;
pub mod driver;
pub mod error;
pub mod sqlite;
mod value;

pub use bridge::{ChunkCursor, SqlConnector};
pub use driver::{SqlColumn, SqlConnection, SqlCursor};
pub use error::{Result, SqlError, ValueTypeError};
pub use sqlite::{SqliteConnection, SqliteCursor, sqlite_data_type};
pub use value::SqlValue;
