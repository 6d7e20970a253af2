//! Statement execution in terms of chunks.

use chunkio_core::{Chunk, Field, ReaderState, Schema};

use crate::{
    convert::{chunk_to_rows, rows_to_chunk},
    driver::{SqlConnection, SqlCursor},
    error::{Result, SqlError},
    sqlite::SqliteConnection,
};

/// Runs statements on a connection and moves rows as chunks.
pub struct SqlConnector<C: SqlConnection = SqliteConnection> {
    conn: C,
}

impl SqlConnector<SqliteConnection> {
    /// Opens a SQLite database; see [`SqliteConnection::open`] for the
    /// accepted connection strings.
    pub fn connect(connection_string: &str) -> Result<Self> {
        let conn = SqliteConnection::open(connection_string).map_err(SqlError::driver)?;
        Ok(Self::new(conn))
    }
}

impl<C: SqlConnection> SqlConnector<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Runs `statement`.
    ///
    /// Returns `None` when the statement produces no result set. Otherwise
    /// `batch_size` is required and bounds the rows of every yielded chunk;
    /// the check happens before the statement runs.
    pub fn execute(
        &mut self,
        statement: &str,
        batch_size: Option<usize>,
    ) -> Result<Option<ChunkCursor<C::Cursor>>> {
        if batch_size == Some(0) {
            return Err(SqlError::InvalidBatchSize);
        }
        tracing::debug!("execute SQL: {statement}");
        let columns = self
            .conn
            .column_count(statement)
            .map_err(SqlError::driver)?;
        let batch_size = match batch_size {
            Some(n) => n,
            None if columns > 0 => return Err(SqlError::BatchSizeRequired),
            None => 0,
        };

        let Some(cursor) = self.conn.execute(statement).map_err(SqlError::driver)? else {
            return Ok(None);
        };
        // Nullability of result columns is never reported.
        let schema: Schema = cursor
            .columns()
            .iter()
            .map(|c| Field::new(&c.name, self.conn.data_type(c), true))
            .collect();
        tracing::debug!("SQL result set opened: {} columns", schema.len());
        Ok(Some(ChunkCursor {
            cursor,
            schema,
            batch_size,
            rows_read: 0,
            state: ReaderState::Opened,
        }))
    }

    /// Binds every row of `chunk` to `statement`, in order, in one
    /// transaction. Returns the number of rows the statement changed.
    ///
    /// The statement must take exactly one parameter per chunk column;
    /// otherwise this fails with [`SqlError::TypeMismatch`] before anything
    /// runs.
    pub fn write(&mut self, statement: &str, chunk: &Chunk) -> Result<usize> {
        let parameters = self
            .conn
            .parameter_count(statement)
            .map_err(SqlError::driver)?;
        if parameters != chunk.num_columns() {
            return Err(SqlError::TypeMismatch {
                parameters,
                columns: chunk.num_columns(),
            });
        }
        let rows = chunk_to_rows(chunk)?;
        let changed = self
            .conn
            .write_rows(statement, &rows)
            .map_err(SqlError::driver)?;
        tracing::debug!("SQL write committed: {} rows, {changed} changes", rows.len());
        Ok(changed)
    }

    pub fn into_inner(self) -> C {
        self.conn
    }
}

/// Result set of a statement, yielded as chunks of at most `batch_size` rows.
///
/// Follows the same lifecycle as the file readers: an error is yielded once
/// and ends the iteration; an exhausted cursor keeps returning `None`.
pub struct ChunkCursor<R: SqlCursor> {
    cursor: R,
    schema: Schema,
    batch_size: usize,
    rows_read: usize,
    state: ReaderState,
}

impl<R: SqlCursor> ChunkCursor<R> {
    pub fn fields(&self) -> &[Field] {
        self.schema.fields()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    fn read_next(&mut self) -> Option<Result<Chunk>> {
        let rows = match self.cursor.next_batch(self.batch_size) {
            Ok(rows) if rows.is_empty() => return None,
            Ok(rows) => rows,
            Err(e) => return Some(Err(SqlError::driver(e))),
        };
        tracing::trace!("SQL batch fetched: {} rows", rows.len());
        let chunk = rows_to_chunk(self.schema.fields(), &rows).map_err(|e| match e {
            SqlError::Conversion {
                row,
                column,
                data_type,
                source,
            } => SqlError::Conversion {
                row: self.rows_read + row,
                column,
                data_type,
                source,
            },
            other => other,
        });
        self.rows_read += rows.len();
        Some(chunk)
    }
}

impl<R: SqlCursor> Iterator for ChunkCursor<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.is_done() {
            return None;
        }
        let next = self.read_next();
        self.state.advance(next)
    }
}
