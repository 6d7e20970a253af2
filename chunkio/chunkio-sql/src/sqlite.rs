//! SQLite driver backed by `rusqlite`.

use std::collections::VecDeque;

use chunkio_core::{DataType, TimeUnit};
use rusqlite::{
    Connection, OpenFlags, params_from_iter,
    types::{ToSql, ToSqlOutput, ValueRef},
};

use crate::{
    driver::{SqlColumn, SqlConnection, SqlCursor},
    value::SqlValue,
};

/// An open SQLite database.
pub struct SqliteConnection {
    conn: Connection,
}

impl SqliteConnection {
    /// Opens `connection_string`: `:memory:`, a filesystem path or a `file:`
    /// URI, optionally prefixed with `sqlite://`.
    pub fn open(connection_string: &str) -> rusqlite::Result<Self> {
        let target = connection_string
            .strip_prefix("sqlite://")
            .unwrap_or(connection_string);
        if target.is_empty() {
            return Err(rusqlite::Error::InvalidPath(connection_string.into()));
        }
        let conn = if target == ":memory:" {
            Connection::open_in_memory()?
        } else {
            let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX;
            Connection::open_with_flags(target, flags)?
        };
        tracing::debug!("open SQLite database: {target}");
        Ok(Self { conn })
    }

    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn inner(&self) -> &Connection {
        &self.conn
    }
}

impl SqlConnection for SqliteConnection {
    type Error = rusqlite::Error;
    type Cursor = SqliteCursor;

    fn column_count(&mut self, statement: &str) -> rusqlite::Result<usize> {
        Ok(self.conn.prepare_cached(statement)?.column_count())
    }

    fn parameter_count(&mut self, statement: &str) -> rusqlite::Result<usize> {
        Ok(self.conn.prepare_cached(statement)?.parameter_count())
    }

    fn execute(&mut self, statement: &str) -> rusqlite::Result<Option<SqliteCursor>> {
        let mut stmt = self.conn.prepare_cached(statement)?;
        if stmt.column_count() == 0 {
            let changed = stmt.execute([])?;
            tracing::trace!("statement changed {changed} rows");
            return Ok(None);
        }

        let columns: Vec<SqlColumn> = stmt
            .columns()
            .iter()
            .map(|c| SqlColumn::new(c.name(), c.decl_type()))
            .collect();
        let mut rows = VecDeque::new();
        let mut result = stmt.query([])?;
        while let Some(row) = result.next()? {
            let values = (0..columns.len())
                .map(|i| row.get_ref(i).map(SqlValue::from))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.push_back(values);
        }
        Ok(Some(SqliteCursor { columns, rows }))
    }

    fn write_rows(&mut self, statement: &str, rows: &[Vec<SqlValue>]) -> rusqlite::Result<usize> {
        let tx = self.conn.transaction()?;
        let mut changed = 0;
        {
            let mut stmt = tx.prepare_cached(statement)?;
            for row in rows {
                changed += stmt.execute(params_from_iter(row))?;
            }
        }
        tx.commit()?;
        Ok(changed)
    }

    fn data_type(&self, column: &SqlColumn) -> DataType {
        sqlite_data_type(column.sql_type.as_deref())
    }
}

/// Maps a declared SQLite column type to a [`DataType`].
///
/// Matching ignores case and any `(precision, scale)` suffix. Unknown or
/// missing declarations map to `Utf8`.
pub fn sqlite_data_type(decl_type: Option<&str>) -> DataType {
    let Some(decl_type) = decl_type else {
        return DataType::Utf8;
    };
    let base = decl_type
        .split_once('(')
        .map_or(decl_type, |(base, _)| base)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();
    match base.as_str() {
        "TINYINT" => DataType::Int8,
        "SMALLINT" => DataType::Int16,
        "INT" | "INTEGER" | "MEDIUMINT" => DataType::Int32,
        "BIGINT" | "INT8" => DataType::Int64,
        "BOOL" | "BOOLEAN" => DataType::Boolean,
        // SQLite stores every REAL as an 8-byte double.
        "REAL" | "FLOAT4" | "DOUBLE" | "DOUBLE PRECISION" | "FLOAT" | "FLOAT8" | "NUMERIC"
        | "DECIMAL" => DataType::Float64,
        "BLOB" => DataType::Binary,
        "DATE" => DataType::Date32,
        "TIME" => DataType::Time64,
        "DATETIME" | "TIMESTAMP" => DataType::timestamp(TimeUnit::Microsecond, None),
        // CHAR, VARCHAR, TEXT, CLOB, NCHAR, NVARCHAR and everything else.
        _ => DataType::Utf8,
    }
}

/// Fully buffered result set of one statement.
pub struct SqliteCursor {
    columns: Vec<SqlColumn>,
    rows: VecDeque<Vec<SqlValue>>,
}

impl SqlCursor for SqliteCursor {
    type Error = rusqlite::Error;

    fn columns(&self) -> &[SqlColumn] {
        &self.columns
    }

    fn next_batch(&mut self, max_rows: usize) -> rusqlite::Result<Vec<Vec<SqlValue>>> {
        let n = max_rows.min(self.rows.len());
        Ok(self.rows.drain(..n).collect())
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(v) => SqlValue::Integer(v),
            ValueRef::Real(v) => SqlValue::Real(v),
            ValueRef::Text(v) => String::from_utf8(v.to_vec())
                .map_or_else(|e| SqlValue::Blob(e.into_bytes()), SqlValue::Text),
            ValueRef::Blob(v) => SqlValue::Blob(v.to_vec()),
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            SqlValue::Null => ValueRef::Null,
            SqlValue::Integer(v) => ValueRef::Integer(*v),
            SqlValue::Real(v) => ValueRef::Real(*v),
            SqlValue::Text(v) => ValueRef::Text(v.as_bytes()),
            SqlValue::Blob(v) => ValueRef::Blob(v),
        }))
    }
}
