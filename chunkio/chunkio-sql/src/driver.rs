//! Seam between the bridge and a concrete database driver.

use chunkio_core::DataType;

use crate::value::SqlValue;

/// Name and declared type of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlColumn {
    pub name: String,
    /// Declared type as reported by the driver; `None` for expressions.
    pub sql_type: Option<String>,
}

impl SqlColumn {
    pub fn new(name: impl Into<String>, sql_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.map(str::to_string),
        }
    }
}

/// Rows of an executed statement, pulled in batches.
pub trait SqlCursor {
    type Error: std::error::Error + Send + Sync + 'static;

    fn columns(&self) -> &[SqlColumn];

    /// Returns up to `max_rows` rows; an empty batch means the cursor is
    /// exhausted.
    fn next_batch(&mut self, max_rows: usize) -> Result<Vec<Vec<SqlValue>>, Self::Error>;
}

/// An open database connection.
pub trait SqlConnection {
    type Error: std::error::Error + Send + Sync + 'static;
    type Cursor: SqlCursor;

    /// Number of result columns `statement` produces; zero for DDL and DML.
    fn column_count(&mut self, statement: &str) -> Result<usize, Self::Error>;

    /// Number of positional parameters `statement` takes.
    fn parameter_count(&mut self, statement: &str) -> Result<usize, Self::Error>;

    /// Runs `statement`, returning a cursor when it produces a result set.
    fn execute(&mut self, statement: &str) -> Result<Option<Self::Cursor>, Self::Error>;

    /// Runs `statement` once per row in one transaction; either every row is
    /// committed or none is. Returns the number of affected rows.
    fn write_rows(
        &mut self,
        statement: &str,
        rows: &[Vec<SqlValue>],
    ) -> Result<usize, Self::Error>;

    /// Logical type of a result column. Total and deterministic per declared
    /// type.
    fn data_type(&self, column: &SqlColumn) -> DataType;
}
