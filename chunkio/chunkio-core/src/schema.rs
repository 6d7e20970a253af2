use std::{
    fmt::{self, Display, Formatter, Write as _},
    ops::Deref,
};

use crate::{Chunk, DataType, SchemaError};

/// Named, nullable binding of a [`DataType`] to a column position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    name: String,
    data_type: DataType,
    is_nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_nullable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {{ type: {}, nullable: {} }}",
            self.name, self.data_type, self.is_nullable
        )
    }
}

/// Ordered sequence of [`Field`]s; position `i` describes column `i` of every
/// chunk the schema is paired with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    /// Checks that `chunk` has this schema's arity, the exact data type at
    /// every position, and no nulls in non-nullable columns.
    pub fn check_chunk(&self, chunk: &Chunk) -> Result<(), SchemaError> {
        if chunk.num_columns() != self.fields.len() {
            return Err(SchemaError::ColumnCount {
                expected: self.fields.len(),
                actual: chunk.num_columns(),
            });
        }
        for (index, (field, array)) in self.fields.iter().zip(chunk.arrays()).enumerate() {
            let actual = array.data_type();
            if actual != field.data_type {
                return Err(SchemaError::ColumnType {
                    index,
                    name: field.name.clone(),
                    expected: field.data_type.clone(),
                    actual,
                });
            }
            let null_count = array.null_count();
            if !field.is_nullable && null_count > 0 {
                return Err(SchemaError::NullInNonNullable {
                    index,
                    name: field.name.clone(),
                    null_count,
                });
            }
        }
        Ok(())
    }
}

impl From<Vec<Field>> for Schema {
    fn from(fields: Vec<Field>) -> Self {
        Self::new(fields)
    }
}

impl FromIterator<Field> for Schema {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Deref for Schema {
    type Target = [Field];

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

impl AsRef<[Field]> for Schema {
    fn as_ref(&self) -> &[Field] {
        &self.fields
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&format_fields(&self.fields)?)
    }
}

/// Formats fields one per line: `name: { type: Int32, nullable: true }`.
pub fn format_fields(fields: impl AsRef<[Field]>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for field in fields.as_ref() {
        writeln!(out, "{field}")?;
    }
    Ok(out)
}
