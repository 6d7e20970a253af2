use std::fmt::{self, Display, Formatter};

use crate::{Array, ArrayError, DataType};

/// Ordered columns of identical length: one record batch or row group.
///
/// Column names, types and nullability come from a [`Schema`](crate::Schema)
/// matched by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    arrays: Vec<Array>,
    len: usize,
}

impl Chunk {
    /// Groups `arrays` into a chunk, failing if their lengths differ.
    pub fn try_new(arrays: impl IntoIterator<Item = Array>) -> Result<Self, ArrayError> {
        let arrays: Vec<Array> = arrays.into_iter().collect();
        let len = arrays.first().map_or(0, Array::len);
        if let Some((index, array)) = arrays.iter().enumerate().find(|(_, a)| a.len() != len) {
            return Err(ArrayError::ChunkLengthMismatch {
                index,
                expected: len,
                actual: array.len(),
            });
        }
        Ok(Self { arrays, len })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_columns(&self) -> usize {
        self.arrays.len()
    }

    pub fn arrays(&self) -> &[Array] {
        &self.arrays
    }

    pub fn column(&self, index: usize) -> Option<&Array> {
        self.arrays.get(index)
    }

    pub fn data_types(&self) -> Vec<DataType> {
        self.arrays.iter().map(Array::data_type).collect()
    }

    pub fn into_arrays(self) -> Vec<Array> {
        self.arrays
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chunk({} rows)", self.len)?;
        for array in &self.arrays {
            writeln!(f, "    {array}")?;
        }
        Ok(())
    }
}
