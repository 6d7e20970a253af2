//! Conversion between chunkio `Chunk`s and Arrow `RecordBatch`es.

mod from_arrow;
mod to_arrow;

use std::sync::Arc;

use arrow::{
    array::ArrayRef,
    datatypes::Schema as ArrowSchema,
    record_batch::{RecordBatch, RecordBatchOptions},
};
use chunkio_core::{Chunk, Schema};

pub use from_arrow::array_from_arrow;
pub use to_arrow::array_to_arrow;

use crate::ConvertError;

/// Converts a chunk into a record batch carrying `schema`.
///
/// The chunk is expected to conform to the schema already
/// (see [`Schema::check_chunk`]); Arrow re-validates column types and
/// nullability and reports a mismatch as [`ConvertError::Arrow`].
pub fn chunk_to_record_batch(
    schema: &Arc<ArrowSchema>,
    chunk: &Chunk,
) -> Result<RecordBatch, ConvertError> {
    let arrays: Vec<ArrayRef> = chunk.arrays().iter().map(array_to_arrow).collect();
    let options = RecordBatchOptions::new().with_row_count(Some(chunk.len()));
    Ok(RecordBatch::try_new_with_options(
        schema.clone(),
        arrays,
        &options,
    )?)
}

/// Rebuilds a chunk from a decoded record batch and checks every column
/// against the reader's `schema`.
pub fn record_batch_to_chunk(schema: &Schema, batch: &RecordBatch) -> Result<Chunk, ConvertError> {
    if batch.num_columns() != schema.len() {
        return Err(ConvertError::ColumnCount {
            expected: schema.len(),
            actual: batch.num_columns(),
        });
    }
    let mut arrays = Vec::with_capacity(batch.num_columns());
    for (index, (field, column)) in schema.iter().zip(batch.columns()).enumerate() {
        let array = array_from_arrow(column.as_ref())?;
        let actual = array.data_type();
        if &actual != field.data_type() {
            return Err(ConvertError::ColumnType {
                index,
                expected: field.data_type().clone(),
                actual,
            });
        }
        arrays.push(array);
    }
    Ok(Chunk::try_new(arrays)?)
}
