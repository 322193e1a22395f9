//! Row filtering

use crate::error::Result;
use arrow::array::BooleanArray;
use arrow::compute;
use arrow::record_batch::RecordBatch;

/// Keep the rows where `predicate` is true
pub fn filter(batch: &RecordBatch, predicate: &BooleanArray) -> Result<RecordBatch> {
    compute::filter_record_batch(batch, predicate).map_err(Into::into)
}

/// Keep the rows for which `keep(row)` returns true
pub fn filter_rows(batch: &RecordBatch, keep: impl Fn(usize) -> bool) -> Result<RecordBatch> {
    let mask: BooleanArray = (0..batch.num_rows()).map(|row| Some(keep(row))).collect();
    filter(batch, &mask)
}
