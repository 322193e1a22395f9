//! Multi-column sort

use crate::error::Result;
use crate::relation::column::column;
use arrow::array::{ArrayRef, UInt32Array};
use arrow::compute::{self, SortColumn, SortOptions};
use arrow::record_batch::RecordBatch;
use std::fmt;
use std::sync::Arc;

/// One ORDER BY term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// Nulls sort last ascending and first descending
    fn options(&self) -> SortOptions {
        SortOptions {
            descending: self.descending,
            nulls_first: self.descending,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.descending { "DESC" } else { "ASC" };
        write!(f, "{} {}", self.column, dir)
    }
}

/// Row order that sorts `batch` by `keys`. Stable: rows equal on every key
/// keep their input order.
pub(crate) fn sort_indices(batch: &RecordBatch, keys: &[SortKey]) -> Result<UInt32Array> {
    let row_ids = UInt32Array::from_iter_values(0..batch.num_rows() as u32);
    if keys.is_empty() || batch.num_rows() == 0 {
        return Ok(row_ids);
    }

    let mut sort_columns = keys
        .iter()
        .map(|k| {
            Ok(SortColumn {
                values: column(batch, &k.column)?.clone(),
                options: Some(k.options()),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    // lexsort is unstable; the row index breaks remaining ties
    sort_columns.push(SortColumn {
        values: Arc::new(row_ids),
        options: None,
    });

    compute::lexsort_to_indices(&sort_columns, None).map_err(Into::into)
}

/// Reorder every column of `batch` by `indices`
pub(crate) fn take_batch(batch: &RecordBatch, indices: &UInt32Array) -> Result<RecordBatch> {
    let columns = batch
        .columns()
        .iter()
        .map(|col| compute::take(col.as_ref(), indices, None).map_err(Into::into))
        .collect::<Result<Vec<ArrayRef>>>()?;

    RecordBatch::try_new(batch.schema(), columns).map_err(Into::into)
}

/// Sort all rows of `batch` by `keys`
pub fn sort_batch(batch: &RecordBatch, keys: &[SortKey]) -> Result<RecordBatch> {
    if batch.num_rows() == 0 || keys.is_empty() {
        return Ok(batch.clone());
    }
    let indices = sort_indices(batch, keys)?;
    take_batch(batch, &indices)
}
