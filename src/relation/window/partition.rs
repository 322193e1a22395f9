//! Window partitioning: sort by PARTITION BY then ORDER BY, and find the
//! partition boundaries in the sorted rows.

use crate::error::Result;
use crate::relation::column::column;
use crate::relation::key::GroupKey;
use crate::relation::sort::{sort_indices, take_batch, SortKey};
use arrow::record_batch::RecordBatch;
use std::ops::Range;

/// Rows of a window input, sorted so each partition is contiguous
#[derive(Debug)]
pub struct Partitioned {
    pub batch: RecordBatch,
    pub partitions: Vec<Range<usize>>,
}

pub fn partition_rows(
    batch: &RecordBatch,
    partition_by: &[&str],
    order_by: &[SortKey],
) -> Result<Partitioned> {
    let keys: Vec<SortKey> = partition_by
        .iter()
        .map(|c| SortKey::asc(*c))
        .chain(order_by.iter().cloned())
        .collect();

    let indices = sort_indices(batch, &keys)?;
    let sorted = take_batch(batch, &indices)?;

    let partition_arrays = partition_by
        .iter()
        .map(|c| column(&sorted, c))
        .collect::<Result<Vec<_>>>()?;

    let mut partitions = Vec::new();
    let mut start = 0;
    let mut current: Option<GroupKey> = None;
    for row in 0..sorted.num_rows() {
        let key = GroupKey::from_row(&partition_arrays, row)?;
        match &current {
            Some(prev) if *prev == key => {}
            Some(_) => {
                partitions.push(start..row);
                start = row;
                current = Some(key);
            }
            None => current = Some(key),
        }
    }
    if sorted.num_rows() > 0 {
        partitions.push(start..sorted.num_rows());
    }

    Ok(Partitioned {
        batch: sorted,
        partitions,
    })
}
