//! Ranking window functions: RANK, DENSE_RANK

use crate::error::Result;
use crate::relation::column::column;
use crate::relation::key::GroupKey;
use crate::relation::project::with_column;
use crate::relation::sort::SortKey;
use crate::relation::window::partition::partition_rows;
use arrow::array::Int64Array;
use arrow::datatypes::{DataType, Field};
use arrow::record_batch::RecordBatch;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKind {
    /// Ties share a rank; the next rank skips by the number of ties
    Rank,
    /// Ties share a rank; the next rank follows immediately
    DenseRank,
}

impl fmt::Display for RankKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rank => "RANK",
            Self::DenseRank => "DENSE_RANK",
        };
        f.write_str(name)
    }
}

/// Assign ranks to one partition given its rows' ORDER BY keys, already in
/// sorted order. Rows with equal keys are peers.
pub(crate) fn assign_ranks(order_keys: &[GroupKey], kind: RankKind) -> Vec<i64> {
    let mut ranks = Vec::with_capacity(order_keys.len());
    let mut rank = 0i64;
    let mut dense = 0i64;

    for (i, key) in order_keys.iter().enumerate() {
        let is_peer = i > 0 && order_keys[i - 1] == *key;
        if !is_peer {
            rank = i as i64 + 1;
            dense += 1;
        }
        ranks.push(match kind {
            RankKind::Rank => rank,
            RankKind::DenseRank => dense,
        });
    }
    ranks
}

/// Evaluate `kind() OVER (PARTITION BY partition_by ORDER BY order_by)` and
/// append it as an Int64 column named `output`. Rows come back sorted by
/// partition, then by `order_by`.
pub fn rank(
    batch: &RecordBatch,
    partition_by: &[&str],
    order_by: &[SortKey],
    kind: RankKind,
    output: &str,
) -> Result<RecordBatch> {
    let partitioned = partition_rows(batch, partition_by, order_by)?;
    let sorted = &partitioned.batch;

    let order_arrays = order_by
        .iter()
        .map(|k| column(sorted, &k.column))
        .collect::<Result<Vec<_>>>()?;

    let mut values = Vec::with_capacity(sorted.num_rows());
    for range in &partitioned.partitions {
        let keys = range
            .clone()
            .map(|row| GroupKey::from_row(&order_arrays, row))
            .collect::<Result<Vec<_>>>()?;
        values.extend(assign_ranks(&keys, kind));
    }

    with_column(
        sorted,
        Field::new(output, DataType::Int64, false),
        Arc::new(Int64Array::from(values)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::key::GroupValue;
    use crate::relation::{int64_column, string_column};
    use arrow::array::StringArray;
    use arrow::datatypes::Schema;

    fn keys(values: &[i64]) -> Vec<GroupKey> {
        values
            .iter()
            .map(|v| GroupKey {
                values: vec![GroupValue::Int64(*v)],
            })
            .collect()
    }

    #[test]
    fn test_rank_kinds_on_ties() {
        let k = keys(&[9, 7, 7, 5, 5, 5, 1]);
        assert_eq!(assign_ranks(&k, RankKind::Rank), vec![1, 2, 2, 4, 4, 4, 7]);
        assert_eq!(assign_ranks(&k, RankKind::DenseRank), vec![1, 2, 2, 3, 3, 3, 4]);
        assert!(assign_ranks(&[], RankKind::Rank).is_empty());
    }

    #[test]
    fn test_rank_within_partitions() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("city", DataType::Utf8, false),
            Field::new("revenue", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["Pune", "Delhi", "Pune", "Pune", "Delhi"])),
                Arc::new(Int64Array::from(vec![10, 30, 20, 20, 5])),
            ],
        )
        .unwrap();

        let ranked = rank(
            &batch,
            &["city"],
            &[SortKey::desc("revenue")],
            RankKind::Rank,
            "rnk",
        )
        .unwrap();

        let cities = string_column(&ranked, "city").unwrap();
        let revenue = int64_column(&ranked, "revenue").unwrap();
        let ranks = int64_column(&ranked, "rnk").unwrap();

        // Delhi partition first
        assert_eq!(cities.value(0), "Delhi");
        assert_eq!((revenue.value(0), ranks.value(0)), (30, 1));
        assert_eq!((revenue.value(1), ranks.value(1)), (5, 2));
        // Pune: tie at 20 shares rank 1, then 10 gets rank 3
        assert_eq!(cities.value(2), "Pune");
        assert_eq!(&ranks.values()[2..], &[1, 1, 3]);
    }

    #[test]
    fn test_dense_rank_without_partition() {
        let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int64, false)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Int64Array::from(vec![3, 8, 8, 1]))],
        )
        .unwrap();

        let ranked = rank(&batch, &[], &[SortKey::desc("n")], RankKind::DenseRank, "r").unwrap();
        let ranks = int64_column(&ranked, "r").unwrap();
        assert_eq!(ranks.values().to_vec(), vec![1, 1, 2, 3]);
    }
}
