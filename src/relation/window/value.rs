//! Value window functions: LAG

use crate::error::Result;
use crate::relation::column::column;
use crate::relation::project::with_column;
use crate::relation::sort::SortKey;
use crate::relation::window::partition::partition_rows;
use arrow::array::UInt32Array;
use arrow::compute;
use arrow::datatypes::Field;
use arrow::record_batch::RecordBatch;

/// Evaluate `LAG(value, offset) OVER (PARTITION BY .. ORDER BY ..)` and
/// append it as a nullable column named `output`, with the value column's
/// type. The first `offset` rows of each partition get null. "Previous"
/// means the previous row in sort order, not the previous calendar period.
pub fn lag(
    batch: &RecordBatch,
    partition_by: &[&str],
    order_by: &[SortKey],
    value: &str,
    offset: usize,
    output: &str,
) -> Result<RecordBatch> {
    let partitioned = partition_rows(batch, partition_by, order_by)?;
    let sorted = &partitioned.batch;

    let mut indices: Vec<Option<u32>> = Vec::with_capacity(sorted.num_rows());
    for range in &partitioned.partitions {
        for row in range.clone() {
            let prev = (row >= range.start + offset).then(|| (row - offset) as u32);
            indices.push(prev);
        }
    }

    let values = column(sorted, value)?;
    let lagged = compute::take(values.as_ref(), &UInt32Array::from(indices), None)?;
    let field = Field::new(output, values.data_type().clone(), true);

    with_column(sorted, field, lagged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{float64_column, int64_column, string_column};
    use arrow::array::{Array, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Schema};
    use std::sync::Arc;

    #[test]
    fn test_lag_per_partition() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("restaurant_id", DataType::Int64, false),
            Field::new("month", DataType::Utf8, false),
            Field::new("orders", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 1, 1])),
                Arc::new(StringArray::from(vec!["2024-03", "2024-01", "2024-01", "2023-11"])),
                Arc::new(Int64Array::from(vec![30, 7, 10, 5])),
            ],
        )
        .unwrap();

        let result = lag(
            &batch,
            &["restaurant_id"],
            &[SortKey::asc("month")],
            "orders",
            1,
            "prev_orders",
        )
        .unwrap();

        let months = string_column(&result, "month").unwrap();
        let prev = int64_column(&result, "prev_orders").unwrap();

        // Restaurant 1: 2023-11, 2024-01, 2024-03 (gap in February is skipped)
        assert_eq!(months.value(0), "2023-11");
        assert!(prev.is_null(0));
        assert_eq!(prev.value(1), 5);
        assert_eq!(months.value(2), "2024-03");
        assert_eq!(prev.value(2), 10);
        // Restaurant 2 starts a new partition
        assert!(prev.is_null(3));
    }

    #[test]
    fn test_lag_keeps_value_type() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("m", DataType::Int64, false),
            Field::new("sale", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![2, 1])),
                Arc::new(Float64Array::from(vec![20.5, 10.25])),
            ],
        )
        .unwrap();

        let result = lag(&batch, &[], &[SortKey::asc("m")], "sale", 1, "prev_sale").unwrap();
        let prev = float64_column(&result, "prev_sale").unwrap();
        assert!(prev.is_null(0));
        assert_eq!(prev.value(1), 10.25);
        assert!(result.schema().field_with_name("prev_sale").unwrap().is_nullable());
    }
}
