//! Building blocks shared by several reports

use crate::error::Result;
use crate::model::DeliveryStatus;
use crate::relation::scalar::{self, percentage};
use crate::relation::{
    date32_column, filter_rows, hash_join, int32_column, int64_column, string_column,
    with_column, JoinType,
};
use crate::store::Dataset;
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::Field;
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Append a derived column
pub(crate) fn derive(
    batch: &RecordBatch,
    name: &str,
    nullable: bool,
    array: ArrayRef,
) -> Result<RecordBatch> {
    let field = Field::new(name, array.data_type().clone(), nullable);
    with_column(batch, field, array)
}

/// Append the calendar year of `date_column` as Int32 column `output`
pub(crate) fn with_year(batch: &RecordBatch, date_column: &str, output: &str) -> Result<RecordBatch> {
    let years = scalar::year(date32_column(batch, date_column)?)?;
    derive(batch, output, false, Arc::new(years))
}

/// Append the `YYYY-MM` label of `date_column` as column `output`
pub(crate) fn with_year_month(
    batch: &RecordBatch,
    date_column: &str,
    output: &str,
) -> Result<RecordBatch> {
    let labels = scalar::year_month(date32_column(batch, date_column)?)?;
    derive(batch, output, false, Arc::new(labels))
}

/// Rows whose Int32 `column` equals `value`
pub(crate) fn filter_i32_eq(batch: &RecordBatch, column: &str, value: i32) -> Result<RecordBatch> {
    let values = int32_column(batch, column)?;
    filter_rows(batch, |row| values.is_valid(row) && values.value(row) == value)
}

/// Rows whose string `column` equals `value`
pub(crate) fn filter_str_eq(batch: &RecordBatch, column: &str, value: &str) -> Result<RecordBatch> {
    let values = string_column(batch, column)?;
    filter_rows(batch, |row| values.is_valid(row) && values.value(row) == value)
}

/// Rows whose Int64 `column` is greater than `threshold`
pub(crate) fn filter_i64_gt(batch: &RecordBatch, column: &str, threshold: i64) -> Result<RecordBatch> {
    let values = int64_column(batch, column)?;
    filter_rows(batch, |row| values.is_valid(row) && values.value(row) > threshold)
}

/// Every order, with its delivery columns (null where it has no delivery row)
pub(crate) fn orders_with_deliveries(data: &Dataset) -> Result<RecordBatch> {
    hash_join(
        data.orders(),
        data.deliveries(),
        &[("order_id", "order_id")],
        JoinType::Left,
    )
}

/// Orders that have a delivery row whose status is `Delivered`
pub(crate) fn delivered_orders(data: &Dataset) -> Result<RecordBatch> {
    let joined = hash_join(
        data.orders(),
        data.deliveries(),
        &[("order_id", "order_id")],
        JoinType::Inner,
    )?;
    filter_str_eq(&joined, "delivery_status", DeliveryStatus::DELIVERED)
}

/// Append Int64 column `output`: 1 where the order was not delivered (no
/// delivery row, or a delivery status other than `Delivered`), else 0.
/// Expects the output of [`orders_with_deliveries`].
pub(crate) fn with_not_delivered_flag(batch: &RecordBatch, output: &str) -> Result<RecordBatch> {
    let status = string_column(batch, "delivery_status")?;
    let flags: Int64Array = (0..batch.num_rows())
        .map(|row| {
            let delivered = status.is_valid(row) && status.value(row) == DeliveryStatus::DELIVERED;
            Some(i64::from(!delivered))
        })
        .collect();
    derive(batch, output, false, Arc::new(flags))
}

/// Append `numerator / denominator * 100` rounded to two decimals, null
/// where the denominator is zero or either side is null
pub(crate) fn with_percentage(
    batch: &RecordBatch,
    numerator: &str,
    denominator: &str,
    output: &str,
) -> Result<RecordBatch> {
    let num = int64_column(batch, numerator)?;
    let den = int64_column(batch, denominator)?;
    let ratios: Float64Array = (0..batch.num_rows())
        .map(|row| {
            if num.is_null(row) || den.is_null(row) {
                None
            } else {
                percentage(num.value(row) as f64, den.value(row) as f64)
            }
        })
        .collect();
    derive(batch, output, true, Arc::new(ratios))
}
