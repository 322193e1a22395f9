//! Rider reports: delivery speed and monthly earnings

use crate::error::Result;
use crate::relation::scalar::{elapsed_minutes, round2};
use crate::relation::{
    aggregate, float64_column, hash_join, project, round_column, sort_batch, time64_column,
    AggregateExpr, JoinType, SortKey,
};
use crate::reports::common::{delivered_orders, derive, with_year_month};
use crate::reports::ReportConfig;
use crate::store::Dataset;
use arrow::array::{Array, Float64Array};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

fn with_rider_name(batch: &RecordBatch, data: &Dataset) -> Result<RecordBatch> {
    let riders = project(data.riders(), &["rider_id", "rider_name"])?;
    hash_join(batch, &riders, &[("rider_id", "rider_id")], JoinType::Inner)
}

/// Report 10: mean minutes from order to delivery per rider, over
/// delivered orders. A delivery time earlier than the order time is taken
/// to be on the next day.
pub fn rider_average_delivery_time(data: &Dataset, _config: &ReportConfig) -> Result<RecordBatch> {
    let delivered = delivered_orders(data)?;

    let ordered = time64_column(&delivered, "order_time")?;
    let arrived = time64_column(&delivered, "delivery_time")?;
    let minutes: Float64Array = (0..delivered.num_rows())
        .map(|row| {
            (ordered.is_valid(row) && arrived.is_valid(row))
                .then(|| elapsed_minutes(ordered.value(row), arrived.value(row)))
        })
        .collect();
    let delivered = derive(&delivered, "delivery_minutes", true, Arc::new(minutes))?;

    let per_rider = aggregate(
        &delivered,
        &["rider_id"],
        &[AggregateExpr::avg("delivery_minutes", "avg_delivery_time_mins")],
    )?;
    let named = with_rider_name(&per_rider, data)?;

    let result = project(&named, &["rider_id", "rider_name", "avg_delivery_time_mins"])?;
    let result = round_column(&result, "avg_delivery_time_mins")?;
    sort_batch(&result, &[SortKey::asc("rider_id")])
}

/// Report 13: revenue of the orders each rider carried per month, and the
/// rider's commission on it. Every delivery row counts, whatever its status.
pub fn rider_monthly_earnings(data: &Dataset, config: &ReportConfig) -> Result<RecordBatch> {
    let carried = hash_join(
        data.orders(),
        data.deliveries(),
        &[("order_id", "order_id")],
        JoinType::Inner,
    )?;
    let carried = with_year_month(&carried, "order_date", "month")?;

    let monthly = aggregate(
        &carried,
        &["rider_id", "month"],
        &[AggregateExpr::sum("total_amount", "total_revenue")],
    )?;

    let revenue = float64_column(&monthly, "total_revenue")?;
    let rate = config.rider_commission_rate;
    let earnings: Float64Array = revenue.iter().map(|r| r.map(|r| round2(r * rate))).collect();
    let monthly = derive(&monthly, "rider_earning", true, Arc::new(earnings))?;
    let monthly = round_column(&monthly, "total_revenue")?;

    let named = with_rider_name(&monthly, data)?;
    let result = project(
        &named,
        &["rider_id", "rider_name", "month", "total_revenue", "rider_earning"],
    )?;
    sort_batch(&result, &[SortKey::asc("rider_id"), SortKey::asc("month")])
}
