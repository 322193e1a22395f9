//! Sales reports: ordering hours, monthly trend and city ranking

use crate::error::Result;
use crate::relation::scalar::{hour, month};
use crate::relation::{
    aggregate, date32_column, hash_join, lag, project, rank, round_column, sort_batch,
    time64_column, AggregateExpr, JoinType, RankKind, SortKey,
};
use crate::reports::common::{derive, filter_i32_eq, with_year};
use crate::reports::ReportConfig;
use crate::store::Dataset;
use arrow::array::Int32Array;
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Width of a time slot in hours
const SLOT_HOURS: i32 = 2;

/// Report 2: orders per two-hour slot of the day
pub fn popular_time_slots(data: &Dataset, _config: &ReportConfig) -> Result<RecordBatch> {
    let orders = data.orders();
    let hours = hour(time64_column(orders, "order_time")?);
    let starts: Int32Array = hours
        .iter()
        .map(|h| h.map(|h| h / SLOT_HOURS * SLOT_HOURS))
        .collect();
    let ends: Int32Array = starts.iter().map(|s| s.map(|s| s + SLOT_HOURS)).collect();

    let orders = derive(orders, "start_hour", false, Arc::new(starts))?;
    let orders = derive(&orders, "end_hour", false, Arc::new(ends))?;

    let slots = aggregate(
        &orders,
        &["start_hour", "end_hour"],
        &[AggregateExpr::count("total_orders")],
    )?;
    sort_batch(
        &slots,
        &[SortKey::desc("total_orders"), SortKey::asc("start_hour")],
    )
}

/// Report 16: total sales per calendar month with the previous month's
/// total. "Previous" is the previous month present in the data, so months
/// without orders are skipped; the first month has none.
pub fn monthly_sales_trend(data: &Dataset, _config: &ReportConfig) -> Result<RecordBatch> {
    let orders = with_year(data.orders(), "order_date", "year")?;
    let months = month(date32_column(&orders, "order_date")?)?;
    let orders = derive(&orders, "month", false, Arc::new(months))?;

    let monthly = aggregate(
        &orders,
        &["year", "month"],
        &[AggregateExpr::sum("total_amount", "total_sale")],
    )?;
    let monthly = round_column(&monthly, "total_sale")?;
    let trend = lag(
        &monthly,
        &[],
        &[SortKey::asc("year"), SortKey::asc("month")],
        "total_sale",
        1,
        "previous_month_sale",
    )?;

    project(
        &trend,
        &["year", "month", "total_sale", "previous_month_sale"],
    )
}

/// Report 17: revenue per city in `city_revenue_year`, ranked across
/// cities. Ties share a rank and the next rank skips.
pub fn city_revenue_ranking(data: &Dataset, config: &ReportConfig) -> Result<RecordBatch> {
    let orders = with_year(data.orders(), "order_date", "order_year")?;
    let orders = filter_i32_eq(&orders, "order_year", config.city_revenue_year)?;

    let cities = project(data.restaurants(), &["restaurant_id", "city"])?;
    let orders = hash_join(
        &orders,
        &cities,
        &[("restaurant_id", "restaurant_id")],
        JoinType::Inner,
    )?;

    let revenue = aggregate(
        &orders,
        &["city"],
        &[AggregateExpr::sum("total_amount", "total_revenue")],
    )?;
    let revenue = round_column(&revenue, "total_revenue")?;
    let ranked = rank(
        &revenue,
        &[],
        &[SortKey::desc("total_revenue")],
        RankKind::Rank,
        "city_rank",
    )?;

    sort_batch(&ranked, &[SortKey::asc("city_rank"), SortKey::asc("city")])
}
