//! Restaurant reports: missed deliveries, revenue ranking, popular dishes,
//! cancellation rates, growth and busiest weekday

use crate::error::{QueryError, Result};
use crate::relation::scalar::{date_to_days, days_to_date, max_date, percentage, weekday_name};
use crate::relation::{
    aggregate, date32_column, filter_rows, hash_join, int64_column, lag, project, project_as, rank,
    round_column, sort_batch, AggregateExpr, JoinType, RankKind, SortKey,
};
use crate::reports::common::{
    delivered_orders, derive, filter_i32_eq, orders_with_deliveries, with_not_delivered_flag,
    with_percentage, with_year, with_year_month,
};
use crate::reports::ReportConfig;
use crate::store::Dataset;
use arrow::array::{Array, Float64Array};
use arrow::record_batch::RecordBatch;
use chrono::Months;
use std::sync::Arc;

/// Attach restaurant name and city to a batch keyed by `restaurant_id`
fn with_restaurant(batch: &RecordBatch, data: &Dataset) -> Result<RecordBatch> {
    let restaurants = project(data.restaurants(), &["restaurant_id", "restaurant_name", "city"])?;
    hash_join(
        batch,
        &restaurants,
        &[("restaurant_id", "restaurant_id")],
        JoinType::Inner,
    )
}

/// Keep rows whose Int64 `rank` column is 1
fn first_ranked(batch: &RecordBatch, column: &str) -> Result<RecordBatch> {
    let ranks = int64_column(batch, column)?;
    filter_rows(batch, |row| ranks.value(row) == 1)
}

/// Report 5: per restaurant, orders with no delivery row or a delivery
/// status other than `Delivered`
pub fn orders_without_delivery(data: &Dataset, _config: &ReportConfig) -> Result<RecordBatch> {
    let orders = orders_with_deliveries(data)?;
    let orders = with_not_delivered_flag(&orders, "missed")?;
    let flags = int64_column(&orders, "missed")?;
    let missed = filter_rows(&orders, |row| flags.value(row) == 1)?;

    let counts = aggregate(
        &missed,
        &["restaurant_id"],
        &[AggregateExpr::count("not_delivered")],
    )?;
    let named = with_restaurant(&counts, data)?;

    let result = project(
        &named,
        &["restaurant_id", "restaurant_name", "city", "not_delivered"],
    )?;
    sort_batch(
        &result,
        &[SortKey::desc("not_delivered"), SortKey::asc("restaurant_id")],
    )
}

/// Report 6: top restaurant by revenue in each city over the year ending
/// at the latest order date (both ends inclusive). Ties share rank 1.
pub fn restaurant_revenue_ranking(data: &Dataset, _config: &ReportConfig) -> Result<RecordBatch> {
    let dates = date32_column(data.orders(), "order_date")?;
    let window = match max_date(dates) {
        Some(latest) => {
            let end = days_to_date(latest)?;
            let start = end.checked_sub_months(Months::new(12)).ok_or_else(|| {
                QueryError::InvalidValue(format!("no date one year before {}", end))
            })?;
            Some((date_to_days(start), latest))
        }
        None => None,
    };

    let recent = filter_rows(data.orders(), |row| match window {
        Some((start, end)) => dates.is_valid(row) && (start..=end).contains(&dates.value(row)),
        None => false,
    })?;
    let recent = with_restaurant(&recent, data)?;

    let revenue = aggregate(
        &recent,
        &["city", "restaurant_id", "restaurant_name"],
        &[AggregateExpr::sum("total_amount", "total_revenue")],
    )?;
    let revenue = round_column(&revenue, "total_revenue")?;
    let ranked = rank(
        &revenue,
        &["city"],
        &[SortKey::desc("total_revenue")],
        RankKind::Rank,
        "rank",
    )?;
    let top = first_ranked(&ranked, "rank")?;

    let result = project(&top, &["city", "restaurant_name", "total_revenue", "rank"])?;
    sort_batch(
        &result,
        &[SortKey::asc("city"), SortKey::asc("restaurant_name")],
    )
}

/// Report 7: most-ordered dish in each city. Ties share rank 1.
pub fn popular_dish_by_city(data: &Dataset, _config: &ReportConfig) -> Result<RecordBatch> {
    let orders = with_restaurant(data.orders(), data)?;
    let counts = aggregate(
        &orders,
        &["city", "order_item"],
        &[AggregateExpr::count("total_orders")],
    )?;
    let ranked = rank(
        &counts,
        &["city"],
        &[SortKey::desc("total_orders")],
        RankKind::DenseRank,
        "rank",
    )?;
    let top = first_ranked(&ranked, "rank")?;

    let result = project_as(
        &top,
        &[
            ("city", "city"),
            ("order_item", "dish_name"),
            ("total_orders", "total_orders"),
            ("rank", "rank"),
        ],
    )?;
    sort_batch(&result, &[SortKey::asc("city"), SortKey::asc("dish_name")])
}

/// Not-delivered percentage per restaurant for one year, as columns
/// `restaurant_id` and `output`
fn not_delivered_ratio(orders: &RecordBatch, year: i32, output: &str) -> Result<RecordBatch> {
    let in_year = filter_i32_eq(orders, "order_year", year)?;
    let counts = aggregate(
        &in_year,
        &["restaurant_id"],
        &[
            AggregateExpr::count("total_orders"),
            AggregateExpr::sum("missed", "not_delivered"),
        ],
    )?;
    let ratios = with_percentage(&counts, "not_delivered", "total_orders", output)?;
    project(&ratios, &["restaurant_id", output])
}

/// Report 9: not-delivered percentage of each restaurant in two years,
/// side by side. Restaurants without orders in both years are dropped.
pub fn cancellation_rate_comparison(data: &Dataset, config: &ReportConfig) -> Result<RecordBatch> {
    let (first, second) = config.comparison_years;
    if first == second {
        return Err(QueryError::InvalidValue(format!(
            "comparison years must differ, got {} twice",
            first
        )));
    }

    let orders = orders_with_deliveries(data)?;
    let orders = with_not_delivered_flag(&orders, "missed")?;
    let orders = with_year(&orders, "order_date", "order_year")?;

    let first_col = format!("cancel_ratio_{}", first);
    let second_col = format!("cancel_ratio_{}", second);
    let first_ratios = not_delivered_ratio(&orders, first, &first_col)?;
    let second_ratios = not_delivered_ratio(&orders, second, &second_col)?;

    let both = hash_join(
        &first_ratios,
        &second_ratios,
        &[("restaurant_id", "restaurant_id")],
        JoinType::Inner,
    )?;
    let named = with_restaurant(&both, data)?;

    let result = project(
        &named,
        &["restaurant_id", "restaurant_name", first_col.as_str(), second_col.as_str()],
    )?;
    sort_batch(&result, &[SortKey::asc("restaurant_id")])
}

/// Report 11: delivered orders per restaurant per month against the
/// restaurant's previous month with orders, as a percentage change.
/// The first month of each restaurant has nothing to compare and is left out.
pub fn restaurant_growth_ratio(data: &Dataset, _config: &ReportConfig) -> Result<RecordBatch> {
    let delivered = delivered_orders(data)?;
    let delivered = with_year_month(&delivered, "order_date", "month")?;

    let monthly = aggregate(
        &delivered,
        &["restaurant_id", "month"],
        &[AggregateExpr::count("current_month_orders")],
    )?;
    let with_previous = lag(
        &monthly,
        &["restaurant_id"],
        &[SortKey::asc("month")],
        "current_month_orders",
        1,
        "previous_month_orders",
    )?;

    let previous = int64_column(&with_previous, "previous_month_orders")?;
    let compared = filter_rows(&with_previous, |row| previous.is_valid(row))?;

    let current = int64_column(&compared, "current_month_orders")?;
    let previous = int64_column(&compared, "previous_month_orders")?;
    let growth: Float64Array = (0..compared.num_rows())
        .map(|row| {
            let prev = previous.value(row) as f64;
            percentage(current.value(row) as f64 - prev, prev)
        })
        .collect();
    let result = derive(&compared, "growth_ratio", true, Arc::new(growth))?;

    let result = project(
        &result,
        &[
            "restaurant_id",
            "month",
            "current_month_orders",
            "previous_month_orders",
            "growth_ratio",
        ],
    )?;
    sort_batch(
        &result,
        &[SortKey::asc("restaurant_id"), SortKey::asc("month")],
    )
}

/// Report 14: busiest weekday of each restaurant. Ties share rank 1.
pub fn order_frequency_by_day(data: &Dataset, _config: &ReportConfig) -> Result<RecordBatch> {
    let orders = with_restaurant(data.orders(), data)?;
    let days = weekday_name(date32_column(&orders, "order_date")?)?;
    let orders = derive(&orders, "day_of_week", false, Arc::new(days))?;

    let counts = aggregate(
        &orders,
        &["restaurant_id", "restaurant_name", "day_of_week"],
        &[AggregateExpr::count("total_orders")],
    )?;
    let ranked = rank(
        &counts,
        &["restaurant_id"],
        &[SortKey::desc("total_orders")],
        RankKind::DenseRank,
        "rank",
    )?;
    let top = first_ranked(&ranked, "rank")?;

    let result = project(&top, &["restaurant_name", "day_of_week", "total_orders"])?;
    sort_batch(
        &result,
        &[SortKey::asc("restaurant_name"), SortKey::asc("day_of_week")],
    )
}
