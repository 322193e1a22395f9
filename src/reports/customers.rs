//! Customer reports: favourite dishes, order value, spend, churn,
//! segmentation and lifetime value

use crate::error::Result;
use crate::relation::{
    aggregate, filter_rows, float64_column, hash_join, int64_column, project, project_as, rank,
    round_column, sort_batch, AggregateExpr, JoinType, RankKind, SortKey,
};
use crate::reports::common::{derive, filter_i32_eq, filter_i64_gt, filter_str_eq, with_year};
use crate::reports::ReportConfig;
use crate::store::Dataset;
use arrow::array::{Array, StringArray};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Attach `customer_name` to a batch keyed by `customer_id`
fn with_customer_name(batch: &RecordBatch, data: &Dataset) -> Result<RecordBatch> {
    let names = project(data.customers(), &["customer_id", "customer_name"])?;
    hash_join(batch, &names, &[("customer_id", "customer_id")], JoinType::Inner)
}

/// Report 1: the configured customer's most-ordered dishes per year, dense
/// ranked, keeping ranks up to `top_n`
pub fn customer_top_dishes(data: &Dataset, config: &ReportConfig) -> Result<RecordBatch> {
    let orders = with_customer_name(data.orders(), data)?;
    let orders = filter_str_eq(&orders, "customer_name", &config.customer_name)?;
    let orders = with_year(&orders, "order_date", "order_year")?;

    let counts = aggregate(
        &orders,
        &["customer_name", "order_year", "order_item"],
        &[AggregateExpr::count("total_orders")],
    )?;
    let ranked = rank(
        &counts,
        &["order_year"],
        &[SortKey::desc("total_orders")],
        RankKind::DenseRank,
        "rank",
    )?;

    let ranks = int64_column(&ranked, "rank")?;
    let top = filter_rows(&ranked, |row| ranks.value(row) <= config.top_n)?;

    let result = project_as(
        &top,
        &[
            ("customer_name", "customer_name"),
            ("order_year", "order_year"),
            ("order_item", "dish_name"),
            ("total_orders", "total_orders"),
        ],
    )?;
    sort_batch(
        &result,
        &[
            SortKey::asc("order_year"),
            SortKey::desc("total_orders"),
            SortKey::asc("dish_name"),
        ],
    )
}

/// Report 3: average order value of customers with more than
/// `min_order_count` orders
pub fn order_value_analysis(data: &Dataset, config: &ReportConfig) -> Result<RecordBatch> {
    let per_customer = aggregate(
        data.orders(),
        &["customer_id"],
        &[
            AggregateExpr::count("total_orders"),
            AggregateExpr::avg("total_amount", "aov"),
        ],
    )?;
    let frequent = filter_i64_gt(&per_customer, "total_orders", config.min_order_count)?;
    let named = with_customer_name(&frequent, data)?;

    let result = project(&named, &["customer_id", "customer_name", "total_orders", "aov"])?;
    let result = round_column(&result, "aov")?;
    sort_batch(&result, &[SortKey::desc("aov"), SortKey::asc("customer_id")])
}

/// Report 4: customers whose total spend exceeds `min_total_spent`
pub fn high_value_customers(data: &Dataset, config: &ReportConfig) -> Result<RecordBatch> {
    let per_customer = aggregate(
        data.orders(),
        &["customer_id"],
        &[AggregateExpr::sum("total_amount", "total_spent")],
    )?;

    let spent = float64_column(&per_customer, "total_spent")?;
    let threshold = config.min_total_spent;
    let big = filter_rows(&per_customer, |row| {
        spent.is_valid(row) && spent.value(row) > threshold
    })?;
    let named = with_customer_name(&big, data)?;

    let result = project(&named, &["customer_id", "customer_name", "total_spent"])?;
    let result = round_column(&result, "total_spent")?;
    sort_batch(
        &result,
        &[SortKey::desc("total_spent"), SortKey::asc("customer_id")],
    )
}

/// Distinct customer ids with at least one order in `year`
fn customers_in_year(orders: &RecordBatch, year: i32) -> Result<RecordBatch> {
    let in_year = filter_i32_eq(orders, "order_year", year)?;
    aggregate(&in_year, &["customer_id"], &[])
}

/// Report 8: customers who ordered in `churn_from_year` but not in
/// `churn_to_year`
pub fn customer_churn(data: &Dataset, config: &ReportConfig) -> Result<RecordBatch> {
    let orders = with_year(data.orders(), "order_date", "order_year")?;
    let before = customers_in_year(&orders, config.churn_from_year)?;
    let after = customers_in_year(&orders, config.churn_to_year)?;

    let churned = hash_join(&before, &after, &[("customer_id", "customer_id")], JoinType::Anti)?;
    let named = with_customer_name(&churned, data)?;

    let result = project(&named, &["customer_id", "customer_name"])?;
    sort_batch(&result, &[SortKey::asc("customer_id")])
}

/// Mean `total_amount` over all orders; `None` without orders
fn global_average_order_value(data: &Dataset) -> Result<Option<f64>> {
    let overall = aggregate(
        data.orders(),
        &[],
        &[AggregateExpr::avg("total_amount", "aov")],
    )?;
    let aov = float64_column(&overall, "aov")?;
    Ok((aov.len() == 1 && aov.is_valid(0)).then(|| aov.value(0)))
}

/// Report 12: customers whose total spend exceeds the global average order
/// value are `Gold`, everyone else `Silver`; order count and revenue per
/// segment
pub fn customer_segmentation(data: &Dataset, _config: &ReportConfig) -> Result<RecordBatch> {
    let global_aov = global_average_order_value(data)?;

    let per_customer = aggregate(
        data.orders(),
        &["customer_id"],
        &[
            AggregateExpr::count("total_orders"),
            AggregateExpr::sum("total_amount", "total_spent"),
        ],
    )?;

    let spent = float64_column(&per_customer, "total_spent")?;
    let categories: StringArray = (0..per_customer.num_rows())
        .map(|row| {
            let gold = match global_aov {
                Some(aov) => spent.is_valid(row) && spent.value(row) > aov,
                None => false,
            };
            Some(if gold { "Gold" } else { "Silver" })
        })
        .collect();
    let segmented = derive(&per_customer, "customer_category", false, Arc::new(categories))?;

    let result = aggregate(
        &segmented,
        &["customer_category"],
        &[
            AggregateExpr::sum("total_orders", "total_orders"),
            AggregateExpr::sum("total_spent", "total_revenue"),
        ],
    )?;
    let result = round_column(&result, "total_revenue")?;
    sort_batch(&result, &[SortKey::asc("customer_category")])
}

/// Report 15: total order value per customer
pub fn customer_lifetime_value(data: &Dataset, _config: &ReportConfig) -> Result<RecordBatch> {
    let per_customer = aggregate(
        data.orders(),
        &["customer_id"],
        &[AggregateExpr::sum("total_amount", "clv")],
    )?;
    let named = with_customer_name(&per_customer, data)?;

    let result = project(&named, &["customer_id", "customer_name", "clv"])?;
    let result = round_column(&result, "clv")?;
    sort_batch(&result, &[SortKey::desc("clv"), SortKey::asc("customer_id")])
}
