//! The seventeen business reports
//!
//! Each report is a pure function of a [`Dataset`] snapshot and a
//! [`ReportConfig`], built from the relational operators in
//! [`crate::relation`]. Every report also carries its reference SQL.

mod common;
mod config;
mod customers;
mod restaurants;
mod riders;
mod sales;
pub mod sql;

pub use config::ReportConfig;
pub use customers::{
    customer_churn, customer_lifetime_value, customer_segmentation, customer_top_dishes,
    high_value_customers, order_value_analysis,
};
pub use restaurants::{
    cancellation_rate_comparison, order_frequency_by_day, orders_without_delivery,
    popular_dish_by_city, restaurant_growth_ratio, restaurant_revenue_ranking,
};
pub use riders::{rider_average_delivery_time, rider_monthly_earnings};
pub use sales::{city_revenue_ranking, monthly_sales_trend, popular_time_slots};

use crate::error::{QueryError, Result};
use crate::store::Dataset;
use arrow::record_batch::RecordBatch;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Report {
    CustomerTopDishes,
    PopularTimeSlots,
    OrderValueAnalysis,
    HighValueCustomers,
    OrdersWithoutDelivery,
    RestaurantRevenueRanking,
    PopularDishByCity,
    CustomerChurn,
    CancellationRateComparison,
    RiderAverageDeliveryTime,
    RestaurantGrowthRatio,
    CustomerSegmentation,
    RiderMonthlyEarnings,
    OrderFrequencyByDay,
    CustomerLifetimeValue,
    MonthlySalesTrend,
    CityRevenueRanking,
}

impl Report {
    /// All reports, in number order
    pub const ALL: [Report; 17] = [
        Report::CustomerTopDishes,
        Report::PopularTimeSlots,
        Report::OrderValueAnalysis,
        Report::HighValueCustomers,
        Report::OrdersWithoutDelivery,
        Report::RestaurantRevenueRanking,
        Report::PopularDishByCity,
        Report::CustomerChurn,
        Report::CancellationRateComparison,
        Report::RiderAverageDeliveryTime,
        Report::RestaurantGrowthRatio,
        Report::CustomerSegmentation,
        Report::RiderMonthlyEarnings,
        Report::OrderFrequencyByDay,
        Report::CustomerLifetimeValue,
        Report::MonthlySalesTrend,
        Report::CityRevenueRanking,
    ];

    /// Report number (1-17)
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|r| r == self)
            .map_or(0, |i| i + 1)
    }

    pub fn from_number(num: usize) -> Option<Report> {
        num.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Report::CustomerTopDishes => "customer_top_dishes",
            Report::PopularTimeSlots => "popular_time_slots",
            Report::OrderValueAnalysis => "order_value_analysis",
            Report::HighValueCustomers => "high_value_customers",
            Report::OrdersWithoutDelivery => "orders_without_delivery",
            Report::RestaurantRevenueRanking => "restaurant_revenue_ranking",
            Report::PopularDishByCity => "popular_dish_by_city",
            Report::CustomerChurn => "customer_churn",
            Report::CancellationRateComparison => "cancellation_rate_comparison",
            Report::RiderAverageDeliveryTime => "rider_average_delivery_time",
            Report::RestaurantGrowthRatio => "restaurant_growth_ratio",
            Report::CustomerSegmentation => "customer_segmentation",
            Report::RiderMonthlyEarnings => "rider_monthly_earnings",
            Report::OrderFrequencyByDay => "order_frequency_by_day",
            Report::CustomerLifetimeValue => "customer_lifetime_value",
            Report::MonthlySalesTrend => "monthly_sales_trend",
            Report::CityRevenueRanking => "city_revenue_ranking",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Report::CustomerTopDishes => "Top dishes of a customer per year",
            Report::PopularTimeSlots => "Popular two-hour ordering slots",
            Report::OrderValueAnalysis => "Average order value of frequent customers",
            Report::HighValueCustomers => "Customers above the spend threshold",
            Report::OrdersWithoutDelivery => "Orders not delivered, per restaurant",
            Report::RestaurantRevenueRanking => "Top restaurant per city over the last year",
            Report::PopularDishByCity => "Most popular dish per city",
            Report::CustomerChurn => "Customers lost between two years",
            Report::CancellationRateComparison => "Not-delivered rate per restaurant, two years",
            Report::RiderAverageDeliveryTime => "Average delivery time per rider",
            Report::RestaurantGrowthRatio => "Monthly delivered-order growth per restaurant",
            Report::CustomerSegmentation => "Gold and Silver customer segments",
            Report::RiderMonthlyEarnings => "Rider monthly revenue and commission",
            Report::OrderFrequencyByDay => "Busiest weekday per restaurant",
            Report::CustomerLifetimeValue => "Customer lifetime value",
            Report::MonthlySalesTrend => "Monthly sales against the previous month",
            Report::CityRevenueRanking => "City revenue ranking for one year",
        }
    }

    /// Reference SQL of the report, with the default parameters
    pub fn sql(&self) -> &'static str {
        match self {
            Report::CustomerTopDishes => sql::R1,
            Report::PopularTimeSlots => sql::R2,
            Report::OrderValueAnalysis => sql::R3,
            Report::HighValueCustomers => sql::R4,
            Report::OrdersWithoutDelivery => sql::R5,
            Report::RestaurantRevenueRanking => sql::R6,
            Report::PopularDishByCity => sql::R7,
            Report::CustomerChurn => sql::R8,
            Report::CancellationRateComparison => sql::R9,
            Report::RiderAverageDeliveryTime => sql::R10,
            Report::RestaurantGrowthRatio => sql::R11,
            Report::CustomerSegmentation => sql::R12,
            Report::RiderMonthlyEarnings => sql::R13,
            Report::OrderFrequencyByDay => sql::R14,
            Report::CustomerLifetimeValue => sql::R15,
            Report::MonthlySalesTrend => sql::R16,
            Report::CityRevenueRanking => sql::R17,
        }
    }

    /// Reference SQL to show next to a result computed with `config`. The
    /// query text always carries the default parameters, so it is headed by
    /// a comment when `config` overrides any of them.
    pub fn reference_sql(&self, config: &ReportConfig) -> String {
        let sql = self.sql().trim();
        if *config == ReportConfig::default() {
            sql.to_string()
        } else {
            format!(
                "-- Reference query with default parameters; \
                 the result below uses the active configuration\n{}",
                sql
            )
        }
    }

    /// Compute the report over `data`
    pub fn evaluate(&self, data: &Dataset, config: &ReportConfig) -> Result<RecordBatch> {
        match self {
            Report::CustomerTopDishes => customer_top_dishes(data, config),
            Report::PopularTimeSlots => popular_time_slots(data, config),
            Report::OrderValueAnalysis => order_value_analysis(data, config),
            Report::HighValueCustomers => high_value_customers(data, config),
            Report::OrdersWithoutDelivery => orders_without_delivery(data, config),
            Report::RestaurantRevenueRanking => restaurant_revenue_ranking(data, config),
            Report::PopularDishByCity => popular_dish_by_city(data, config),
            Report::CustomerChurn => customer_churn(data, config),
            Report::CancellationRateComparison => cancellation_rate_comparison(data, config),
            Report::RiderAverageDeliveryTime => rider_average_delivery_time(data, config),
            Report::RestaurantGrowthRatio => restaurant_growth_ratio(data, config),
            Report::CustomerSegmentation => customer_segmentation(data, config),
            Report::RiderMonthlyEarnings => rider_monthly_earnings(data, config),
            Report::OrderFrequencyByDay => order_frequency_by_day(data, config),
            Report::CustomerLifetimeValue => customer_lifetime_value(data, config),
            Report::MonthlySalesTrend => monthly_sales_trend(data, config),
            Report::CityRevenueRanking => city_revenue_ranking(data, config),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{:02} {}", self.number(), self.name())
    }
}

impl FromStr for Report {
    type Err = QueryError;

    /// Accepts a report number (`6`) or name (`restaurant_revenue_ranking`)
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(num) = s.parse::<usize>() {
            return Report::from_number(num)
                .ok_or_else(|| QueryError::ReportNotFound(s.to_string()));
        }
        Report::ALL
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| QueryError::ReportNotFound(s.to_string()))
    }
}

/// Get report by number (1-17)
pub fn get_report(num: usize) -> Option<Report> {
    Report::from_number(num)
}
