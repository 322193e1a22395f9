//! Entity records for the delivery dataset
//!
//! Restaurants, customers and riders are plain reference rows. Orders and
//! deliveries carry status values and the temporal fields the reports read.
//! `NewOrder` is the insert payload for an order: its optional fields are
//! resolved by the store according to the load rules (missing amount
//! defaults to zero, missing date or time is rejected).

use chrono::{NaiveDate, NaiveTime};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub city: String,
    pub opening_hours: String,
}

impl Restaurant {
    pub fn new(
        restaurant_id: i64,
        restaurant_name: impl Into<String>,
        city: impl Into<String>,
        opening_hours: impl Into<String>,
    ) -> Self {
        Self {
            restaurant_id,
            restaurant_name: restaurant_name.into(),
            city: city.into(),
            opening_hours: opening_hours.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub customer_id: i64,
    pub customer_name: String,
    pub reg_date: NaiveDate,
}

impl Customer {
    pub fn new(customer_id: i64, customer_name: impl Into<String>, reg_date: NaiveDate) -> Self {
        Self {
            customer_id,
            customer_name: customer_name.into(),
            reg_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rider {
    pub rider_id: i64,
    pub rider_name: String,
    pub sign_up: NaiveDate,
}

impl Rider {
    pub fn new(rider_id: i64, rider_name: impl Into<String>, sign_up: NaiveDate) -> Self {
        Self {
            rider_id,
            rider_name: rider_name.into(),
            sign_up,
        }
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Pending" => Self::Pending,
            "Delivered" => Self::Delivered,
            "Cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery outcome. Only `Delivered` counts as a completed delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    NotDelivered,
    Cancelled,
    Other(String),
}

impl DeliveryStatus {
    pub const DELIVERED: &'static str = "Delivered";

    pub fn as_str(&self) -> &str {
        match self {
            Self::Delivered => Self::DELIVERED,
            Self::NotDelivered => "Not Delivered",
            Self::Cancelled => "Cancelled",
            Self::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            Self::DELIVERED => Self::Delivered,
            "Not Delivered" => Self::NotDelivered,
            "Cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored order. Every field is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub order_item: String,
    pub order_date: NaiveDate,
    pub order_time: NaiveTime,
    pub order_status: OrderStatus,
    pub total_amount: f64,
}

/// Order insert payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order_id: i64,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub order_item: String,
    pub order_date: Option<NaiveDate>,
    pub order_time: Option<NaiveTime>,
    pub order_status: Option<OrderStatus>,
    pub total_amount: Option<f64>,
}

impl NewOrder {
    pub fn new(
        order_id: i64,
        customer_id: i64,
        restaurant_id: i64,
        order_item: impl Into<String>,
    ) -> Self {
        Self {
            order_id,
            customer_id,
            restaurant_id,
            order_item: order_item.into(),
            order_date: None,
            order_time: None,
            order_status: None,
            total_amount: None,
        }
    }

    pub fn placed_at(mut self, date: NaiveDate, time: NaiveTime) -> Self {
        self.order_date = Some(date);
        self.order_time = Some(time);
        self
    }

    pub fn amount(mut self, total_amount: f64) -> Self {
        self.total_amount = Some(total_amount);
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.order_status = Some(status);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub delivery_id: i64,
    pub order_id: i64,
    pub delivery_status: DeliveryStatus,
    /// Absent until the order is delivered
    pub delivery_time: Option<NaiveTime>,
    pub rider_id: i64,
}

impl Delivery {
    pub fn new(
        delivery_id: i64,
        order_id: i64,
        rider_id: i64,
        delivery_status: DeliveryStatus,
        delivery_time: Option<NaiveTime>,
    ) -> Self {
        Self {
            delivery_id,
            order_id,
            delivery_status,
            delivery_time,
            rider_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(OrderStatus::parse("Delivered"), OrderStatus::Delivered);
        assert_eq!(
            OrderStatus::parse("Not Fulfilled"),
            OrderStatus::Other("Not Fulfilled".to_string())
        );
        assert_eq!(DeliveryStatus::parse(" Delivered "), DeliveryStatus::Delivered);
        assert_eq!(DeliveryStatus::parse("Not Delivered"), DeliveryStatus::NotDelivered);
        assert!(!DeliveryStatus::parse("delivered").is_delivered());
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::default().to_string(), "Pending");
    }

    #[test]
    fn test_new_order_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let time = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
        let order = NewOrder::new(1, 2, 3, "Biryani")
            .placed_at(date, time)
            .amount(450.0);

        assert_eq!(order.order_date, Some(date));
        assert_eq!(order.order_time, Some(time));
        assert_eq!(order.total_amount, Some(450.0));
        assert_eq!(order.order_status, None);
    }
}
