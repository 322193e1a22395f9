//! Table schemas

use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use std::sync::Arc;

pub const RESTAURANTS: &str = "restaurants";
pub const CUSTOMERS: &str = "customers";
pub const RIDERS: &str = "riders";
pub const ORDERS: &str = "orders";
pub const DELIVERIES: &str = "deliveries";

/// All tables, in load order (referenced tables first)
pub const TABLE_NAMES: [&str; 5] = [RESTAURANTS, CUSTOMERS, RIDERS, ORDERS, DELIVERIES];

fn time_type() -> DataType {
    DataType::Time64(TimeUnit::Microsecond)
}

/// Get schema for RESTAURANTS table
pub fn restaurants_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("restaurant_id", DataType::Int64, false),
        Field::new("restaurant_name", DataType::Utf8, false),
        Field::new("city", DataType::Utf8, false),
        Field::new("opening_hours", DataType::Utf8, false),
    ]))
}

/// Get schema for CUSTOMERS table
pub fn customers_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("customer_id", DataType::Int64, false),
        Field::new("customer_name", DataType::Utf8, false),
        Field::new("reg_date", DataType::Date32, false),
    ]))
}

/// Get schema for RIDERS table
pub fn riders_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("rider_id", DataType::Int64, false),
        Field::new("rider_name", DataType::Utf8, false),
        Field::new("sign_up", DataType::Date32, false),
    ]))
}

/// Get schema for ORDERS table
pub fn orders_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("order_id", DataType::Int64, false),
        Field::new("customer_id", DataType::Int64, false),
        Field::new("restaurant_id", DataType::Int64, false),
        Field::new("order_item", DataType::Utf8, false),
        Field::new("order_date", DataType::Date32, false),
        Field::new("order_time", time_type(), false),
        Field::new("order_status", DataType::Utf8, false),
        Field::new("total_amount", DataType::Float64, false),
    ]))
}

/// Get schema for DELIVERIES table
pub fn deliveries_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("delivery_id", DataType::Int64, false),
        Field::new("order_id", DataType::Int64, false),
        Field::new("delivery_status", DataType::Utf8, false),
        Field::new("delivery_time", time_type(), true),
        Field::new("rider_id", DataType::Int64, false),
    ]))
}

/// Schema for a table by name
pub fn table_schema(name: &str) -> Option<SchemaRef> {
    match name {
        RESTAURANTS => Some(restaurants_schema()),
        CUSTOMERS => Some(customers_schema()),
        RIDERS => Some(riders_schema()),
        ORDERS => Some(orders_schema()),
        DELIVERIES => Some(deliveries_schema()),
        _ => None,
    }
}
