//! In-memory food-delivery store
//!
//! Holds typed rows for the five tables and enforces the load rules on
//! insert: unique primary keys, existing foreign-key targets, required
//! order date and time, a non-negative order amount (defaulting to zero),
//! and at most one delivery per order. Rows are never updated or deleted.

use crate::error::{QueryError, Result};
use crate::model::{Customer, Delivery, NewOrder, Order, Restaurant, Rider};
use crate::relation::scalar::{date_to_days, time_to_micros};
use crate::store::dataset::Dataset;
use crate::store::schema::*;
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray, Time64MicrosecondArray};
use arrow::record_batch::RecordBatch;
use hashbrown::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct FoodStore {
    restaurants: Vec<Restaurant>,
    customers: Vec<Customer>,
    riders: Vec<Rider>,
    orders: Vec<Order>,
    deliveries: Vec<Delivery>,

    restaurant_ids: HashSet<i64>,
    customer_ids: HashSet<i64>,
    rider_ids: HashSet<i64>,
    order_ids: HashSet<i64>,
    delivery_ids: HashSet<i64>,
    /// Orders that already have a delivery row
    delivered_order_ids: HashSet<i64>,
}

fn ensure_new(ids: &HashSet<i64>, table: &'static str, column: &'static str, id: i64) -> Result<()> {
    if ids.contains(&id) {
        Err(QueryError::DuplicateKey {
            table,
            column,
            value: id,
        })
    } else {
        Ok(())
    }
}

fn ensure_exists(
    ids: &HashSet<i64>,
    table: &'static str,
    column: &'static str,
    id: i64,
) -> Result<()> {
    if ids.contains(&id) {
        Ok(())
    } else {
        Err(QueryError::ForeignKey {
            table,
            column,
            value: id,
        })
    }
}

impl FoodStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_restaurant(&mut self, restaurant: Restaurant) -> Result<()> {
        ensure_new(
            &self.restaurant_ids,
            RESTAURANTS,
            "restaurant_id",
            restaurant.restaurant_id,
        )?;
        self.restaurant_ids.insert(restaurant.restaurant_id);
        self.restaurants.push(restaurant);
        Ok(())
    }

    pub fn insert_customer(&mut self, customer: Customer) -> Result<()> {
        ensure_new(&self.customer_ids, CUSTOMERS, "customer_id", customer.customer_id)?;
        self.customer_ids.insert(customer.customer_id);
        self.customers.push(customer);
        Ok(())
    }

    pub fn insert_rider(&mut self, rider: Rider) -> Result<()> {
        ensure_new(&self.rider_ids, RIDERS, "rider_id", rider.rider_id)?;
        self.rider_ids.insert(rider.rider_id);
        self.riders.push(rider);
        Ok(())
    }

    /// Insert an order. A missing `total_amount` is stored as 0 and a
    /// missing status as `Pending`; a missing date or time is rejected.
    pub fn insert_order(&mut self, order: NewOrder) -> Result<()> {
        let id = order.order_id;
        ensure_new(&self.order_ids, ORDERS, "order_id", id)?;
        ensure_exists(&self.customer_ids, ORDERS, "customer_id", order.customer_id)?;
        ensure_exists(
            &self.restaurant_ids,
            ORDERS,
            "restaurant_id",
            order.restaurant_id,
        )?;

        let order_date = order.order_date.ok_or(QueryError::MissingField {
            table: ORDERS,
            column: "order_date",
            id,
        })?;
        let order_time = order.order_time.ok_or(QueryError::MissingField {
            table: ORDERS,
            column: "order_time",
            id,
        })?;

        let total_amount = order.total_amount.unwrap_or(0.0);
        if !total_amount.is_finite() || total_amount < 0.0 {
            return Err(QueryError::InvalidValue(format!(
                "orders.total_amount = {} for order {} must be a non-negative number",
                total_amount, id
            )));
        }

        self.order_ids.insert(id);
        self.orders.push(Order {
            order_id: id,
            customer_id: order.customer_id,
            restaurant_id: order.restaurant_id,
            order_item: order.order_item,
            order_date,
            order_time,
            order_status: order.order_status.unwrap_or_default(),
            total_amount,
        });
        Ok(())
    }

    pub fn insert_delivery(&mut self, delivery: Delivery) -> Result<()> {
        ensure_new(
            &self.delivery_ids,
            DELIVERIES,
            "delivery_id",
            delivery.delivery_id,
        )?;
        ensure_exists(&self.order_ids, DELIVERIES, "order_id", delivery.order_id)?;
        ensure_exists(&self.rider_ids, DELIVERIES, "rider_id", delivery.rider_id)?;
        ensure_new(
            &self.delivered_order_ids,
            DELIVERIES,
            "order_id",
            delivery.order_id,
        )?;

        self.delivery_ids.insert(delivery.delivery_id);
        self.delivered_order_ids.insert(delivery.order_id);
        self.deliveries.push(delivery);
        Ok(())
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn riders(&self) -> &[Rider] {
        &self.riders
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Build an immutable Arrow snapshot of the current contents
    pub fn snapshot(&self) -> Result<Dataset> {
        Dataset::try_new(
            self.restaurants_batch()?,
            self.customers_batch()?,
            self.riders_batch()?,
            self.orders_batch()?,
            self.deliveries_batch()?,
        )
    }

    fn restaurants_batch(&self) -> Result<RecordBatch> {
        let rows = &self.restaurants;
        RecordBatch::try_new(
            restaurants_schema(),
            vec![
                Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.restaurant_id))),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.restaurant_name.as_str()),
                )),
                Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.city.as_str()))),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.opening_hours.as_str()),
                )),
            ],
        )
        .map_err(Into::into)
    }

    fn customers_batch(&self) -> Result<RecordBatch> {
        let rows = &self.customers;
        RecordBatch::try_new(
            customers_schema(),
            vec![
                Arc::new(Int64Array::from_iter_values(rows.iter().map(|c| c.customer_id))),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|c| c.customer_name.as_str()),
                )),
                Arc::new(Date32Array::from_iter_values(
                    rows.iter().map(|c| date_to_days(c.reg_date)),
                )),
            ],
        )
        .map_err(Into::into)
    }

    fn riders_batch(&self) -> Result<RecordBatch> {
        let rows = &self.riders;
        RecordBatch::try_new(
            riders_schema(),
            vec![
                Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.rider_id))),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.rider_name.as_str()),
                )),
                Arc::new(Date32Array::from_iter_values(
                    rows.iter().map(|r| date_to_days(r.sign_up)),
                )),
            ],
        )
        .map_err(Into::into)
    }

    fn orders_batch(&self) -> Result<RecordBatch> {
        let rows = &self.orders;
        RecordBatch::try_new(
            orders_schema(),
            vec![
                Arc::new(Int64Array::from_iter_values(rows.iter().map(|o| o.order_id))),
                Arc::new(Int64Array::from_iter_values(rows.iter().map(|o| o.customer_id))),
                Arc::new(Int64Array::from_iter_values(rows.iter().map(|o| o.restaurant_id))),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|o| o.order_item.as_str()),
                )),
                Arc::new(Date32Array::from_iter_values(
                    rows.iter().map(|o| date_to_days(o.order_date)),
                )),
                Arc::new(Time64MicrosecondArray::from_iter_values(
                    rows.iter().map(|o| time_to_micros(o.order_time)),
                )),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|o| o.order_status.as_str()),
                )),
                Arc::new(Float64Array::from_iter_values(rows.iter().map(|o| o.total_amount))),
            ],
        )
        .map_err(Into::into)
    }

    fn deliveries_batch(&self) -> Result<RecordBatch> {
        let rows = &self.deliveries;
        RecordBatch::try_new(
            deliveries_schema(),
            vec![
                Arc::new(Int64Array::from_iter_values(rows.iter().map(|d| d.delivery_id))),
                Arc::new(Int64Array::from_iter_values(rows.iter().map(|d| d.order_id))),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|d| d.delivery_status.as_str()),
                )),
                Arc::new(Time64MicrosecondArray::from(
                    rows.iter()
                        .map(|d| d.delivery_time.map(time_to_micros))
                        .collect::<Vec<_>>(),
                )),
                Arc::new(Int64Array::from_iter_values(rows.iter().map(|d| d.rider_id))),
            ],
        )
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeliveryStatus, OrderStatus};
    use crate::relation::{float64_column, string_column, time64_column};
    use arrow::array::Array;
    use chrono::{NaiveDate, NaiveTime};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn time() -> NaiveTime {
        NaiveTime::from_hms_opt(19, 30, 0).unwrap()
    }

    fn seeded_store() -> FoodStore {
        let mut store = FoodStore::new();
        store
            .insert_restaurant(Restaurant::new(1, "Spice Route", "Delhi", "9 AM - 11 PM"))
            .unwrap();
        store
            .insert_customer(Customer::new(1, "Arjun Mehta", date()))
            .unwrap();
        store.insert_rider(Rider::new(1, "Ravi", date())).unwrap();
        store
    }

    #[test]
    fn test_insert_and_snapshot() {
        let mut store = seeded_store();
        store
            .insert_order(NewOrder::new(1, 1, 1, "Paneer Tikka").placed_at(date(), time()).amount(320.5))
            .unwrap();
        store
            .insert_delivery(Delivery::new(1, 1, 1, DeliveryStatus::Delivered, Some(time())))
            .unwrap();

        let data = store.snapshot().unwrap();
        assert_eq!(
            data.row_counts(),
            vec![
                (RESTAURANTS, 1),
                (CUSTOMERS, 1),
                (RIDERS, 1),
                (ORDERS, 1),
                (DELIVERIES, 1)
            ]
        );
        let status = string_column(data.orders(), "order_status").unwrap();
        assert_eq!(status.value(0), "Pending");
        let times = time64_column(data.deliveries(), "delivery_time").unwrap();
        assert_eq!(times.value(0), time_to_micros(time()));
    }

    #[test]
    fn test_missing_amount_defaults_to_zero() {
        let mut store = seeded_store();
        store
            .insert_order(
                NewOrder::new(1, 1, 1, "Dal")
                    .placed_at(date(), time())
                    .status(OrderStatus::Delivered),
            )
            .unwrap();

        assert_eq!(store.orders()[0].total_amount, 0.0);
        let data = store.snapshot().unwrap();
        let amounts = float64_column(data.orders(), "total_amount").unwrap();
        assert_eq!(amounts.value(0), 0.0);
        assert_eq!(amounts.null_count(), 0);
    }

    #[test]
    fn test_missing_date_or_time_rejected() {
        let mut store = seeded_store();
        let mut no_date = NewOrder::new(1, 1, 1, "Dal").amount(10.0);
        no_date.order_time = Some(time());
        assert!(matches!(
            store.insert_order(no_date),
            Err(QueryError::MissingField {
                column: "order_date",
                ..
            })
        ));

        let mut no_time = NewOrder::new(2, 1, 1, "Dal").amount(10.0);
        no_time.order_date = Some(date());
        assert!(matches!(
            store.insert_order(no_time),
            Err(QueryError::MissingField {
                column: "order_time",
                ..
            })
        ));
        assert!(store.orders().is_empty());
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let mut store = seeded_store();
        let order = NewOrder::new(1, 99, 1, "Dal").placed_at(date(), time());
        assert!(matches!(
            store.insert_order(order),
            Err(QueryError::ForeignKey {
                column: "customer_id",
                value: 99,
                ..
            })
        ));

        let order = NewOrder::new(1, 1, 42, "Dal").placed_at(date(), time());
        assert!(matches!(
            store.insert_order(order),
            Err(QueryError::ForeignKey {
                column: "restaurant_id",
                ..
            })
        ));

        let delivery = Delivery::new(1, 5, 1, DeliveryStatus::Delivered, None);
        assert!(matches!(
            store.insert_delivery(delivery),
            Err(QueryError::ForeignKey {
                column: "order_id",
                ..
            })
        ));
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut store = seeded_store();
        assert!(matches!(
            store.insert_restaurant(Restaurant::new(1, "Again", "Pune", "")),
            Err(QueryError::DuplicateKey { .. })
        ));

        store
            .insert_order(NewOrder::new(1, 1, 1, "Dal").placed_at(date(), time()))
            .unwrap();
        store
            .insert_delivery(Delivery::new(1, 1, 1, DeliveryStatus::NotDelivered, None))
            .unwrap();

        // Second delivery for the same order
        assert!(matches!(
            store.insert_delivery(Delivery::new(2, 1, 1, DeliveryStatus::Delivered, None)),
            Err(QueryError::DuplicateKey {
                column: "order_id",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut store = seeded_store();
        let order = NewOrder::new(1, 1, 1, "Dal")
            .placed_at(date(), time())
            .amount(-5.0);
        assert!(matches!(
            store.insert_order(order),
            Err(QueryError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_empty_snapshot() {
        let data = FoodStore::new().snapshot().unwrap();
        assert!(data.row_counts().iter().all(|(_, rows)| *rows == 0));
    }
}
