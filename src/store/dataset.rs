//! Immutable snapshot of the store as Arrow record batches

use crate::error::{QueryError, Result};
use crate::store::schema::*;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

/// One batch per table. Built only from a validated `FoodStore`, so every
/// foreign key resolves and every required field is present.
#[derive(Debug, Clone)]
pub struct Dataset {
    restaurants: RecordBatch,
    customers: RecordBatch,
    riders: RecordBatch,
    orders: RecordBatch,
    deliveries: RecordBatch,
}

impl Dataset {
    pub(crate) fn try_new(
        restaurants: RecordBatch,
        customers: RecordBatch,
        riders: RecordBatch,
        orders: RecordBatch,
        deliveries: RecordBatch,
    ) -> Result<Self> {
        check_schema(RESTAURANTS, &restaurants, restaurants_schema())?;
        check_schema(CUSTOMERS, &customers, customers_schema())?;
        check_schema(RIDERS, &riders, riders_schema())?;
        check_schema(ORDERS, &orders, orders_schema())?;
        check_schema(DELIVERIES, &deliveries, deliveries_schema())?;

        Ok(Self {
            restaurants,
            customers,
            riders,
            orders,
            deliveries,
        })
    }

    pub fn restaurants(&self) -> &RecordBatch {
        &self.restaurants
    }

    pub fn customers(&self) -> &RecordBatch {
        &self.customers
    }

    pub fn riders(&self) -> &RecordBatch {
        &self.riders
    }

    pub fn orders(&self) -> &RecordBatch {
        &self.orders
    }

    pub fn deliveries(&self) -> &RecordBatch {
        &self.deliveries
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Result<&RecordBatch> {
        match name {
            RESTAURANTS => Ok(&self.restaurants),
            CUSTOMERS => Ok(&self.customers),
            RIDERS => Ok(&self.riders),
            ORDERS => Ok(&self.orders),
            DELIVERIES => Ok(&self.deliveries),
            _ => Err(QueryError::TableNotFound(name.to_string())),
        }
    }

    /// Row count per table, in load order
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        TABLE_NAMES
            .iter()
            .map(|name| {
                let rows = self.table(name).map(|b| b.num_rows()).unwrap_or(0);
                (*name, rows)
            })
            .collect()
    }
}

fn check_schema(table: &str, batch: &RecordBatch, expected: SchemaRef) -> Result<()> {
    let actual = batch.schema();
    let matches = actual.fields().len() == expected.fields().len()
        && actual
            .fields()
            .iter()
            .zip(expected.fields().iter())
            .all(|(a, e)| a.name() == e.name() && a.data_type() == e.data_type());

    if matches {
        Ok(())
    } else {
        Err(QueryError::Type(format!(
            "table '{}' has schema {:?}, expected {:?}",
            table, actual, expected
        )))
    }
}
