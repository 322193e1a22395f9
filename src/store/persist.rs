//! Parquet persistence
//!
//! Each table is written to `<dir>/<table>.parquet`. Loading decodes every
//! row back into entity values and replays it through the `FoodStore`
//! insert path in dependency order, so a file set that violates the load
//! rules is rejected the same way direct inserts are. Columns may be
//! nullable on disk; a null `total_amount` loads as zero and a null order
//! date or time is rejected.

use crate::error::{QueryError, Result};
use crate::model::{
    Customer, Delivery, DeliveryStatus, NewOrder, OrderStatus, Restaurant, Rider,
};
use crate::relation::scalar::{days_to_date, micros_to_time};
use crate::relation::{date32_column, float64_column, int64_column, string_column, time64_column};
use crate::store::memory::FoodStore;
use crate::store::schema::*;
use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn table_path(dir: &Path, table: &str) -> PathBuf {
    dir.join(format!("{}.parquet", table))
}

/// Write every table of the store to `dir`, creating it if needed
pub fn write_parquet(store: &FoodStore, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let dataset = store.snapshot()?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    for table in TABLE_NAMES {
        let batch = dataset.table(table)?;
        let path = table_path(dir, table);
        let file = File::create(&path)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props.clone()))?;
        writer.write(batch)?;
        writer.close()?;

        let file_size = fs::metadata(&path)?.len();
        info!(
            table,
            rows = batch.num_rows(),
            bytes = file_size,
            path = %path.display(),
            "wrote table"
        );
    }
    Ok(())
}

fn read_table(dir: &Path, table: &str) -> Result<Vec<RecordBatch>> {
    let path = table_path(dir, table);
    let file = File::open(&path).map_err(|e| {
        QueryError::Execution(format!("Failed to open parquet file {:?}: {}", path, e))
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;
    let batches: Vec<RecordBatch> = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(
        table,
        batches = batches.len(),
        rows = batches.iter().map(|b| b.num_rows()).sum::<usize>(),
        "read table"
    );
    Ok(batches)
}

/// Required non-null cell, reported against the row's primary key
fn required<T>(value: Option<T>, table: &'static str, column: &'static str, id: i64) -> Result<T> {
    value.ok_or(QueryError::MissingField { table, column, id })
}

fn key_value(batch: &RecordBatch, table: &'static str, column: &'static str, row: usize) -> Result<i64> {
    let ids = int64_column(batch, column)?;
    if ids.is_null(row) {
        return Err(QueryError::InvalidValue(format!(
            "{}.{} is null at row {}",
            table, column, row
        )));
    }
    Ok(ids.value(row))
}

fn opt_i64(batch: &RecordBatch, column: &str, row: usize) -> Result<Option<i64>> {
    let values = int64_column(batch, column)?;
    Ok((!values.is_null(row)).then(|| values.value(row)))
}

fn opt_str<'a>(batch: &'a RecordBatch, column: &str, row: usize) -> Result<Option<&'a str>> {
    let values = string_column(batch, column)?;
    Ok((!values.is_null(row)).then(|| values.value(row)))
}

fn opt_date(batch: &RecordBatch, column: &str, row: usize) -> Result<Option<chrono::NaiveDate>> {
    let values = date32_column(batch, column)?;
    if values.is_null(row) {
        return Ok(None);
    }
    days_to_date(values.value(row)).map(Some)
}

fn opt_time(batch: &RecordBatch, column: &str, row: usize) -> Result<Option<chrono::NaiveTime>> {
    let values = time64_column(batch, column)?;
    if values.is_null(row) {
        return Ok(None);
    }
    micros_to_time(values.value(row)).map(Some)
}

fn opt_f64(batch: &RecordBatch, column: &str, row: usize) -> Result<Option<f64>> {
    let values = float64_column(batch, column)?;
    Ok((!values.is_null(row)).then(|| values.value(row)))
}

/// Load a store previously written with [`write_parquet`]
pub fn load_parquet(dir: &Path) -> Result<FoodStore> {
    let mut store = FoodStore::new();

    for batch in read_table(dir, RESTAURANTS)? {
        for row in 0..batch.num_rows() {
            let id = key_value(&batch, RESTAURANTS, "restaurant_id", row)?;
            let name = required(opt_str(&batch, "restaurant_name", row)?, RESTAURANTS, "restaurant_name", id)?;
            let city = required(opt_str(&batch, "city", row)?, RESTAURANTS, "city", id)?;
            let hours = opt_str(&batch, "opening_hours", row)?.unwrap_or_default();
            store
                .insert_restaurant(Restaurant::new(id, name, city, hours))
                .inspect_err(|e| warn!(table = RESTAURANTS, row, error = %e, "rejected row"))?;
        }
    }

    for batch in read_table(dir, CUSTOMERS)? {
        for row in 0..batch.num_rows() {
            let id = key_value(&batch, CUSTOMERS, "customer_id", row)?;
            let name = required(opt_str(&batch, "customer_name", row)?, CUSTOMERS, "customer_name", id)?;
            let reg_date = required(opt_date(&batch, "reg_date", row)?, CUSTOMERS, "reg_date", id)?;
            store
                .insert_customer(Customer::new(id, name, reg_date))
                .inspect_err(|e| warn!(table = CUSTOMERS, row, error = %e, "rejected row"))?;
        }
    }

    for batch in read_table(dir, RIDERS)? {
        for row in 0..batch.num_rows() {
            let id = key_value(&batch, RIDERS, "rider_id", row)?;
            let name = required(opt_str(&batch, "rider_name", row)?, RIDERS, "rider_name", id)?;
            let sign_up = required(opt_date(&batch, "sign_up", row)?, RIDERS, "sign_up", id)?;
            store
                .insert_rider(Rider::new(id, name, sign_up))
                .inspect_err(|e| warn!(table = RIDERS, row, error = %e, "rejected row"))?;
        }
    }

    for batch in read_table(dir, ORDERS)? {
        for row in 0..batch.num_rows() {
            let id = key_value(&batch, ORDERS, "order_id", row)?;
            let customer_id = required(opt_i64(&batch, "customer_id", row)?, ORDERS, "customer_id", id)?;
            let restaurant_id =
                required(opt_i64(&batch, "restaurant_id", row)?, ORDERS, "restaurant_id", id)?;
            let item = opt_str(&batch, "order_item", row)?.unwrap_or_default();

            let order = NewOrder {
                order_date: opt_date(&batch, "order_date", row)?,
                order_time: opt_time(&batch, "order_time", row)?,
                order_status: opt_str(&batch, "order_status", row)?.map(OrderStatus::parse),
                total_amount: opt_f64(&batch, "total_amount", row)?,
                ..NewOrder::new(id, customer_id, restaurant_id, item)
            };
            store
                .insert_order(order)
                .inspect_err(|e| warn!(table = ORDERS, row, error = %e, "rejected row"))?;
        }
    }

    for batch in read_table(dir, DELIVERIES)? {
        for row in 0..batch.num_rows() {
            let id = key_value(&batch, DELIVERIES, "delivery_id", row)?;
            let order_id = required(opt_i64(&batch, "order_id", row)?, DELIVERIES, "order_id", id)?;
            let rider_id = required(opt_i64(&batch, "rider_id", row)?, DELIVERIES, "rider_id", id)?;
            let status = required(
                opt_str(&batch, "delivery_status", row)?,
                DELIVERIES,
                "delivery_status",
                id,
            )?;
            let time = opt_time(&batch, "delivery_time", row)?;
            store
                .insert_delivery(Delivery::new(
                    id,
                    order_id,
                    rider_id,
                    DeliveryStatus::parse(status),
                    time,
                ))
                .inspect_err(|e| warn!(table = DELIVERIES, row, error = %e, "rejected row"))?;
        }
    }

    info!(
        dir = %dir.display(),
        orders = store.orders().len(),
        deliveries = store.deliveries().len(),
        "loaded store"
    );
    Ok(store)
}
