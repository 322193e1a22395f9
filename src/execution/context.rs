//! Report context - main entry point for running reports

use crate::error::Result;
use crate::reports::{Report, ReportConfig};
use crate::store::{load_parquet, Dataset, FoodStore};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Report execution result
#[derive(Debug, Clone)]
pub struct ReportResult {
    pub report: Report,
    /// Output schema
    pub schema: SchemaRef,
    /// Result batches
    pub batches: Vec<RecordBatch>,
    /// Total row count
    pub row_count: usize,
    pub metrics: ReportMetrics,
}

/// Report execution metrics
#[derive(Debug, Clone, Default)]
pub struct ReportMetrics {
    /// Time spent computing the report
    pub execute_time: Duration,
}

/// Holds a dataset snapshot and the report parameters. Cheap to clone; the
/// dataset is shared.
#[derive(Debug, Clone)]
pub struct ReportContext {
    dataset: Arc<Dataset>,
    config: ReportConfig,
}

impl ReportContext {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
            config: ReportConfig::default(),
        }
    }

    /// Snapshot `store` and wrap it
    pub fn from_store(store: &FoodStore) -> Result<Self> {
        Ok(Self::new(store.snapshot()?))
    }

    /// Load a directory of Parquet tables
    pub fn from_parquet(dir: impl AsRef<Path>) -> Result<Self> {
        let store = load_parquet(dir.as_ref())?;
        Self::from_store(&store)
    }

    /// Replace the report parameters. The config is validated first.
    pub fn with_config(mut self, config: ReportConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Run one report
    pub fn run(&self, report: Report) -> Result<ReportResult> {
        let start = Instant::now();
        let batch = report.evaluate(&self.dataset, &self.config)?;
        let execute_time = start.elapsed();

        let row_count = batch.num_rows();
        debug!(report = %report, rows = row_count, elapsed = ?execute_time, "report executed");

        Ok(ReportResult {
            report,
            schema: batch.schema(),
            batches: vec![batch],
            row_count,
            metrics: ReportMetrics { execute_time },
        })
    }

    /// Run every report one after the other, in report order
    pub fn run_all_sequential(&self) -> Vec<Result<ReportResult>> {
        Report::ALL.iter().map(|r| self.run(*r)).collect()
    }

    /// Run every report in parallel over the shared dataset. Results come
    /// back in report order; one failing report does not stop the others.
    pub fn run_all(&self) -> Vec<Result<ReportResult>> {
        let start = Instant::now();
        let results: Vec<_> = Report::ALL.par_iter().map(|r| self.run(*r)).collect();
        info!(
            reports = results.len(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            elapsed = ?start.elapsed(),
            "all reports executed"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::model::{Customer, Delivery, DeliveryStatus, NewOrder, Restaurant, Rider};
    use chrono::{NaiveDate, NaiveTime};

    fn create_test_context() -> ReportContext {
        let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let mut store = FoodStore::new();
        store
            .insert_restaurant(Restaurant::new(1, "Spice Route", "Delhi", "9 AM - 11 PM"))
            .unwrap();
        store
            .insert_customer(Customer::new(1, "Arjun Mehta", date))
            .unwrap();
        store.insert_rider(Rider::new(1, "Ravi", date)).unwrap();

        for id in 1..=3 {
            let time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
            store
                .insert_order(
                    NewOrder::new(id, 1, 1, "Biryani")
                        .placed_at(date, time)
                        .amount(100.0 * id as f64),
                )
                .unwrap();
            let delivered = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
            store
                .insert_delivery(Delivery::new(id, id, 1, DeliveryStatus::Delivered, Some(delivered)))
                .unwrap();
        }

        ReportContext::from_store(&store).unwrap()
    }

    #[test]
    fn test_run_single_report() {
        let ctx = create_test_context();
        let result = ctx.run(Report::CustomerLifetimeValue).unwrap();

        assert_eq!(result.report, Report::CustomerLifetimeValue);
        assert_eq!(result.row_count, 1);
        assert_eq!(result.schema.field(2).name(), "clv");
    }

    #[test]
    fn test_run_all_in_report_order() {
        let ctx = create_test_context();
        let results = ctx.run_all();

        assert_eq!(results.len(), Report::ALL.len());
        for (result, expected) in results.iter().zip(Report::ALL) {
            let result = result.as_ref().unwrap();
            assert_eq!(result.report, expected);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ctx = create_test_context();
        let parallel = ctx.run_all();
        let sequential = ctx.run_all_sequential();

        for (p, s) in parallel.iter().zip(&sequential) {
            let (p, s) = (p.as_ref().unwrap(), s.as_ref().unwrap());
            assert_eq!(p.batches, s.batches, "{}", p.report);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let ctx = create_test_context();
        let config = ReportConfig {
            comparison_years: (2023, 2023),
            ..ReportConfig::default()
        };
        assert!(matches!(
            ctx.with_config(config),
            Err(QueryError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_config_applies() {
        let config = ReportConfig {
            min_total_spent: 500.0,
            ..ReportConfig::default()
        };
        let ctx = create_test_context().with_config(config).unwrap();

        // 100 + 200 + 300 = 600 > 500
        let result = ctx.run(Report::HighValueCustomers).unwrap();
        assert_eq!(result.row_count, 1);
    }
}
