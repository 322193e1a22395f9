//! Report parameters

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the reports. Every field has a default, so a JSON config
/// file only needs the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Customer looked up by the top-dishes report
    pub customer_name: String,
    /// Dense-rank cutoff of the top-dishes report
    pub top_n: i64,
    /// Order-value analysis keeps customers with more orders than this
    pub min_order_count: i64,
    /// High-value customers keeps customers who spent more than this
    pub min_total_spent: f64,
    pub churn_from_year: i32,
    pub churn_to_year: i32,
    /// Years compared by the cancellation-rate report
    pub comparison_years: (i32, i32),
    pub rider_commission_rate: f64,
    pub city_revenue_year: i32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            customer_name: "Arjun Mehta".to_string(),
            top_n: 5,
            min_order_count: 750,
            min_total_spent: 100_000.0,
            churn_from_year: 2023,
            churn_to_year: 2024,
            comparison_years: (2023, 2024),
            rider_commission_rate: 0.08,
            city_revenue_year: 2023,
        }
    }
}

impl ReportConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n < 1 {
            return Err(QueryError::InvalidValue(format!(
                "top_n must be at least 1, got {}",
                self.top_n
            )));
        }
        if !self.min_total_spent.is_finite() {
            return Err(QueryError::InvalidValue(
                "min_total_spent must be a finite number".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.rider_commission_rate) {
            return Err(QueryError::InvalidValue(format!(
                "rider_commission_rate must be between 0 and 1, got {}",
                self.rider_commission_rate
            )));
        }
        let (first, second) = self.comparison_years;
        if first == second {
            return Err(QueryError::InvalidValue(format!(
                "comparison_years must differ, got {} twice",
                first
            )));
        }
        Ok(())
    }
}
