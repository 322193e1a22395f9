//! Food-delivery analytics engine
//!
//! Loads restaurants, customers, riders, orders and deliveries into a
//! validated store and computes seventeen business reports over an Arrow
//! snapshot of it.

pub mod cli;
pub mod error;
pub mod execution;
pub mod model;
pub mod parser;
pub mod relation;
pub mod reports;
pub mod sample;
pub mod store;

// Re-export main types
pub use error::{QueryError, Result};
pub use execution::{ReportContext, ReportResult};
pub use reports::{Report, ReportConfig};
pub use sample::{SampleGenerator, SampleSize};
pub use store::{Dataset, FoodStore};
