//! Command-line support
//!
//! Provides output format options for report results (table, CSV, JSON,
//! vertical).

mod output;

pub use output::{OutputFormat, OutputFormatter};
