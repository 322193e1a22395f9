//! Storage: validated in-memory tables, Arrow snapshots and Parquet files
//!
//! - `memory` - `FoodStore`, the insert path that enforces the load rules
//! - `dataset` - immutable Arrow snapshot the reports read
//! - `schema` - Arrow schema of each table
//! - `persist` - directory-of-Parquet-files persistence

mod dataset;
mod memory;
mod persist;
pub mod schema;

pub use dataset::Dataset;
pub use memory::FoodStore;
pub use persist::{load_parquet, write_parquet};
