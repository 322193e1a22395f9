//! Window functions
//!
//! - `partition` - PARTITION BY / ORDER BY row arrangement
//! - `ranking` - ROW_NUMBER, RANK, DENSE_RANK
//! - `value` - LAG

mod partition;
mod ranking;
mod value;

pub use partition::{partition_rows, Partitioned};
pub use ranking::{rank, RankKind};
pub use value::lag;
