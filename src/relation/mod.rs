//! Relational operators over Arrow record batches
//!
//! Every operator is a pure function from one or two input batches to a new
//! batch. Reports are compositions of these operators.

mod aggregate;
mod column;
mod filter;
mod join;
mod key;
mod project;
pub mod scalar;
mod sort;
pub mod window;

pub use aggregate::{aggregate, AggregateExpr, AggregateFunction};
pub use column::{
    column, date32_column, float64_column, int32_column, int64_column, string_column,
    time64_column,
};
pub use filter::{filter, filter_rows};
pub use join::{hash_join, JoinType};
pub use project::{project, project_as, replace_column, round_column, with_column};
pub use sort::{sort_batch, SortKey};
pub use window::{lag, rank, RankKind};
