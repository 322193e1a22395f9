//! Error types for the analytics engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Main error type for loading data and computing reports
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Foreign key violation: {table}.{column} = {value} references no existing row")]
    ForeignKey {
        table: &'static str,
        column: &'static str,
        value: i64,
    },

    #[error("Missing required field: {table}.{column} (row id {id})")]
    MissingField {
        table: &'static str,
        column: &'static str,
        id: i64,
    },

    #[error("Duplicate key: {table}.{column} = {value}")]
    DuplicateKey {
        table: &'static str,
        column: &'static str,
        value: i64,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Type error: {0}")]
    Type(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlparser::parser::ParserError> for QueryError {
    fn from(e: sqlparser::parser::ParserError) -> Self {
        QueryError::Parse(e.to_string())
    }
}
