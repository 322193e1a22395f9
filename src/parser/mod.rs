//! SQL Parser module
//!
//! Wraps sqlparser-rs to parse the PostgreSQL reference queries attached to
//! the reports.

use crate::error::{QueryError, Result};
use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

/// Parse a SQL query string into a Statement AST
pub fn parse_sql(sql: &str) -> Result<Statement> {
    let dialect = PostgreSqlDialect {};
    let mut statements = Parser::parse_sql(&dialect, sql)?;

    if statements.is_empty() {
        return Err(QueryError::Parse("Empty SQL statement".to_string()));
    }

    if statements.len() > 1 {
        return Err(QueryError::Parse(
            "Multiple statements not supported".to_string(),
        ));
    }

    Ok(statements.remove(0))
}
