//! Error types for the tabql query engine.
//!
//! All public APIs return `TabqlResult<T>`; no panics in library code.

use crate::sql::query::Clause;
use thiserror::Error;

/// Unified error type for all tabql operations.
#[derive(Debug, Error)]
pub enum TabqlError {
    /// Malformed or missing clause
    #[error("SQL parse error in {clause} clause: {message}")]
    SqlParse { clause: Clause, message: String },

    /// Comparison operator outside the supported set
    #[error("unsupported operator: {operator}")]
    UnsupportedOperator { operator: String },

    /// Requested table does not exist in the store
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// INSERT column/value count mismatch or unknown INSERT columns
    #[error("column mismatch: {0}")]
    ColumnMismatch(String),

    /// Non-numeric value fed to a numeric aggregate
    #[error("aggregate type error: {function} cannot use non-numeric value '{value}'")]
    AggregateType { function: String, value: String },

    /// Invalid engine configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// SQL execution error
    #[error("SQL execution error: {message}\nContext: {context}")]
    SqlExecution { message: String, context: String },

    /// Standard I/O error
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// CSV read/write error
    #[error("csv error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// Failure while evaluating a specific query
    #[error("error executing query `{sql}`: {source}")]
    Query {
        sql: String,
        #[source]
        source: Box<TabqlError>,
    },
}

impl TabqlError {
    /// 파싱 에러 생성 헬퍼
    pub fn parse(clause: Clause, message: impl Into<String>) -> Self {
        TabqlError::SqlParse {
            clause,
            message: message.into(),
        }
    }

    /// 쿼리 문맥으로 감싼다. 이미 감싸진 에러는 그대로 둔다.
    pub fn in_query(self, sql: &str) -> Self {
        match self {
            err @ TabqlError::Query { .. } => err,
            err => TabqlError::Query {
                sql: sql.to_string(),
                source: Box::new(err),
            },
        }
    }

    /// Innermost error, skipping `Query` context wrappers.
    pub fn root(&self) -> &TabqlError {
        match self {
            TabqlError::Query { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for all tabql operations.
pub type TabqlResult<T> = Result<T, TabqlError>;
