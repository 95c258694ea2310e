//! Query error types

use thiserror::Error;

/// Query errors
#[derive(Debug, Error)]
pub enum QueryError {
    /// The engine rejected the statement; the message is the engine's own text
    #[error("{0}")]
    Execution(String),

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Only one statement can be run at a time (found {0})")]
    MultipleStatements(usize),

    #[error("Query timeout: exceeded {0} ms")]
    Timeout(u64),

    #[error("Failed to load sample data: {0}")]
    Seed(String),

    #[error("Engine error: {0}")]
    Engine(String),
}

impl QueryError {
    /// Short machine-readable code, used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Execution(_) => "query",
            QueryError::EmptyQuery => "empty_query",
            QueryError::MultipleStatements(_) => "multiple_statements",
            QueryError::Timeout(_) => "timeout",
            QueryError::Seed(_) => "seed",
            QueryError::Engine(_) => "engine",
        }
    }
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

impl From<sqlwin_core::CoreError> for QueryError {
    fn from(e: sqlwin_core::CoreError) -> Self {
        QueryError::Seed(e.to_string())
    }
}
