//! Web error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlwin_engine::QueryError;
use thiserror::Error;

/// Web errors
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many queries in flight")]
    Busy,

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for web operations
pub type Result<T> = std::result::Result<T, WebError>;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Busy => StatusCode::SERVICE_UNAVAILABLE,
            WebError::Query(e) => match e {
                QueryError::Execution(_)
                | QueryError::EmptyQuery
                | QueryError::MultipleStatements(_) => StatusCode::BAD_REQUEST,
                QueryError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
                QueryError::Seed(_) | QueryError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WebError::BadRequest(_) => "bad_request",
            WebError::NotFound(_) => "not_found",
            WebError::Busy => "busy",
            WebError::Query(e) => e.code(),
            WebError::Internal(_) => "internal",
        }
    }

    /// Message shown to the user; query failures keep the engine's text
    pub fn message(&self) -> String {
        match self {
            WebError::BadRequest(msg) | WebError::NotFound(msg) | WebError::Internal(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message(),
            code: self.code().to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_mapping() {
        let err = WebError::from(QueryError::Execution("no such table: nope".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "query");
        assert_eq!(err.message(), "no such table: nope");

        let err = WebError::from(QueryError::Timeout(5000));
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(err.code(), "timeout");

        let err = WebError::from(QueryError::Engine("boom".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_busy() {
        assert_eq!(WebError::Busy.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(WebError::Busy.code(), "busy");
    }
}
