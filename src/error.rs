//! Error types for recolhaki

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Result type alias for recolhaki operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving or administering the registry
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),

    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// The message of the error behind a 500 response, kept out of the body so
/// the error-page layer can decide how much of it to show.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let detail = self.to_string();
        tracing::error!("Request failed: {detail}");

        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(ErrorDetail(detail));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response_is_500_with_detail() {
        let response = Error::Config("missing DATABASE_URL".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert_eq!(detail.0, "Configuration error: missing DATABASE_URL");
    }
}
