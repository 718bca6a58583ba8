//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    database_id::TransactionId,
    whatsapp::{MESSAGE_FORMAT, ParseError},
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The JSON body of a request could not be parsed, e.g. a required field
    /// was missing or `type` was not one of `Ingreso` or `Gasto`.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The transaction ID in the URL path is not an integer.
    #[error("invalid transaction ID: {0}")]
    InvalidTransactionId(String),

    /// A WhatsApp message could not be turned into a transaction.
    #[error("could not parse message: {0}")]
    InvalidMessage(#[from] ParseError),

    /// One or more fields required by the structured WhatsApp test endpoint
    /// were missing or empty.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Tried to update a transaction that does not exist.
    #[error("tried to update transaction {0} which is not in the database")]
    UpdateMissingTransaction(TransactionId),

    /// Tried to delete a transaction that does not exist.
    #[error("tried to delete transaction {0} which is not in the database")]
    DeleteMissingTransaction(TransactionId),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An unhandled/unexpected PostgreSQL error.
    ///
    /// The original error is kept as a string since `sqlx::Error` cannot be
    /// compared.
    #[error("an unexpected PostgreSQL error occurred: {0}")]
    PostgresError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The configured database is not supported by this build.
    #[error("unsupported storage backend: {0}")]
    UnsupportedBackend(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => Error::NotFound,
            error => {
                tracing::error!("an unhandled PostgreSQL error occurred: {}", error);
                Error::PostgresError(error.to_string())
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidTransactionId(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_json_response("Something went wrong")
    }
}

impl Error {
    /// Convert the error into an HTTP response with a JSON body of the form
    /// `{"error": "..."}`.
    ///
    /// `failure_message` is only shown to the client for server errors, the
    /// underlying error is logged instead of being sent to the client.
    pub fn into_json_response(self, failure_message: &str) -> Response {
        match self {
            Error::InvalidRequestBody(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid request body", "details": details })),
            )
                .into_response(),
            Error::InvalidTransactionId(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid transaction ID", "details": details })),
            )
                .into_response(),
            Error::InvalidMessage(ParseError::TooFewSegments(_)) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid message format", "expected": MESSAGE_FORMAT })),
            )
                .into_response(),
            Error::InvalidMessage(error) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid transaction data",
                    "details": error.to_string(),
                    "expected": MESSAGE_FORMAT,
                })),
            )
                .into_response(),
            Error::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing required fields", "missing": fields })),
            )
                .into_response(),
            Error::UpdateMissingTransaction(_)
            | Error::DeleteMissingTransaction(_)
            | Error::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Transaction not found" })),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("{failure_message}: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": failure_message })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, whatsapp::ParseError};

    #[test]
    fn missing_transactions_map_to_not_found() {
        assert_eq!(
            Error::UpdateMissingTransaction(1).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::DeleteMissingTransaction(1).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn parse_errors_map_to_bad_request() {
        let response = Error::from(ParseError::TooFewSegments(2)).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_errors_map_to_internal_server_error() {
        let response = Error::DatabaseLockError.into_json_response("Failed to add transaction");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
