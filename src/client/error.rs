//! Errors returned by the API client and the sync layer.

use reqwest::StatusCode;

/// The errors that may occur when talking to the API or the fallback cache.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request did not complete before the client's timeout.
    #[error("the request timed out")]
    Timeout,

    /// The request could not be sent or the response could not be read, e.g.
    /// the server is not running.
    #[error("could not reach the server: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The server rejected the request as invalid (400).
    #[error("the server rejected the request: {0}")]
    Rejected(String),

    /// The transaction does not exist on the server (404) or in the local list.
    #[error("the transaction could not be found")]
    NotFound,

    /// The server responded with an unexpected status code.
    #[error("the server responded with {status}: {message}")]
    Status {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The `error` field of the response body, if there was one.
        message: String,
    },

    /// The API base URL or a URL built from it is invalid.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A phone number for a WhatsApp link had no digits.
    #[error("\"{0}\" is not a phone number")]
    InvalidPhoneNumber(String),

    /// A category name was empty.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A category with the same name already exists.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// The fallback cache file could not be read or written.
    #[error("could not access the cache file: {0}")]
    CacheIo(#[from] std::io::Error),

    /// The fallback cache file is not valid JSON.
    #[error("could not parse the cache file: {0}")]
    CacheFormat(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the error means the server could not be used, as opposed to
    /// the server answering that the request was wrong.
    ///
    /// Only these errors trigger the local fallback for mutations.
    pub fn is_connectivity(&self) -> bool {
        match self {
            ClientError::Timeout | ClientError::Unreachable(_) => true,
            ClientError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Unreachable(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::ClientError;

    #[test]
    fn server_errors_are_connectivity_errors() {
        let error = ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to add transaction".to_owned(),
        };

        assert!(error.is_connectivity());
        assert!(ClientError::Timeout.is_connectivity());
    }

    #[test]
    fn client_errors_are_not_connectivity_errors() {
        assert!(!ClientError::NotFound.is_connectivity());
        assert!(!ClientError::Rejected("Invalid request body".to_owned()).is_connectivity());
        assert!(
            !ClientError::Status {
                status: StatusCode::METHOD_NOT_ALLOWED,
                message: String::new(),
            }
            .is_connectivity()
        );
    }
}
