//! Error types shared by the PostgREST storage implementation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`PostgrestError`] failures.
pub type PostgrestResult<T> = Result<T, PostgrestError>;

/// Failures that can occur while interacting with PostgREST.
#[derive(Debug, Error)]
pub enum PostgrestError {
    /// Required environment variable is missing.
    #[error("missing PostgREST environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build PostgREST client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send PostgREST request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with an error payload.
    #[error("{message}")]
    Rejected {
        path: String,
        status: StatusCode,
        message: String,
    },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode PostgREST response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<PostgrestError> for StorageError {
    fn from(err: PostgrestError) -> Self {
        match err {
            PostgrestError::Rejected { message, .. } => StorageError::query(message),
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
