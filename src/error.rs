use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{dao::storage::StorageError, domain::round::RoundStateError};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The storage backend failed or refused the request.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Missing or invalid session.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<RoundStateError> for ServiceError {
    fn from(err: RoundStateError) -> Self {
        match err {
            RoundStateError::AlreadyComplete => ServiceError::InvalidState(err.to_string()),
            RoundStateError::HoleOutOfRange { .. } => ServiceError::InvalidInput(err.to_string()),
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Unauthorized access attempt.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Reason sent to the client, without the status prefix.
    fn reason(&self) -> &str {
        match self {
            AppError::BadRequest(message)
            | AppError::Unauthorized(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message)
            | AppError::ServiceUnavailable(message)
            | AppError::Internal(message) => message,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(source) => match source {
                StorageError::Unavailable { .. } => {
                    AppError::ServiceUnavailable(source.to_string())
                }
                StorageError::Query { message } => AppError::Internal(message),
                StorageError::Decode { .. } => AppError::Internal(source.to_string()),
            },
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::Unauthorized(message) => AppError::Unauthorized(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.reason().to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_messages_pass_through_verbatim() {
        let err: AppError = ServiceError::from(StorageError::query("permission denied for table rounds")).into();
        assert!(matches!(&err, AppError::Internal(message) if message == "permission denied for table rounds"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn round_state_errors_map_to_client_statuses() {
        let complete: AppError = ServiceError::from(RoundStateError::AlreadyComplete).into();
        assert_eq!(complete.into_response().status(), StatusCode::CONFLICT);

        let range: AppError = ServiceError::from(RoundStateError::HoleOutOfRange {
            hole: 19,
            holes_count: 18,
        })
        .into();
        assert_eq!(range.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
