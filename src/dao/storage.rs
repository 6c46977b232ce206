use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    /// The backend could not be reached.
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The store received the request and refused it. The message is the store's own.
    #[error("{message}")]
    Query { message: String },
    #[error("failed to decode `{table}` row")]
    /// A returned row did not match the expected record.
    Decode {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a query error carrying the store's message verbatim.
    pub fn query(message: impl Into<String>) -> Self {
        StorageError::Query {
            message: message.into(),
        }
    }

    /// True when the store reported a uniqueness violation.
    pub fn is_duplicate(&self) -> bool {
        match self {
            StorageError::Query { message } => {
                let lowered = message.to_lowercase();
                lowered.contains("duplicate") || lowered.contains("unique")
            }
            _ => false,
        }
    }
}
