//! Store error types.

use sitebook_core::workflow::WorkflowError;
use sitebook_shared::AppError;
use thiserror::Error;

/// Errors from the data backend and the checks wrapped around writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected the credentials.
    #[error("Backend rejected the session")]
    Unauthorized,

    /// Row-level security refused the operation.
    #[error("Backend refused the operation: {0}")]
    Forbidden(String),

    /// No row matched.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The row conflicts with an existing one.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend rejected the request payload.
    #[error("Rejected by backend: {0}")]
    Rejected(String),

    /// Any other non-success response.
    #[error("Backend error ({status}): {message}")]
    Server {
        /// HTTP status.
        status: u16,
        /// Message from the response body.
        message: String,
    },

    /// The request never completed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A row did not decode into its record type.
    #[error("Malformed row: {0}")]
    Decode(#[from] serde_json::Error),

    /// A workflow or validation rule refused the write.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Invalid backend settings.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StoreError {
    /// Maps a non-success HTTP status and its body message to an error.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            400 | 422 => Self::Rejected(message),
            _ => Self::Server { status, message },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unauthorized => Self::Unauthorized(err.to_string()),
            StoreError::Forbidden(msg) => Self::Forbidden(msg),
            StoreError::NotFound(msg) => Self::NotFound(msg),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Rejected(msg) => Self::Validation(msg),
            StoreError::Workflow(e) => e.into(),
            StoreError::Configuration(msg) => Self::Configuration(msg),
            StoreError::Decode(e) => Self::Internal(e.to_string()),
            StoreError::Server { .. } | StoreError::Transport(_) => Self::Backend(err.to_string()),
        }
    }
}
