//! Application-wide error types.
//!
//! The ledger computations never produce these; they come from the data
//! backend, permission checks and form validation around them.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// The backend rejected the session.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The actor lacks the role for the action.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Record not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Form input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bill workflow rule violation.
    #[error("Workflow rule violation: {0}")]
    Workflow(String),

    /// The backend reported a write conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend could not be reached or answered with a server error.
    #[error("Backend unavailable: {0}")]
    Backend(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP-equivalent status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Workflow(_) => 422,
            Self::Conflict(_) => 409,
            Self::Backend(_) => 503,
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code shown alongside the message.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Workflow(_) => "WORKFLOW_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Backend(_) => "BACKEND_UNAVAILABLE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true when a manual refresh may succeed ("pull to refresh").
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Conflict(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
