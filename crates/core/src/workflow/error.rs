//! Workflow error types for the bill lifecycle.
//!
//! These come from permission checks, transition rules and form validation.
//! The ledger computations themselves never fail.

use thiserror::Error;

use crate::workflow::types::BillStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Attempted a status change the active policy forbids.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: BillStatus,
        /// The attempted target status.
        to: BillStatus,
    },

    /// A non-admin tried to edit a bill that already left `submitted`.
    #[error("Bill is read-only once it is {status}")]
    ReadOnlyBill {
        /// The bill's current status.
        status: BillStatus,
    },

    /// A non-admin tried to save a bill with a status other than `submitted`.
    #[error("Only admins can mark a bill as {status}")]
    StatusRequiresAdmin {
        /// The requested status.
        status: BillStatus,
    },

    /// The actor's role does not allow the action.
    #[error("Role {user_role} cannot {action}")]
    InsufficientRole {
        /// What was attempted.
        action: &'static str,
        /// The actor's role.
        user_role: String,
    },

    /// A form field failed validation.
    #[error("{0}")]
    Validation(String),
}

impl WorkflowError {
    /// Returns the HTTP-equivalent status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::StatusRequiresAdmin { .. } | Self::InsufficientRole { .. } => 403,
            Self::InvalidTransition { .. } | Self::ReadOnlyBill { .. } => 422,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ReadOnlyBill { .. } => "READ_ONLY_BILL",
            Self::StatusRequiresAdmin { .. } => "STATUS_REQUIRES_ADMIN",
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<WorkflowError> for sitebook_shared::AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(msg) => Self::Validation(msg),
            WorkflowError::StatusRequiresAdmin { .. } | WorkflowError::InsufficientRole { .. } => {
                Self::Forbidden(err.to_string())
            }
            WorkflowError::InvalidTransition { .. } | WorkflowError::ReadOnlyBill { .. } => {
                Self::Workflow(err.to_string())
            }
        }
    }
}
