//! Workflow domain types for the bill lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bill status in the approval workflow.
///
/// The normal flow is Submitted → Approved → PaymentProcessed. Whether other
/// moves are allowed depends on the [`TransitionPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// Entered by a user, awaiting approval. Counts toward pending approval.
    Submitted,
    /// Approved by an admin. Counts toward outstanding.
    Approved,
    /// Payment has been processed. Counts toward outstanding.
    PaymentProcessed,
}

impl BillStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Submitted, Self::Approved, Self::PaymentProcessed];

    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::PaymentProcessed => "payment_processed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "submitted" => Some(Self::Submitted),
            "approved" => Some(Self::Approved),
            "payment_processed" => Some(Self::PaymentProcessed),
            _ => None,
        }
    }

    /// Human label for badges.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Approved => "Approved",
            Self::PaymentProcessed => "Payment Processed",
        }
    }

    /// Position in the lifecycle, starting at 0.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Submitted => 0,
            Self::Approved => 1,
            Self::PaymentProcessed => 2,
        }
    }

    /// True for approved and payment-processed bills, the ones that make up outstanding.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved | Self::PaymentProcessed)
    }

    /// True while the bill awaits approval.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How strictly status changes are checked for admins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may be set on any save.
    #[default]
    Permissive,
    /// Status may only stay or move forward in the lifecycle.
    Monotonic,
}

impl TransitionPolicy {
    /// Parses a policy name from configuration.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Some(Self::Permissive),
            "monotonic" => Some(Self::Monotonic),
            _ => None,
        }
    }
}
