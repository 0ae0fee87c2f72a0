//! Bill workflow for Sitebook.
//!
//! This module implements the bill status lifecycle, the admin gating of
//! status changes, deletions and payment writes, and form draft validation.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (BillStatus, TransitionPolicy)
//! - `access` - Session actor and roles
//! - `error` - Workflow-specific error types
//! - `service` - Status change and permission rules
//! - `validation` - Bill and payment drafts

pub mod access;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use access::{Actor, UserRole};
pub use error::WorkflowError;
pub use service::{StatusChange, WorkflowService};
pub use types::{BillStatus, TransitionPolicy};
pub use validation::{BillDraft, BillRow, PaymentDraft, PaymentRow, WriteStamp};
