//! Workflow service for bill status changes and admin-only actions.
//!
//! Rules:
//! - A non-admin may only create or re-save bills as `submitted`, and a bill
//!   that has left `submitted` is read-only for them.
//! - An admin may set any status on a new bill. On an existing bill the
//!   [`TransitionPolicy`] decides: `Permissive` allows any move,
//!   `Monotonic` only staying put or moving forward.
//! - Deleting bills and every payment write are admin-only. Deletion is
//!   allowed from any status.

use chrono::{DateTime, Utc};
use sitebook_shared::types::UserId;

use crate::workflow::access::Actor;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{BillStatus, TransitionPolicy};

/// An authorized status write with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Status before the save; `None` for a new bill.
    pub from: Option<BillStatus>,
    /// Status after the save.
    pub to: BillStatus,
    /// Who saved.
    pub changed_by: UserId,
    /// When.
    pub changed_at: DateTime<Utc>,
}

/// Stateless service for bill workflow checks.
pub struct WorkflowService;

impl WorkflowService {
    /// Check if an admin may move a bill from `from` to `to` under `policy`.
    #[must_use]
    pub fn is_valid_transition(policy: TransitionPolicy, from: BillStatus, to: BillStatus) -> bool {
        match policy {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Monotonic => to.rank() >= from.rank(),
        }
    }

    /// Returns true if the actor may only view the bill.
    #[must_use]
    pub fn is_read_only(actor: &Actor, current: BillStatus) -> bool {
        !actor.is_admin() && current != BillStatus::Submitted
    }

    /// Statuses the actor may save a bill with, in lifecycle order.
    ///
    /// Empty when the bill is read-only for the actor.
    #[must_use]
    pub fn allowed_targets(
        actor: &Actor,
        current: Option<BillStatus>,
        policy: TransitionPolicy,
    ) -> Vec<BillStatus> {
        BillStatus::ALL
            .into_iter()
            .filter(|to| Self::check_save(actor, current, *to, policy).is_ok())
            .collect()
    }

    /// Authorize saving a bill with status `to`.
    ///
    /// # Arguments
    /// * `actor` - Who is saving
    /// * `current` - The stored status, or `None` for a new bill
    /// * `to` - The status being written
    /// * `policy` - Transition policy for admins
    ///
    /// # Returns
    /// * `Ok(StatusChange)` stamped with the actor and current time
    /// * `Err(WorkflowError::ReadOnlyBill)` for non-admins on non-submitted bills
    /// * `Err(WorkflowError::StatusRequiresAdmin)` for non-admins writing other statuses
    /// * `Err(WorkflowError::InvalidTransition)` when the policy forbids the move
    pub fn authorize_bill_save(
        actor: &Actor,
        current: Option<BillStatus>,
        to: BillStatus,
        policy: TransitionPolicy,
    ) -> Result<StatusChange, WorkflowError> {
        Self::check_save(actor, current, to, policy)?;

        Ok(StatusChange {
            from: current,
            to,
            changed_by: actor.id,
            changed_at: Utc::now(),
        })
    }

    /// Authorize a hard delete of a bill. Admin-only, any status.
    pub fn authorize_bill_delete(actor: &Actor) -> Result<(), WorkflowError> {
        actor.require_admin("delete bills")
    }

    /// Authorize creating, editing or deleting a payment. Admin-only.
    pub fn authorize_payment_write(actor: &Actor) -> Result<(), WorkflowError> {
        actor.require_admin("record payments")
    }

    fn check_save(
        actor: &Actor,
        current: Option<BillStatus>,
        to: BillStatus,
        policy: TransitionPolicy,
    ) -> Result<(), WorkflowError> {
        if !actor.is_admin() {
            if let Some(status) = current.filter(|s| Self::is_read_only(actor, *s)) {
                return Err(WorkflowError::ReadOnlyBill { status });
            }
            if to != BillStatus::Submitted {
                return Err(WorkflowError::StatusRequiresAdmin { status: to });
            }
            return Ok(());
        }

        match current {
            Some(from) if !Self::is_valid_transition(policy, from, to) => {
                Err(WorkflowError::InvalidTransition { from, to })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::access::UserRole;

    fn admin() -> Actor {
        Actor::new(UserId::new(), UserRole::Admin)
    }

    fn user() -> Actor {
        Actor::new(UserId::new(), UserRole::User)
    }

    #[test]
    fn test_user_creates_submitted_bill() {
        let actor = user();
        let change = WorkflowService::authorize_bill_save(
            &actor,
            None,
            BillStatus::Submitted,
            TransitionPolicy::Permissive,
        )
        .unwrap();
        assert_eq!(change.from, None);
        assert_eq!(change.to, BillStatus::Submitted);
        assert_eq!(change.changed_by, actor.id);
    }

    #[test]
    fn test_user_cannot_approve() {
        let result = WorkflowService::authorize_bill_save(
            &user(),
            Some(BillStatus::Submitted),
            BillStatus::Approved,
            TransitionPolicy::Permissive,
        );
        assert_eq!(
            result,
            Err(WorkflowError::StatusRequiresAdmin {
                status: BillStatus::Approved
            })
        );
    }

    #[test]
    fn test_user_cannot_edit_approved_bill() {
        let result = WorkflowService::authorize_bill_save(
            &user(),
            Some(BillStatus::Approved),
            BillStatus::Submitted,
            TransitionPolicy::Permissive,
        );
        assert_eq!(
            result,
            Err(WorkflowError::ReadOnlyBill {
                status: BillStatus::Approved
            })
        );
    }

    #[test]
    fn test_admin_can_regress_when_permissive() {
        let result = WorkflowService::authorize_bill_save(
            &admin(),
            Some(BillStatus::PaymentProcessed),
            BillStatus::Submitted,
            TransitionPolicy::Permissive,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_admin_cannot_regress_when_monotonic() {
        let result = WorkflowService::authorize_bill_save(
            &admin(),
            Some(BillStatus::PaymentProcessed),
            BillStatus::Approved,
            TransitionPolicy::Monotonic,
        );
        assert_eq!(
            result,
            Err(WorkflowError::InvalidTransition {
                from: BillStatus::PaymentProcessed,
                to: BillStatus::Approved,
            })
        );
    }

    #[test]
    fn test_admin_may_skip_forward_when_monotonic() {
        let result = WorkflowService::authorize_bill_save(
            &admin(),
            Some(BillStatus::Submitted),
            BillStatus::PaymentProcessed,
            TransitionPolicy::Monotonic,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_admin_creates_with_any_status() {
        for policy in [TransitionPolicy::Permissive, TransitionPolicy::Monotonic] {
            for status in BillStatus::ALL {
                assert!(WorkflowService::authorize_bill_save(&admin(), None, status, policy).is_ok());
            }
        }
    }

    #[test]
    fn test_allowed_targets() {
        assert_eq!(
            WorkflowService::allowed_targets(&user(), None, TransitionPolicy::Permissive),
            vec![BillStatus::Submitted]
        );
        assert!(
            WorkflowService::allowed_targets(
                &user(),
                Some(BillStatus::Approved),
                TransitionPolicy::Permissive
            )
            .is_empty()
        );
        assert_eq!(
            WorkflowService::allowed_targets(
                &admin(),
                Some(BillStatus::Approved),
                TransitionPolicy::Monotonic
            ),
            vec![BillStatus::Approved, BillStatus::PaymentProcessed]
        );
        assert_eq!(
            WorkflowService::allowed_targets(
                &admin(),
                Some(BillStatus::PaymentProcessed),
                TransitionPolicy::Permissive
            ),
            BillStatus::ALL.to_vec()
        );
    }

    #[test]
    fn test_delete_and_payment_writes_are_admin_only() {
        assert!(WorkflowService::authorize_bill_delete(&admin()).is_ok());
        assert!(WorkflowService::authorize_payment_write(&admin()).is_ok());
        assert!(matches!(
            WorkflowService::authorize_bill_delete(&user()),
            Err(WorkflowError::InsufficientRole { .. })
        ));
        assert!(matches!(
            WorkflowService::authorize_payment_write(&user()),
            Err(WorkflowError::InsufficientRole { .. })
        ));
    }
}
