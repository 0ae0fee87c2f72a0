//! Property-based tests for WorkflowService.

use proptest::prelude::*;
use sitebook_shared::types::UserId;
use uuid::Uuid;

use crate::workflow::access::{Actor, UserRole};
use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{BillStatus, TransitionPolicy};

/// Strategy for generating random BillStatus values.
fn arb_status() -> impl Strategy<Value = BillStatus> {
    prop_oneof![
        Just(BillStatus::Submitted),
        Just(BillStatus::Approved),
        Just(BillStatus::PaymentProcessed),
    ]
}

/// Strategy for generating an optional stored status (None = new bill).
fn arb_current() -> impl Strategy<Value = Option<BillStatus>> {
    prop_oneof![Just(None), arb_status().prop_map(Some)]
}

fn arb_policy() -> impl Strategy<Value = TransitionPolicy> {
    prop_oneof![
        Just(TransitionPolicy::Permissive),
        Just(TransitionPolicy::Monotonic),
    ]
}

fn arb_actor(role: UserRole) -> impl Strategy<Value = Actor> {
    any::<u128>().prop_map(move |n| Actor::new(UserId::from_uuid(Uuid::from_u128(n)), role))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Permissive admins can set any status from any status.
    #[test]
    fn prop_permissive_admin_sets_anything(
        actor in arb_actor(UserRole::Admin),
        current in arb_current(),
        to in arb_status(),
    ) {
        let change = WorkflowService::authorize_bill_save(&actor, current, to, TransitionPolicy::Permissive);
        prop_assert!(change.is_ok());
        let change = change.unwrap();
        prop_assert_eq!(change.to, to);
        prop_assert_eq!(change.from, current);
        prop_assert_eq!(change.changed_by, actor.id);
    }

    /// Monotonic admins never move a bill backwards.
    #[test]
    fn prop_monotonic_never_regresses(
        actor in arb_actor(UserRole::Admin),
        from in arb_status(),
        to in arb_status(),
    ) {
        let result = WorkflowService::authorize_bill_save(&actor, Some(from), to, TransitionPolicy::Monotonic);
        if to.rank() >= from.rank() {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result, Err(WorkflowError::InvalidTransition { from, to }));
        }
    }

    /// Whatever the policy, a non-admin only ever writes `submitted`.
    #[test]
    fn prop_user_only_writes_submitted(
        actor in arb_actor(UserRole::User),
        current in arb_current(),
        to in arb_status(),
        policy in arb_policy(),
    ) {
        if let Ok(change) = WorkflowService::authorize_bill_save(&actor, current, to, policy) {
            prop_assert_eq!(change.to, BillStatus::Submitted);
            prop_assert!(current.is_none_or(|s| s == BillStatus::Submitted));
        }
    }

    /// allowed_targets agrees with authorize_bill_save.
    #[test]
    fn prop_allowed_targets_consistent(
        role in prop_oneof![Just(UserRole::User), Just(UserRole::Admin)],
        current in arb_current(),
        policy in arb_policy(),
    ) {
        let actor = Actor::new(UserId::new(), role);
        let allowed = WorkflowService::allowed_targets(&actor, current, policy);
        for to in BillStatus::ALL {
            let ok = WorkflowService::authorize_bill_save(&actor, current, to, policy).is_ok();
            prop_assert_eq!(ok, allowed.contains(&to));
        }
    }
}
