//! Property-based tests for ledger aggregation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use sitebook_shared::types::{CounterpartyId, PaymentMethodId, ProjectId};

use super::summary::fixtures::{bill, day, payment};
use super::summary::LedgerAggregator;
use crate::records::{Bill, Payment};
use crate::workflow::types::BillStatus;

/// Strategy for amounts from 0.00 to 1,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

fn status() -> impl Strategy<Value = BillStatus> {
    prop_oneof![
        Just(BillStatus::Submitted),
        Just(BillStatus::Approved),
        Just(BillStatus::PaymentProcessed),
    ]
}

/// Bills for one project and counterparty; discount never exceeds amount.
fn bills() -> impl Strategy<Value = Vec<Bill>> {
    let project = ProjectId::new();
    let counterparty = CounterpartyId::new();
    prop::collection::vec((amount(), 0u32..=100, status(), 1u32..=28), 0..12).prop_map(
        move |rows| {
            rows.into_iter()
                .map(|(amount, pct, status, d)| {
                    let discount = (amount * Decimal::from(pct) / Decimal::ONE_HUNDRED).round_dp(2);
                    bill(project, counterparty, amount, discount, status, day(d))
                })
                .collect()
        },
    )
}

fn payments() -> impl Strategy<Value = Vec<Payment>> {
    let project = ProjectId::new();
    let counterparty = CounterpartyId::new();
    let method = PaymentMethodId::new();
    prop::collection::vec((amount(), 1u32..=28), 0..12).prop_map(move |rows| {
        rows.into_iter()
            .map(|(amount, d)| payment(project, counterparty, amount, method, day(d)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Outstanding is never negative.
    #[test]
    fn prop_outstanding_non_negative(bills in bills(), payments in payments()) {
        let summary = LedgerAggregator::summarize(&bills, &payments);
        prop_assert!(summary.outstanding >= Decimal::ZERO);
    }

    /// With no approved or processed bills nothing is outstanding.
    #[test]
    fn prop_no_approved_bills_nothing_outstanding(bills in bills(), payments in payments()) {
        let submitted: Vec<Bill> = bills
            .into_iter()
            .filter(|b| b.status == BillStatus::Submitted)
            .collect();
        let summary = LedgerAggregator::summarize(&submitted, &payments);
        prop_assert_eq!(summary.outstanding, Decimal::ZERO);
    }

    /// One more payment of x raises paid by x and lowers outstanding by min(x, outstanding).
    #[test]
    fn prop_extra_payment_effect(bills in bills(), payments in payments(), x in amount()) {
        let before = LedgerAggregator::summarize(&bills, &payments);

        let mut more = payments.clone();
        more.push(payment(ProjectId::new(), CounterpartyId::new(), x, PaymentMethodId::new(), day(1)));
        let after = LedgerAggregator::summarize(&bills, &more);

        prop_assert_eq!(after.paid, before.paid + x);
        prop_assert_eq!(after.outstanding, before.outstanding - x.min(before.outstanding));
    }

    /// Pending approval does not depend on payments.
    #[test]
    fn prop_pending_ignores_payments(bills in bills(), payments in payments()) {
        let with = LedgerAggregator::summarize(&bills, &payments);
        let without = LedgerAggregator::summarize(&bills, std::iter::empty());
        prop_assert_eq!(with.pending_approval, without.pending_approval);
        prop_assert_eq!(with.pending_approval, LedgerAggregator::pending_total(&bills));
    }

    /// Same inputs, same summary; input order is irrelevant.
    #[test]
    fn prop_summary_is_pure(bills in bills(), payments in payments()) {
        let first = LedgerAggregator::summarize(&bills, &payments);
        let again = LedgerAggregator::summarize(&bills, &payments);
        prop_assert_eq!(first, again);

        let reversed_bills: Vec<Bill> = bills.iter().rev().cloned().collect();
        let reversed_payments: Vec<Payment> = payments.iter().rev().cloned().collect();
        prop_assert_eq!(first, LedgerAggregator::summarize(&reversed_bills, &reversed_payments));
    }
}
