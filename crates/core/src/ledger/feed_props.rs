//! Property-based tests for statement feeds.

use proptest::prelude::*;
use rust_decimal::Decimal;
use sitebook_shared::types::{CounterpartyId, PaymentMethodId, ProjectId};

use super::feed::{FeedBuilder, FeedFilter, FeedItem, FeedOptions, SortOrder};
use super::summary::fixtures::{bill, day, payment};
use crate::records::{Bill, MethodNames, Payment};
use crate::workflow::types::BillStatus;

fn status() -> impl Strategy<Value = BillStatus> {
    prop_oneof![
        Just(BillStatus::Submitted),
        Just(BillStatus::Approved),
        Just(BillStatus::PaymentProcessed),
    ]
}

fn records() -> impl Strategy<Value = (Vec<Bill>, Vec<Payment>)> {
    let project = ProjectId::new();
    let counterparty = CounterpartyId::new();
    let method = PaymentMethodId::new();
    (
        prop::collection::vec((1i64..1_000_000, status(), 1u32..=28), 0..10),
        prop::collection::vec((1i64..1_000_000, 1u32..=28), 0..10),
    )
        .prop_map(move |(bill_rows, payment_rows)| {
            let bills = bill_rows
                .into_iter()
                .map(|(amt, status, d)| {
                    bill(project, counterparty, Decimal::new(amt, 2), Decimal::ZERO, status, day(d))
                })
                .collect();
            let payments = payment_rows
                .into_iter()
                .map(|(amt, d)| payment(project, counterparty, Decimal::new(amt, 2), method, day(d)))
                .collect();
            (bills, payments)
        })
}

fn options(filter: FeedFilter, order: SortOrder) -> FeedOptions {
    FeedOptions { filter, order }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The bill-only feed is the all-records feed with payments removed.
    #[test]
    fn prop_bill_filter_is_subsequence((bills, payments) in records(), asc in any::<bool>()) {
        let order = if asc { SortOrder::Asc } else { SortOrder::Desc };
        let methods = MethodNames::new();

        let all = FeedBuilder::build(&bills, &payments, &methods, options(FeedFilter::All, order));
        let only_bills = FeedBuilder::build(&bills, &payments, &methods, options(FeedFilter::Bill, order));

        let filtered: Vec<FeedItem<'_>> = all.into_iter().filter(FeedItem::is_bill).collect();
        prop_assert_eq!(filtered, only_bills);
    }

    /// Dates are monotone in the requested direction.
    #[test]
    fn prop_dates_follow_order((bills, payments) in records()) {
        let methods = MethodNames::new();

        let asc = FeedBuilder::build(&bills, &payments, &methods, options(FeedFilter::All, SortOrder::Asc));
        prop_assert!(asc.windows(2).all(|w| w[0].date() <= w[1].date()));

        let desc = FeedBuilder::build(&bills, &payments, &methods, options(FeedFilter::All, SortOrder::Desc));
        prop_assert!(desc.windows(2).all(|w| w[0].date() >= w[1].date()));

        let mut asc_dates: Vec<_> = asc.iter().map(FeedItem::date).collect();
        asc_dates.reverse();
        let desc_dates: Vec<_> = desc.iter().map(FeedItem::date).collect();
        prop_assert_eq!(asc_dates, desc_dates);
    }

    /// Submitted bills never reach a statement.
    #[test]
    fn prop_no_submitted_bills((bills, payments) in records()) {
        let methods = MethodNames::new();
        let feed = FeedBuilder::build(&bills, &payments, &methods, FeedOptions::default());
        let approved = bills.iter().filter(|b| b.status.is_approved()).count();
        prop_assert_eq!(feed.len(), approved + payments.len());
    }
}
