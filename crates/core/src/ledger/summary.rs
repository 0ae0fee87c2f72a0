//! Ledger aggregation: paid, outstanding and pending-approval totals.
//!
//! This is a running-balance model. Payments are not matched to bills; a
//! counterparty's outstanding is its approved bill total minus everything
//! paid, floored at zero.
//!
//! - `paid` = Σ payment.amount
//! - `outstanding` = max(0, Σ net(approved or processed bills) − paid)
//! - `pending_approval` = Σ net(submitted bills)
//!
//! where net(bill) = amount − discount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sitebook_shared::types::{CounterpartyId, ProjectId};
use std::collections::{HashMap, HashSet};
use std::iter::Sum;
use std::ops::Add;

use crate::records::{Bill, Payment};

/// Paid / outstanding / pending-approval totals for one scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Sum of payment amounts.
    pub paid: Decimal,
    /// Approved bill total less payments, never negative.
    pub outstanding: Decimal,
    /// Net total of bills still awaiting approval.
    pub pending_approval: Decimal,
}

impl Add for LedgerSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            paid: self.paid + rhs.paid,
            outstanding: self.outstanding + rhs.outstanding,
            pending_approval: self.pending_approval + rhs.pending_approval,
        }
    }
}

impl Sum for LedgerSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a LedgerSummary> for LedgerSummary {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Purchase and sales outstanding of one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOutstanding {
    /// Owed to vendors.
    pub purchase: Decimal,
    /// Owed by customers.
    pub sales: Decimal,
    /// `purchase - sales`; may be negative.
    pub combined: Decimal,
}

impl ProjectOutstanding {
    /// Builds the pair and its combined figure.
    #[must_use]
    pub fn new(purchase: Decimal, sales: Decimal) -> Self {
        Self {
            purchase,
            sales,
            combined: purchase - sales,
        }
    }
}

impl Add for ProjectOutstanding {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.purchase + rhs.purchase, self.sales + rhs.sales)
    }
}

impl Sum for ProjectOutstanding {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Net cash position of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPosition {
    /// Net of all purchase bills, whatever their status.
    pub expenses: Decimal,
    /// Sum of sales payments received.
    pub received: Decimal,
    /// `received - expenses`.
    pub balance: Decimal,
}

/// Stateless aggregation over already-fetched bills and payments.
///
/// Every function is pure: the same inputs always produce the same output,
/// and empty inputs produce zeros.
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// Summary over every record given (a whole project, for instance).
    #[must_use]
    pub fn summarize<'a, B, P>(bills: B, payments: P) -> LedgerSummary
    where
        B: IntoIterator<Item = &'a Bill>,
        P: IntoIterator<Item = &'a Payment>,
    {
        let paid: Decimal = payments.into_iter().map(|p| p.amount).sum();

        let mut approved = Decimal::ZERO;
        let mut pending_approval = Decimal::ZERO;
        for bill in bills {
            if bill.status.is_approved() {
                approved += bill.net_amount();
            } else if bill.status.is_pending() {
                pending_approval += bill.net_amount();
            }
        }

        LedgerSummary {
            paid,
            outstanding: (approved - paid).max(Decimal::ZERO),
            pending_approval,
        }
    }

    /// Summary for one vendor or customer. Records of other counterparties are ignored.
    #[must_use]
    pub fn summarize_counterparty(
        bills: &[Bill],
        payments: &[Payment],
        counterparty_id: CounterpartyId,
    ) -> LedgerSummary {
        Self::summarize(
            bills.iter().filter(|b| b.counterparty_id == counterparty_id),
            payments.iter().filter(|p| p.counterparty_id == counterparty_id),
        )
    }

    /// Summary for one project. Records of other projects are ignored.
    #[must_use]
    pub fn summarize_project(
        bills: &[Bill],
        payments: &[Payment],
        project_id: ProjectId,
    ) -> LedgerSummary {
        Self::summarize(
            bills.iter().filter(|b| b.project_id == project_id),
            payments.iter().filter(|p| p.project_id == project_id),
        )
    }

    /// Summary per counterparty for every counterparty that appears in the records.
    #[must_use]
    pub fn summaries_by_counterparty(
        bills: &[Bill],
        payments: &[Payment],
    ) -> HashMap<CounterpartyId, LedgerSummary> {
        let mut bills_by: HashMap<CounterpartyId, Vec<&Bill>> = HashMap::new();
        for bill in bills {
            bills_by.entry(bill.counterparty_id).or_default().push(bill);
        }
        let mut payments_by: HashMap<CounterpartyId, Vec<&Payment>> = HashMap::new();
        for payment in payments {
            payments_by
                .entry(payment.counterparty_id)
                .or_default()
                .push(payment);
        }

        let ids: HashSet<CounterpartyId> = bills_by
            .keys()
            .chain(payments_by.keys())
            .copied()
            .collect();

        ids.into_iter()
            .map(|id| {
                let b = bills_by.get(&id).map(Vec::as_slice).unwrap_or_default();
                let p = payments_by.get(&id).map(Vec::as_slice).unwrap_or_default();
                (id, Self::summarize(b.iter().copied(), p.iter().copied()))
            })
            .collect()
    }

    /// Purchase and sales outstanding of one project.
    #[must_use]
    pub fn project_outstanding(
        purchase_bills: &[Bill],
        purchase_payments: &[Payment],
        sales_bills: &[Bill],
        sales_payments: &[Payment],
        project_id: ProjectId,
    ) -> ProjectOutstanding {
        let purchase = Self::summarize_project(purchase_bills, purchase_payments, project_id);
        let sales = Self::summarize_project(sales_bills, sales_payments, project_id);
        ProjectOutstanding::new(purchase.outstanding, sales.outstanding)
    }

    /// Net cash position: sales receipts against all purchase bills.
    #[must_use]
    pub fn project_position(purchase_bills: &[Bill], sales_payments: &[Payment]) -> ProjectPosition {
        let expenses: Decimal = purchase_bills.iter().map(Bill::net_amount).sum();
        let received: Decimal = sales_payments.iter().map(|p| p.amount).sum();
        ProjectPosition {
            expenses,
            received,
            balance: received - expenses,
        }
    }

    /// Net total of the submitted bills in the list.
    #[must_use]
    pub fn pending_total(bills: &[Bill]) -> Decimal {
        bills
            .iter()
            .filter(|b| b.status.is_pending())
            .map(Bill::net_amount)
            .sum()
    }
}
