//! Statement feeds: bills and payments merged into one date-ordered list.
//!
//! Feeds borrow from the fetched records and are rebuilt in full on every
//! call. Sorting is stable, so records sharing a date keep the order they
//! had in the input (bills before payments in a merged feed).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sitebook_shared::types::CounterpartyId;

use crate::records::{Bill, MethodNames, Payment, Side};

/// Shown when a payment's method is missing from the lookup.
pub const METHOD_PLACEHOLDER: &str = "\u{2014}";

/// Which record kinds a statement shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    /// Bills and payments.
    #[default]
    All,
    /// Bills only.
    Bill,
    /// Payments only.
    Payment,
}

impl FeedFilter {
    /// Parses a filter from its lowercase name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "bill" => Some(Self::Bill),
            "payment" => Some(Self::Payment),
            _ => None,
        }
    }

    fn includes_bills(self) -> bool {
        matches!(self, Self::All | Self::Bill)
    }

    fn includes_payments(self) -> bool {
        matches!(self, Self::All | Self::Payment)
    }
}

/// Date direction of a statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Parses an order from its lowercase name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// The other direction.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Toggle label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Asc => "Oldest",
            Self::Desc => "Newest",
        }
    }
}

/// Filter and order of a statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedOptions {
    /// Record kinds to include.
    pub filter: FeedFilter,
    /// Date direction.
    pub order: SortOrder,
}

/// One statement row.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem<'a> {
    /// An approved or payment-processed bill.
    Bill(&'a Bill),
    /// A payment with its method's display name.
    Payment {
        /// The payment.
        payment: &'a Payment,
        /// Method name, or [`METHOD_PLACEHOLDER`].
        method_name: &'a str,
    },
}

impl FeedItem<'_> {
    /// Transaction date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Bill(bill) => bill.date,
            Self::Payment { payment, .. } => payment.date,
        }
    }

    /// Net amount for bills, amount for payments.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Bill(bill) => bill.net_amount(),
            Self::Payment { payment, .. } => payment.amount,
        }
    }

    /// Returns true for bill rows.
    #[must_use]
    pub fn is_bill(&self) -> bool {
        matches!(self, Self::Bill(_))
    }
}

/// A labeled part of a combined project statement.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSection<'a> {
    /// Which ledger the rows come from.
    pub side: Side,
    /// Sorted rows.
    pub items: Vec<FeedItem<'a>>,
}

impl FeedSection<'_> {
    /// Section heading ("Purchase" or "Sales").
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.side.label()
    }
}

/// One row of a project's cash activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityItem<'a> {
    /// A purchase bill, any status.
    Expense(&'a Bill),
    /// A sales payment.
    Received(&'a Payment),
}

impl ActivityItem<'_> {
    /// Transaction date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Expense(bill) => bill.date,
            Self::Received(payment) => payment.date,
        }
    }

    /// Signed effect on the project balance: expenses negative, receipts positive.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self {
            Self::Expense(bill) => -bill.net_amount(),
            Self::Received(payment) => payment.amount,
        }
    }
}

/// Stateless statement builder.
pub struct FeedBuilder;

impl FeedBuilder {
    /// Merges approved bills and payments into one date-ordered feed.
    ///
    /// Submitted bills never appear. Payments whose method is not in
    /// `methods` get [`METHOD_PLACEHOLDER`].
    #[must_use]
    pub fn build<'a>(
        bills: &'a [Bill],
        payments: &'a [Payment],
        methods: &'a MethodNames,
        options: FeedOptions,
    ) -> Vec<FeedItem<'a>> {
        Self::build_from(bills.iter(), payments.iter(), methods, options)
    }

    /// [`Self::build`] restricted to one vendor or customer.
    #[must_use]
    pub fn build_for_counterparty<'a>(
        bills: &'a [Bill],
        payments: &'a [Payment],
        methods: &'a MethodNames,
        counterparty_id: CounterpartyId,
        options: FeedOptions,
    ) -> Vec<FeedItem<'a>> {
        Self::build_from(
            bills.iter().filter(|b| b.counterparty_id == counterparty_id),
            payments.iter().filter(|p| p.counterparty_id == counterparty_id),
            methods,
            options,
        )
    }

    /// Combined project statement: a Purchase section then a Sales section,
    /// each built and sorted independently.
    #[must_use]
    pub fn project_statement<'a>(
        purchase_bills: &'a [Bill],
        purchase_payments: &'a [Payment],
        sales_bills: &'a [Bill],
        sales_payments: &'a [Payment],
        methods: &'a MethodNames,
        options: FeedOptions,
    ) -> [FeedSection<'a>; 2] {
        [
            FeedSection {
                side: Side::Purchase,
                items: Self::build(purchase_bills, purchase_payments, methods, options),
            },
            FeedSection {
                side: Side::Sales,
                items: Self::build(sales_bills, sales_payments, methods, options),
            },
        ]
    }

    /// Bills still awaiting approval, date-ordered.
    #[must_use]
    pub fn pending_bills(bills: &[Bill], order: SortOrder) -> Vec<&Bill> {
        let mut pending: Vec<&Bill> = bills.iter().filter(|b| b.status.is_pending()).collect();
        Self::sort_by_date(&mut pending, order, |b| b.date);
        pending
    }

    /// Purchase bills as expenses and sales payments as receipts, date-ordered.
    #[must_use]
    pub fn project_activity<'a>(
        purchase_bills: &'a [Bill],
        sales_payments: &'a [Payment],
        order: SortOrder,
    ) -> Vec<ActivityItem<'a>> {
        let mut items: Vec<ActivityItem<'a>> = purchase_bills
            .iter()
            .map(ActivityItem::Expense)
            .chain(sales_payments.iter().map(ActivityItem::Received))
            .collect();
        Self::sort_by_date(&mut items, order, ActivityItem::date);
        items
    }

    /// Stable sort by date in the given direction.
    pub fn sort_by_date<T>(items: &mut [T], order: SortOrder, date: impl Fn(&T) -> NaiveDate) {
        match order {
            SortOrder::Asc => items.sort_by(|a, b| date(a).cmp(&date(b))),
            SortOrder::Desc => items.sort_by(|a, b| date(b).cmp(&date(a))),
        }
    }

    fn build_from<'a>(
        bills: impl Iterator<Item = &'a Bill>,
        payments: impl Iterator<Item = &'a Payment>,
        methods: &'a MethodNames,
        options: FeedOptions,
    ) -> Vec<FeedItem<'a>> {
        let mut items: Vec<FeedItem<'a>> = Vec::new();

        if options.filter.includes_bills() {
            items.extend(bills.filter(|b| b.status.is_approved()).map(FeedItem::Bill));
        }
        if options.filter.includes_payments() {
            items.extend(payments.map(|payment| FeedItem::Payment {
                payment,
                method_name: methods
                    .get(&payment.payment_method_id)
                    .map_or(METHOD_PLACEHOLDER, String::as_str),
            }));
        }

        Self::sort_by_date(&mut items, options.order, FeedItem::date);
        items
    }
}
