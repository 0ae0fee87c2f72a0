//! Backend tables and row filters.
//!
//! Filters render as PostgREST query pairs (`status=eq.approved`,
//! `id=in.(a,b)`) for the REST backend and evaluate directly against JSON
//! rows for the in-memory one.

use serde_json::Value;
use sitebook_core::records::Side;
use std::fmt;

/// Backend tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Vendor bills.
    PurchaseBills,
    /// Payments to vendors.
    PurchasePayments,
    /// Customer bills.
    SalesBills,
    /// Payments from customers.
    SalesPayments,
    /// Vendors.
    Vendors,
    /// Customers.
    Customers,
    /// Projects.
    Projects,
    /// Payment methods.
    PaymentMethods,
    /// Purchase categories with their subcategories.
    PurchaseCategories,
    /// User profiles.
    Users,
}

impl Table {
    /// Bill table of a side.
    #[must_use]
    pub fn bills(side: Side) -> Self {
        match side {
            Side::Purchase => Self::PurchaseBills,
            Side::Sales => Self::SalesBills,
        }
    }

    /// Payment table of a side.
    #[must_use]
    pub fn payments(side: Side) -> Self {
        match side {
            Side::Purchase => Self::PurchasePayments,
            Side::Sales => Self::SalesPayments,
        }
    }

    /// Counterparty table of a side.
    #[must_use]
    pub fn counterparties(side: Side) -> Self {
        match side {
            Side::Purchase => Self::Vendors,
            Side::Sales => Self::Customers,
        }
    }

    /// Table name on the backend.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PurchaseBills => "bills",
            Self::PurchasePayments => "payments",
            Self::SalesBills => "bills_sales",
            Self::SalesPayments => "payments_sales",
            Self::Vendors => "vendors",
            Self::Customers => "customers",
            Self::Projects => "projects",
            Self::PaymentMethods => "payment_methods",
            Self::PurchaseCategories => "purchase_categories",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column holding the counterparty on a side's bill and payment tables.
#[must_use]
pub fn counterparty_column(side: Side) -> &'static str {
    match side {
        Side::Purchase => "vendor_id",
        Side::Sales => "customer_id",
    }
}

/// One column condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Column equals the value.
    Eq(String, String),
    /// Column is one of the values.
    In(String, Vec<String>),
}

impl Filter {
    fn column(&self) -> &str {
        match self {
            Self::Eq(column, _) | Self::In(column, _) => column,
        }
    }

    fn operand(&self) -> String {
        match self {
            Self::Eq(_, value) => format!("eq.{value}"),
            Self::In(_, values) => format!("in.({})", values.join(",")),
        }
    }

    fn matches(&self, row: &Value) -> bool {
        let Some(cell) = row.get(self.column()).and_then(cell_text) else {
            return false;
        };
        match self {
            Self::Eq(_, value) => cell == *value,
            Self::In(_, values) => values.contains(&cell),
        }
    }
}

/// A select over one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Table to read.
    pub table: Table,
    /// Conditions, all of which must hold.
    pub filters: Vec<Filter>,
}

impl Query {
    /// Every row of `table`.
    #[must_use]
    pub fn table(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
        }
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push(Filter::Eq(column.to_string(), value.to_string()));
        self
    }

    /// Adds a membership condition.
    #[must_use]
    pub fn any_of<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.filters.push(Filter::In(
            column.to_string(),
            values.into_iter().map(|v| v.to_string()).collect(),
        ));
        self
    }

    /// Query-string pairs, starting with `select=*`.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        std::iter::once(("select".to_string(), "*".to_string()))
            .chain(
                self.filters
                    .iter()
                    .map(|f| (f.column().to_string(), f.operand())),
            )
            .collect()
    }

    /// Returns true if the row satisfies every condition.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
