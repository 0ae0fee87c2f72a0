//! Purchase and sales payments.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sitebook_shared::types::money::deserialize_lenient;
use sitebook_shared::types::{CounterpartyId, PaymentId, PaymentMethodId, ProjectId};
use std::collections::HashMap;

use super::bill::AuditStamp;
use super::deserialize_day;

/// Display names of payment methods keyed by ID.
pub type MethodNames = HashMap<PaymentMethodId, String>;

/// A payment made to a vendor or received from a customer.
///
/// Payments carry no status and are not linked to individual bills; they
/// reduce the counterparty's running balance as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID.
    pub id: PaymentId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Vendor or customer, depending on the side.
    #[serde(alias = "vendor_id", alias = "customer_id")]
    pub counterparty_id: CounterpartyId,
    /// Payment date.
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    /// Amount paid.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub amount: Decimal,
    /// How the payment was made.
    pub payment_method_id: PaymentMethodId,
    /// Free-text notes.
    #[serde(default)]
    pub description: Option<String>,
    /// Audit stamps.
    #[serde(flatten)]
    pub audit: AuditStamp,
}

/// A payment method such as a bank account or cash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Method ID.
    pub id: PaymentMethodId,
    /// Display name.
    pub name: String,
    /// Opening balance; not used by the ledger computations.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub opening_balance: Decimal,
}

impl PaymentMethod {
    /// Builds the ID → display name lookup used by statement feeds.
    #[must_use]
    pub fn names(methods: &[Self]) -> MethodNames {
        methods
            .iter()
            .map(|m| (m.id, m.name.clone()))
            .collect()
    }
}
