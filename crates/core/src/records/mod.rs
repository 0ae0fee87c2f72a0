//! Records as received from the data backend.
//!
//! Records are immutable snapshots; a save replaces the whole row. Amount
//! fields are coerced with parse-or-zero on the way in because the backend
//! does not guarantee numeric types.
//!
//! # Modules
//!
//! - `bill` - Purchase and sales bills
//! - `payment` - Purchase and sales payments, payment methods
//! - `party` - Projects, counterparties, categories and user profiles
//! - `side` - Purchase vs. sales ledger side

pub mod bill;
pub mod party;
pub mod payment;
pub mod side;

pub use bill::{AuditStamp, Bill, GstRate};
pub use party::{Counterparty, Project, ProjectStatus, PurchaseCategory, User};
pub use payment::{MethodNames, Payment, PaymentMethod};
pub use side::Side;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Deserializes a transaction date given as `YYYY-MM-DD` or a full timestamp.
pub(crate) fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(serde::de::Error::custom)
}
