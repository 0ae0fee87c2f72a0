//! Purchase and sales bills.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitebook_shared::types::money::{coerce_value, deserialize_lenient};
use sitebook_shared::types::{BillId, CounterpartyId, ProjectId, UserId};

use super::deserialize_day;
use crate::workflow::types::BillStatus;

/// GST slab recorded on a bill.
///
/// Stored for display only; it is never computed into totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "u8")]
pub enum GstRate {
    /// No GST.
    #[default]
    Zero,
    /// 5% slab.
    Five,
    /// 18% slab.
    Eighteen,
}

impl GstRate {
    /// Returns the slab as a whole percentage.
    #[must_use]
    pub fn percent(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::Five => 5,
            Self::Eighteen => 18,
        }
    }
}

impl From<Value> for GstRate {
    fn from(value: Value) -> Self {
        let pct = coerce_value(&value);
        if pct == Decimal::from(5) {
            Self::Five
        } else if pct == Decimal::from(18) {
            Self::Eighteen
        } else {
            Self::Zero
        }
    }
}

impl From<GstRate> for u8 {
    fn from(rate: GstRate) -> Self {
        rate.percent()
    }
}

/// Last-modified stamps carried by bills and payments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    /// Profile that created the record.
    #[serde(default)]
    pub created_by: Option<UserId>,
    /// When the record was created.
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    /// Profile that last saved the record.
    #[serde(default)]
    pub modified_by: Option<UserId>,
    /// When the record was last saved.
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
}

impl AuditStamp {
    /// Stamp for a freshly inserted record.
    #[must_use]
    pub fn created(by: UserId, at: DateTime<Utc>) -> Self {
        Self {
            created_by: Some(by),
            created_date: Some(at),
            modified_by: Some(by),
            modified_date: Some(at),
        }
    }

    /// Returns a copy with the modification fields replaced.
    #[must_use]
    pub fn touched(&self, by: UserId, at: DateTime<Utc>) -> Self {
        Self {
            modified_by: Some(by),
            modified_date: Some(at),
            ..self.clone()
        }
    }
}

/// A purchase bill (vendor) or sales bill (customer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Bill ID.
    pub id: BillId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Vendor or customer, depending on the side.
    #[serde(alias = "vendor_id", alias = "customer_id")]
    pub counterparty_id: CounterpartyId,
    /// Counterparty's bill number.
    #[serde(default)]
    pub bill_number: Option<String>,
    /// Bill date.
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    /// Gross amount.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub amount: Decimal,
    /// Discount off the gross amount.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub discount: Decimal,
    /// Purchase category.
    #[serde(default)]
    pub category: Option<String>,
    /// Subcategory within the category.
    #[serde(default)]
    pub subcategory: Option<String>,
    /// GST slab.
    #[serde(default)]
    pub gst: GstRate,
    /// Free-text notes.
    #[serde(default)]
    pub description: Option<String>,
    /// Workflow status.
    pub status: BillStatus,
    /// Audit stamps.
    #[serde(flatten)]
    pub audit: AuditStamp,
}

impl Bill {
    /// `amount - discount`. May be negative when the discount is larger.
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        self.amount - self.discount
    }
}
