//! Bill and payment form drafts.
//!
//! A draft holds what the user typed. `prepare` runs the permission check,
//! validates the fields and produces the row to write, stamped with the
//! actor and time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sitebook_shared::types::money::parse_or_zero;
use sitebook_shared::types::{CounterpartyId, PaymentMethodId, ProjectId, UserId};

use crate::records::{GstRate, Side};
use crate::workflow::access::Actor;
use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{BillStatus, TransitionPolicy};

/// Audit columns written on save. Creation columns only go out on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteStamp {
    /// Set on insert only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    /// Set on insert only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Always set.
    pub modified_by: UserId,
    /// Always set.
    pub modified_date: chrono::DateTime<chrono::Utc>,
}

impl WriteStamp {
    fn new(actor: &Actor, at: chrono::DateTime<chrono::Utc>, is_new: bool) -> Self {
        Self {
            created_by: is_new.then_some(actor.id),
            created_date: is_new.then_some(at),
            modified_by: actor.id,
            modified_date: at,
        }
    }
}

/// Bill form input.
#[derive(Debug, Clone)]
pub struct BillDraft {
    /// Ledger side.
    pub side: Side,
    /// Owning project.
    pub project_id: ProjectId,
    /// Selected vendor or customer.
    pub counterparty_id: Option<CounterpartyId>,
    /// Bill number as typed.
    pub bill_number: String,
    /// Bill date.
    pub date: NaiveDate,
    /// Amount as typed.
    pub amount: String,
    /// Discount as typed.
    pub discount: String,
    /// Selected category.
    pub category: Option<String>,
    /// Selected subcategory.
    pub subcategory: Option<String>,
    /// GST slab.
    pub gst: GstRate,
    /// Notes as typed.
    pub description: String,
    /// Status of the save button pressed.
    pub status: BillStatus,
}

/// Bill row ready to insert or update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillRow {
    /// Owning project.
    pub project_id: ProjectId,
    /// Vendor or customer; the store maps this to the side's column.
    pub counterparty_id: CounterpartyId,
    /// Trimmed bill number.
    pub bill_number: String,
    /// Bill date.
    pub date: NaiveDate,
    /// Gross amount.
    pub amount: Decimal,
    /// Discount.
    pub discount: Decimal,
    /// Category.
    pub category: String,
    /// Subcategory, `None` when blank.
    pub subcategory: Option<String>,
    /// GST slab.
    pub gst: GstRate,
    /// Notes, `None` when blank.
    pub description: Option<String>,
    /// Status being written.
    pub status: BillStatus,
    /// Audit columns.
    #[serde(flatten)]
    pub stamp: WriteStamp,
}

impl BillDraft {
    /// Parsed amount, zero when unparseable.
    #[must_use]
    pub fn amount_value(&self) -> Decimal {
        parse_or_zero(&self.amount)
    }

    /// Parsed discount, zero when unparseable.
    #[must_use]
    pub fn discount_value(&self) -> Decimal {
        parse_or_zero(&self.discount)
    }

    /// Net amount shown on the form, never negative.
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        (self.amount_value() - self.discount_value()).max(Decimal::ZERO)
    }

    /// Checks required fields, first failure wins.
    pub fn validate(&self) -> Result<CounterpartyId, WorkflowError> {
        let Some(counterparty_id) = self.counterparty_id else {
            return Err(WorkflowError::Validation(format!(
                "Please select a {}",
                self.side.counterparty_noun()
            )));
        };
        if self.bill_number.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "Bill number is required".to_string(),
            ));
        }
        if self.amount_value() <= Decimal::ZERO {
            return Err(WorkflowError::Validation(
                "Bill amount must be greater than 0".to_string(),
            ));
        }
        if self.category.as_deref().is_none_or(|c| c.trim().is_empty()) {
            return Err(WorkflowError::Validation(
                "Please select a category".to_string(),
            ));
        }
        Ok(counterparty_id)
    }

    /// Authorizes and validates the save, producing the row to write.
    ///
    /// `existing` is the stored status when editing, `None` when creating.
    pub fn prepare(
        &self,
        actor: &Actor,
        existing: Option<BillStatus>,
        policy: TransitionPolicy,
    ) -> Result<BillRow, WorkflowError> {
        let change = WorkflowService::authorize_bill_save(actor, existing, self.status, policy)?;
        let counterparty_id = self.validate()?;

        Ok(BillRow {
            project_id: self.project_id,
            counterparty_id,
            bill_number: self.bill_number.trim().to_string(),
            date: self.date,
            amount: self.amount_value(),
            discount: self.discount_value(),
            category: self.category.clone().unwrap_or_default(),
            subcategory: non_blank(self.subcategory.as_deref().unwrap_or_default()),
            gst: self.gst,
            description: non_blank(&self.description),
            status: change.to,
            stamp: WriteStamp::new(actor, change.changed_at, existing.is_none()),
        })
    }
}

/// Payment form input.
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    /// Ledger side.
    pub side: Side,
    /// Owning project.
    pub project_id: ProjectId,
    /// Selected vendor or customer.
    pub counterparty_id: Option<CounterpartyId>,
    /// Payment date.
    pub date: NaiveDate,
    /// Amount as typed.
    pub amount: String,
    /// Selected payment method.
    pub payment_method_id: Option<PaymentMethodId>,
    /// Notes as typed.
    pub description: String,
}

/// Payment row ready to insert or update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRow {
    /// Owning project.
    pub project_id: ProjectId,
    /// Vendor or customer; the store maps this to the side's column.
    pub counterparty_id: CounterpartyId,
    /// Payment date.
    pub date: NaiveDate,
    /// Amount.
    pub amount: Decimal,
    /// Payment method.
    pub payment_method_id: PaymentMethodId,
    /// Notes, `None` when blank.
    pub description: Option<String>,
    /// Audit columns.
    #[serde(flatten)]
    pub stamp: WriteStamp,
}

impl PaymentDraft {
    /// Checks required fields, first failure wins.
    pub fn validate(&self) -> Result<(CounterpartyId, PaymentMethodId), WorkflowError> {
        let Some(counterparty_id) = self.counterparty_id else {
            return Err(WorkflowError::Validation(format!(
                "Please select a {}",
                self.side.counterparty_noun()
            )));
        };
        if parse_or_zero(&self.amount) <= Decimal::ZERO {
            return Err(WorkflowError::Validation(
                "Amount must be greater than 0".to_string(),
            ));
        }
        let Some(method_id) = self.payment_method_id else {
            return Err(WorkflowError::Validation(
                "Please select a payment method".to_string(),
            ));
        };
        Ok((counterparty_id, method_id))
    }

    /// Authorizes and validates the save, producing the row to write.
    pub fn prepare(&self, actor: &Actor, is_new: bool) -> Result<PaymentRow, WorkflowError> {
        WorkflowService::authorize_payment_write(actor)?;
        let (counterparty_id, payment_method_id) = self.validate()?;

        Ok(PaymentRow {
            project_id: self.project_id,
            counterparty_id,
            date: self.date,
            amount: parse_or_zero(&self.amount),
            payment_method_id,
            description: non_blank(&self.description),
            stamp: WriteStamp::new(actor, chrono::Utc::now(), is_new),
        })
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
