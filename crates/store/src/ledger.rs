//! Ledger queries and gated writes over a [`Repository`].
//!
//! Each read fetches the rows it needs concurrently, decodes them into
//! records and hands them to the pure computations in `sitebook_core`.
//! Writes run the workflow checks before anything reaches the backend.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sitebook_core::ledger::{
    ActivityItem, FeedBuilder, FeedItem, FeedOptions, FeedSection, LedgerAggregator,
    LedgerSummary, ProjectOutstanding, ProjectPosition, Ranking, SortOrder,
};
use sitebook_core::records::{
    Bill, Counterparty, MethodNames, Payment, PaymentMethod, Project, ProjectStatus,
    PurchaseCategory, Side, User,
};
use sitebook_core::workflow::{
    Actor, BillDraft, BillStatus, PaymentDraft, TransitionPolicy, WorkflowService,
};
use sitebook_shared::types::{BillId, CounterpartyId, PaymentId, ProjectId};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::query::{Query, Table, counterparty_column};
use crate::repository::{Repository, decode_rows, encode_row};

/// One vendor's or customer's statement within a project.
#[derive(Debug, Clone)]
pub struct CounterpartyStatement {
    /// Ledger side.
    pub side: Side,
    /// The vendor or customer.
    pub counterparty: Counterparty,
    /// All of its bills in the project, any status.
    pub bills: Vec<Bill>,
    /// All of its payments in the project.
    pub payments: Vec<Payment>,
    /// Payment method names.
    pub methods: MethodNames,
    /// Totals over the bills and payments above.
    pub summary: LedgerSummary,
}

impl CounterpartyStatement {
    /// Statement rows.
    #[must_use]
    pub fn feed(&self, options: FeedOptions) -> Vec<FeedItem<'_>> {
        FeedBuilder::build(&self.bills, &self.payments, &self.methods, options)
    }
}

/// A vendor or customer with its totals in one project.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterpartyBalance {
    /// The vendor or customer.
    pub counterparty: Counterparty,
    /// Its totals.
    pub summary: LedgerSummary,
}

/// A project with its purchase and sales outstanding.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOverview {
    /// The project.
    pub project: Project,
    /// Its outstanding figures.
    pub outstanding: ProjectOutstanding,
}

/// A project with its cash position.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectBalance {
    /// The project.
    pub project: Project,
    /// Expenses, receipts and balance.
    pub position: ProjectPosition,
}

/// Everything recorded against one project on both sides.
#[derive(Debug, Clone)]
pub struct ProjectLedger {
    /// The project.
    pub project: Project,
    /// Vendor bills.
    pub purchase_bills: Vec<Bill>,
    /// Payments to vendors.
    pub purchase_payments: Vec<Payment>,
    /// Customer bills.
    pub sales_bills: Vec<Bill>,
    /// Payments from customers.
    pub sales_payments: Vec<Payment>,
    /// Payment method names.
    pub methods: MethodNames,
}

impl ProjectLedger {
    /// Purchase and Sales statement sections.
    #[must_use]
    pub fn sections(&self, options: FeedOptions) -> [FeedSection<'_>; 2] {
        FeedBuilder::project_statement(
            &self.purchase_bills,
            &self.purchase_payments,
            &self.sales_bills,
            &self.sales_payments,
            &self.methods,
            options,
        )
    }

    /// Totals of one side.
    #[must_use]
    pub fn summary(&self, side: Side) -> LedgerSummary {
        match side {
            Side::Purchase => {
                LedgerAggregator::summarize(&self.purchase_bills, &self.purchase_payments)
            }
            Side::Sales => LedgerAggregator::summarize(&self.sales_bills, &self.sales_payments),
        }
    }

    /// Purchase and sales outstanding.
    #[must_use]
    pub fn outstanding(&self) -> ProjectOutstanding {
        ProjectOutstanding::new(
            self.summary(Side::Purchase).outstanding,
            self.summary(Side::Sales).outstanding,
        )
    }
}

/// A project's cash detail: all purchase bills against sales receipts.
#[derive(Debug, Clone)]
pub struct ProjectDetail {
    /// The project.
    pub project: Project,
    /// Expenses, receipts and balance.
    pub position: ProjectPosition,
    /// Vendor bills, any status.
    pub purchase_bills: Vec<Bill>,
    /// Payments from customers.
    pub sales_payments: Vec<Payment>,
}

impl ProjectDetail {
    /// Expense and receipt rows.
    #[must_use]
    pub fn activity(&self, order: SortOrder) -> Vec<ActivityItem<'_>> {
        FeedBuilder::project_activity(&self.purchase_bills, &self.sales_payments, order)
    }
}

/// Bills awaiting approval.
#[derive(Debug, Clone)]
pub struct PendingBills {
    /// Ledger side.
    pub side: Side,
    /// Submitted bills in the requested date order.
    pub bills: Vec<Bill>,
    /// Their net total.
    pub total: Decimal,
}

/// Ledger reads and workflow-gated writes.
#[derive(Debug)]
pub struct LedgerStore<R> {
    repo: R,
    policy: TransitionPolicy,
}

impl<R: Repository> LedgerStore<R> {
    /// Wraps a repository; `policy` governs admin status changes.
    pub const fn new(repo: R, policy: TransitionPolicy) -> Self {
        Self { repo, policy }
    }

    /// The underlying repository.
    pub const fn repository(&self) -> &R {
        &self.repo
    }

    async fn fetch<T: DeserializeOwned>(&self, query: Query) -> Result<Vec<T>, StoreError> {
        let rows = self.repo.select(&query).await?;
        debug!(table = %query.table, rows = rows.len(), "fetched");
        decode_rows(rows)
    }

    async fn fetch_one<T: DeserializeOwned>(&self, query: Query) -> Result<T, StoreError> {
        let table = query.table;
        self.fetch::<T>(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("{table} row")))
    }

    async fn project(&self, project_id: ProjectId) -> Result<Project, StoreError> {
        self.fetch_one(Query::table(Table::Projects).eq("id", project_id))
            .await
    }

    /// Projects still running; the list screens show only these.
    pub async fn active_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.fetch(Query::table(Table::Projects).eq("status", ProjectStatus::Active.as_str()))
            .await
    }

    /// Every vendor or customer.
    pub async fn counterparties(&self, side: Side) -> Result<Vec<Counterparty>, StoreError> {
        self.fetch(Query::table(Table::counterparties(side))).await
    }

    /// Every payment method.
    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethod>, StoreError> {
        self.fetch(Query::table(Table::PaymentMethods)).await
    }

    /// Every purchase category.
    pub async fn categories(&self) -> Result<Vec<PurchaseCategory>, StoreError> {
        self.fetch(Query::table(Table::PurchaseCategories)).await
    }

    /// Statement of one vendor or customer within a project.
    pub async fn counterparty_statement(
        &self,
        side: Side,
        project_id: ProjectId,
        counterparty_id: CounterpartyId,
    ) -> Result<CounterpartyStatement, StoreError> {
        let column = counterparty_column(side);
        let (counterparty, bills, payments, methods) = tokio::try_join!(
            self.fetch_one::<Counterparty>(
                Query::table(Table::counterparties(side)).eq("id", counterparty_id)
            ),
            self.fetch::<Bill>(
                Query::table(Table::bills(side))
                    .eq("project_id", project_id)
                    .eq(column, counterparty_id)
            ),
            self.fetch::<Payment>(
                Query::table(Table::payments(side))
                    .eq("project_id", project_id)
                    .eq(column, counterparty_id)
            ),
            self.payment_methods(),
        )?;

        let summary = LedgerAggregator::summarize(&bills, &payments);
        Ok(CounterpartyStatement {
            side,
            counterparty,
            bills,
            payments,
            methods: PaymentMethod::names(&methods),
            summary,
        })
    }

    /// Vendors or customers with bills or payments in a project, highest
    /// outstanding first.
    pub async fn ranked_counterparties(
        &self,
        side: Side,
        project_id: ProjectId,
    ) -> Result<Vec<CounterpartyBalance>, StoreError> {
        let (bills, payments) = tokio::try_join!(
            self.fetch::<Bill>(Query::table(Table::bills(side)).eq("project_id", project_id)),
            self.fetch::<Payment>(Query::table(Table::payments(side)).eq("project_id", project_id)),
        )?;

        let mut ids: Vec<CounterpartyId> = bills
            .iter()
            .map(|b| b.counterparty_id)
            .chain(payments.iter().map(|p| p.counterparty_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let counterparties: Vec<Counterparty> = self
            .fetch(Query::table(Table::counterparties(side)).any_of("id", ids))
            .await?;

        let summaries = LedgerAggregator::summaries_by_counterparty(&bills, &payments);
        Ok(Ranking::counterparties_by_outstanding(&counterparties, &summaries)
            .into_iter()
            .map(|r| CounterpartyBalance {
                counterparty: r.entity.clone(),
                summary: r.summary,
            })
            .collect())
    }

    /// Active projects with their outstanding, highest combined outstanding first.
    pub async fn project_overview(&self) -> Result<Vec<ProjectOverview>, StoreError> {
        let (projects, purchase_bills, purchase_payments, sales_bills, sales_payments) =
            tokio::try_join!(
                self.active_projects(),
                self.fetch::<Bill>(Query::table(Table::PurchaseBills)),
                self.fetch::<Payment>(Query::table(Table::PurchasePayments)),
                self.fetch::<Bill>(Query::table(Table::SalesBills)),
                self.fetch::<Payment>(Query::table(Table::SalesPayments)),
            )?;

        let outstanding: HashMap<ProjectId, ProjectOutstanding> = projects
            .iter()
            .map(|p| {
                (
                    p.id,
                    LedgerAggregator::project_outstanding(
                        &purchase_bills,
                        &purchase_payments,
                        &sales_bills,
                        &sales_payments,
                        p.id,
                    ),
                )
            })
            .collect();

        Ok(Ranking::projects_by_combined(&projects, &outstanding)
            .into_iter()
            .map(|r| ProjectOverview {
                project: r.entity.clone(),
                outstanding: r.summary,
            })
            .collect())
    }

    /// Active projects with their cash position, lowest balance first.
    pub async fn project_balances(&self) -> Result<Vec<ProjectBalance>, StoreError> {
        let (projects, purchase_bills, sales_payments) = tokio::try_join!(
            self.active_projects(),
            self.fetch::<Bill>(Query::table(Table::PurchaseBills)),
            self.fetch::<Payment>(Query::table(Table::SalesPayments)),
        )?;

        let positions: HashMap<ProjectId, ProjectPosition> = projects
            .iter()
            .map(|p| {
                let bills: Vec<Bill> = purchase_bills
                    .iter()
                    .filter(|b| b.project_id == p.id)
                    .cloned()
                    .collect();
                let payments: Vec<Payment> = sales_payments
                    .iter()
                    .filter(|pay| pay.project_id == p.id)
                    .cloned()
                    .collect();
                (p.id, LedgerAggregator::project_position(&bills, &payments))
            })
            .collect();

        Ok(Ranking::projects_by_balance(&projects, &positions)
            .into_iter()
            .map(|r| ProjectBalance {
                project: r.entity.clone(),
                position: r.summary,
            })
            .collect())
    }

    /// Both ledgers of one project.
    pub async fn project_statement(
        &self,
        project_id: ProjectId,
    ) -> Result<ProjectLedger, StoreError> {
        let scoped = |table: Table| Query::table(table).eq("project_id", project_id);
        let (project, purchase_bills, purchase_payments, sales_bills, sales_payments, methods) =
            tokio::try_join!(
                self.project(project_id),
                self.fetch::<Bill>(scoped(Table::PurchaseBills)),
                self.fetch::<Payment>(scoped(Table::PurchasePayments)),
                self.fetch::<Bill>(scoped(Table::SalesBills)),
                self.fetch::<Payment>(scoped(Table::SalesPayments)),
                self.payment_methods(),
            )?;

        Ok(ProjectLedger {
            project,
            purchase_bills,
            purchase_payments,
            sales_bills,
            sales_payments,
            methods: PaymentMethod::names(&methods),
        })
    }

    /// Expenses against receipts for one project.
    pub async fn project_detail(&self, project_id: ProjectId) -> Result<ProjectDetail, StoreError> {
        let (project, purchase_bills, sales_payments) = tokio::try_join!(
            self.project(project_id),
            self.fetch::<Bill>(Query::table(Table::PurchaseBills).eq("project_id", project_id)),
            self.fetch::<Payment>(Query::table(Table::SalesPayments).eq("project_id", project_id)),
        )?;

        let position = LedgerAggregator::project_position(&purchase_bills, &sales_payments);
        Ok(ProjectDetail {
            project,
            position,
            purchase_bills,
            sales_payments,
        })
    }

    /// Submitted bills, optionally limited to one project and one vendor or
    /// customer, in date `order`.
    pub async fn pending_bills(
        &self,
        side: Side,
        project_id: Option<ProjectId>,
        counterparty_id: Option<CounterpartyId>,
        order: SortOrder,
    ) -> Result<PendingBills, StoreError> {
        let mut query =
            Query::table(Table::bills(side)).eq("status", BillStatus::Submitted.as_str());
        if let Some(project_id) = project_id {
            query = query.eq("project_id", project_id);
        }
        if let Some(counterparty_id) = counterparty_id {
            query = query.eq(counterparty_column(side), counterparty_id);
        }
        let bills: Vec<Bill> = self.fetch(query).await?;

        let total = LedgerAggregator::pending_total(&bills);
        let bills = FeedBuilder::pending_bills(&bills, order)
            .into_iter()
            .cloned()
            .collect();
        Ok(PendingBills { side, bills, total })
    }

    /// Session actor for an identity-provider user.
    pub async fn actor_for(&self, auth_id: Uuid) -> Result<Actor, StoreError> {
        let users: Vec<User> = self
            .fetch(Query::table(Table::Users).eq("auth_id", auth_id))
            .await?;
        users
            .first()
            .map(User::actor)
            .ok_or_else(|| StoreError::NotFound(format!("no profile for auth user {auth_id}")))
    }

    /// Creates (`bill_id = None`) or updates a bill after the workflow checks.
    pub async fn save_bill(
        &self,
        actor: &Actor,
        bill_id: Option<BillId>,
        draft: &BillDraft,
    ) -> Result<Bill, StoreError> {
        let table = Table::bills(draft.side);
        let existing = match bill_id {
            Some(id) => Some(
                self.fetch_one::<Bill>(Query::table(table).eq("id", id))
                    .await?
                    .status,
            ),
            None => None,
        };

        let row = draft.prepare(actor, existing, self.policy)?;
        let mut value = encode_row(&row)?;
        rename_counterparty(&mut value, draft.side);

        let stored = match bill_id {
            Some(id) => self.repo.update(table, &id.to_string(), value).await?,
            None => self.repo.insert(table, value).await?,
        };
        let bill: Bill = serde_json::from_value(stored)?;
        info!(
            %table,
            bill_id = %bill.id,
            from = ?existing,
            to = %bill.status,
            actor = %actor.id,
            "bill saved"
        );
        Ok(bill)
    }

    /// Deletes a bill. Admin-only.
    pub async fn delete_bill(
        &self,
        actor: &Actor,
        side: Side,
        bill_id: BillId,
    ) -> Result<(), StoreError> {
        WorkflowService::authorize_bill_delete(actor)?;
        let table = Table::bills(side);
        self.repo.delete(table, &bill_id.to_string()).await?;
        info!(%table, %bill_id, actor = %actor.id, "bill deleted");
        Ok(())
    }

    /// Creates (`payment_id = None`) or updates a payment. Admin-only.
    pub async fn save_payment(
        &self,
        actor: &Actor,
        payment_id: Option<PaymentId>,
        draft: &PaymentDraft,
    ) -> Result<Payment, StoreError> {
        let table = Table::payments(draft.side);
        let row = draft.prepare(actor, payment_id.is_none())?;
        let mut value = encode_row(&row)?;
        rename_counterparty(&mut value, draft.side);

        let stored = match payment_id {
            Some(id) => self.repo.update(table, &id.to_string(), value).await?,
            None => self.repo.insert(table, value).await?,
        };
        let payment: Payment = serde_json::from_value(stored)?;
        info!(
            %table,
            payment_id = %payment.id,
            amount = %payment.amount,
            actor = %actor.id,
            "payment saved"
        );
        Ok(payment)
    }

    /// Deletes a payment. Admin-only.
    pub async fn delete_payment(
        &self,
        actor: &Actor,
        side: Side,
        payment_id: PaymentId,
    ) -> Result<(), StoreError> {
        WorkflowService::authorize_payment_write(actor)?;
        let table = Table::payments(side);
        self.repo.delete(table, &payment_id.to_string()).await?;
        info!(%table, %payment_id, actor = %actor.id, "payment deleted");
        Ok(())
    }
}

fn rename_counterparty(row: &mut Value, side: Side) {
    if let Some(fields) = row.as_object_mut()
        && let Some(id) = fields.remove("counterparty_id")
    {
        fields.insert(counterparty_column(side).to_string(), id);
    }
}
