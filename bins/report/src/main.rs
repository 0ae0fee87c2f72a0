//! Sitebook ledger reports.
//!
//! Prints outstanding and statement reports from the configured backend.
//!
//! Usage:
//!   sitebook-report [overview]
//!   sitebook-report balances
//!   sitebook-report pending [purchase|sales] [desc|asc]
//!   sitebook-report vendors <project-id>
//!   sitebook-report customers <project-id>
//!   sitebook-report project <project-id>

use anyhow::{Context, anyhow, bail};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitebook_core::ledger::{
    ActivityItem, FeedItem, FeedOptions, LedgerSummary, ProjectOutstanding, SortOrder,
};
use sitebook_core::records::Side;
use sitebook_core::workflow::TransitionPolicy;
use sitebook_shared::{AppConfig, AppError, AppResult};
use sitebook_shared::types::{ProjectId, format_date, format_inr};
use sitebook_store::{LedgerStore, RestRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let policy = TransitionPolicy::parse(&config.workflow.transition_policy).ok_or_else(|| {
        anyhow!(
            "unknown transition policy: {}",
            config.workflow.transition_policy
        )
    })?;
    let repo = RestRepository::new(&config.backend)?;
    let store = LedgerStore::new(repo, policy);
    info!(backend = %config.backend.url, ?policy, "connected");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map_or("overview", String::as_str);

    let outcome = match command {
        "overview" => overview(&store).await,
        "balances" => balances(&store).await,
        "pending" => {
            let side = match args.get(1).map(String::as_str) {
                None | Some("purchase") => Side::Purchase,
                Some("sales") => Side::Sales,
                Some(other) => bail!("unknown side: {other}"),
            };
            let order = match args.get(2) {
                None => SortOrder::default(),
                Some(raw) => {
                    SortOrder::parse(raw).ok_or_else(|| anyhow!("unknown order: {raw}"))?
                }
            };
            pending(&store, side, order).await
        }
        "vendors" => counterparties(&store, Side::Purchase, project_arg(&args)?).await,
        "customers" => counterparties(&store, Side::Sales, project_arg(&args)?).await,
        "project" => project(&store, project_arg(&args)?).await,
        other => bail!("unknown command: {other}"),
    };

    if let Err(err) = &outcome {
        error!(code = err.error_code(), status = err.status_code(), "report failed");
        if let Some(hint) = retry_hint(err) {
            eprintln!("{hint}");
        }
    }
    Ok(outcome?)
}

fn retry_hint(err: &AppError) -> Option<&'static str> {
    err.is_retryable()
        .then_some("The backend did not answer cleanly. Run the report again to retry.")
}

fn counterparty_heading(side: Side) -> &'static str {
    match side {
        Side::Purchase => "Vendor",
        Side::Sales => "Customer",
    }
}

fn project_arg(args: &[String]) -> anyhow::Result<ProjectId> {
    let raw = args.get(1).context("missing project id")?;
    raw.parse().map_err(|_| anyhow!("invalid project id: {raw}"))
}

async fn overview(store: &LedgerStore<RestRepository>) -> AppResult<()> {
    let rows = store.project_overview().await?;
    println!("{:<32} {:>14} {:>14} {:>14}", "Project", "Purchase", "Sales", "Combined");
    for row in &rows {
        println!(
            "{:<32} {:>14} {:>14} {:>14}",
            row.project.name,
            format_inr(row.outstanding.purchase),
            format_inr(row.outstanding.sales),
            format_inr(row.outstanding.combined),
        );
    }
    let total: ProjectOutstanding = rows.iter().map(|r| r.outstanding).sum();
    println!(
        "{:<32} {:>14} {:>14} {:>14}",
        "Total",
        format_inr(total.purchase),
        format_inr(total.sales),
        format_inr(total.combined),
    );
    Ok(())
}

async fn balances(store: &LedgerStore<RestRepository>) -> AppResult<()> {
    println!("{:<32} {:>14} {:>14} {:>14}", "Project", "Expenses", "Received", "Balance");
    for row in store.project_balances().await? {
        println!(
            "{:<32} {:>14} {:>14} {:>14}",
            row.project.name,
            format_inr(row.position.expenses),
            format_inr(row.position.received),
            format_inr(row.position.balance),
        );
    }
    Ok(())
}

async fn pending(
    store: &LedgerStore<RestRepository>,
    side: Side,
    order: SortOrder,
) -> AppResult<()> {
    let pending = store.pending_bills(side, None, None, order).await?;
    println!("{} bills awaiting approval, {} first", pending.side, order.label());
    for bill in &pending.bills {
        println!(
            "{}  {:<16} {:>14}",
            format_date(bill.date),
            bill.bill_number.as_deref().unwrap_or("-"),
            format_inr(bill.net_amount()),
        );
    }
    println!("Total {}", format_inr(pending.total));
    Ok(())
}

async fn counterparties(
    store: &LedgerStore<RestRepository>,
    side: Side,
    project_id: ProjectId,
) -> AppResult<()> {
    let ranked = store.ranked_counterparties(side, project_id).await?;
    println!(
        "{:<32} {:>14} {:>14} {:>14}",
        counterparty_heading(side),
        "Paid",
        "Outstanding",
        "Pending"
    );
    for row in &ranked {
        println!(
            "{:<32} {:>14} {:>14} {:>14}",
            row.counterparty.name,
            format_inr(row.summary.paid),
            format_inr(row.summary.outstanding),
            format_inr(row.summary.pending_approval),
        );
    }
    let total: LedgerSummary = ranked.iter().map(|r| r.summary).sum();
    println!(
        "{:<32} {:>14} {:>14} {:>14}",
        "Total",
        format_inr(total.paid),
        format_inr(total.outstanding),
        format_inr(total.pending_approval),
    );
    Ok(())
}

async fn project(store: &LedgerStore<RestRepository>, project_id: ProjectId) -> AppResult<()> {
    let (ledger, detail) = tokio::try_join!(
        store.project_statement(project_id),
        store.project_detail(project_id),
    )?;

    println!("{}", ledger.project.name);
    let outstanding = ledger.outstanding();
    println!(
        "Outstanding: purchase {}  sales {}  combined {}",
        format_inr(outstanding.purchase),
        format_inr(outstanding.sales),
        format_inr(outstanding.combined),
    );

    for section in ledger.sections(FeedOptions::default()) {
        println!();
        println!("{}", section.label());
        for item in &section.items {
            let what = match item {
                FeedItem::Bill(bill) => format!("Bill {}", bill.bill_number.as_deref().unwrap_or("-")),
                FeedItem::Payment { method_name, .. } => format!("Payment ({method_name})"),
            };
            println!("{}  {:<28} {:>14}", format_date(item.date()), what, format_inr(item.amount()));
        }
    }

    println!();
    println!(
        "Expenses {}  Received {}  Balance {}",
        format_inr(detail.position.expenses),
        format_inr(detail.position.received),
        format_inr(detail.position.balance),
    );
    for item in detail.activity(SortOrder::Desc) {
        let label = match item {
            ActivityItem::Expense(_) => "Expense",
            ActivityItem::Received(_) => "Received",
        };
        println!("{}  {:<10} {:>14}", format_date(item.date()), label, format_inr(item.signed_amount()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitebook_store::StoreError;

    #[test]
    fn test_backend_failure_gets_retry_hint() {
        let err: AppError = StoreError::from_status(503, "upstream timeout".into()).into();
        assert!(retry_hint(&err).is_some());
        assert_eq!(err.error_code(), "BACKEND_UNAVAILABLE");
    }

    #[test]
    fn test_permission_failure_has_no_retry_hint() {
        let err: AppError = StoreError::from_status(403, "admin only".into()).into();
        assert_eq!(retry_hint(&err), None);
    }

    #[test]
    fn test_counterparty_heading() {
        assert_eq!(counterparty_heading(Side::Purchase), "Vendor");
        assert_eq!(counterparty_heading(Side::Sales), "Customer");
    }
}
