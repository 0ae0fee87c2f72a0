//! Data backend access for Sitebook.
//!
//! This crate provides:
//! - Table and filter definitions rendered as REST query pairs
//! - A row-level `Repository` abstraction with REST and in-memory backends
//! - `LedgerStore`, which fetches records concurrently and runs the ledger
//!   computations and workflow checks from `sitebook-core`

pub mod error;
pub mod ledger;
pub mod memory;
pub mod query;
pub mod repository;
pub mod rest;

pub use error::StoreError;
pub use ledger::{
    CounterpartyBalance, CounterpartyStatement, LedgerStore, PendingBills, ProjectBalance,
    ProjectDetail, ProjectLedger, ProjectOverview,
};
pub use memory::MemoryRepository;
pub use query::{Filter, Query, Table};
pub use repository::Repository;
pub use rest::RestRepository;
