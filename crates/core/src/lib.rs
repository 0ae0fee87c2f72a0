//! Core business logic for Sitebook.
//!
//! This crate contains pure business logic with no network or storage
//! dependencies. Records, aggregation, statements and the bill workflow
//! all live here and operate on data the caller has already fetched.
//!
//! # Modules
//!
//! - `records` - Bills, payments, projects and counterparties as stored
//! - `ledger` - Outstanding totals, statement feeds and rankings
//! - `workflow` - Bill status lifecycle, role checks and form validation

pub mod ledger;
pub mod records;
pub mod workflow;
