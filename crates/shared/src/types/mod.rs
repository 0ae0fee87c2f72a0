//! Common types used across the application.

pub mod date;
pub mod id;
pub mod money;

pub use date::format_date;
pub use id::*;
pub use money::{format_inr, parse_or_zero};
