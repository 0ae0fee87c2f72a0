//! Ledger computations over fetched bills and payments.
//!
//! - Aggregation: paid, outstanding and pending-approval totals
//! - Statement feeds: merged, filtered, date-ordered bill and payment rows
//! - Ranking: entities ordered by their computed totals

pub mod feed;
pub mod ranking;
pub mod summary;

#[cfg(test)]
mod feed_props;
#[cfg(test)]
mod summary_props;

pub use feed::{
    ActivityItem, FeedBuilder, FeedFilter, FeedItem, FeedOptions, FeedSection, METHOD_PLACEHOLDER,
    SortOrder,
};
pub use ranking::{Ranked, Ranking};
pub use summary::{LedgerAggregator, LedgerSummary, ProjectOutstanding, ProjectPosition};
