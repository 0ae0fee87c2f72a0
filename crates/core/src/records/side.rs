//! Purchase vs. sales ledger side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which ledger a bill or payment belongs to.
///
/// Both sides share the same record shapes; the counterparty is a vendor on
/// the purchase side and a customer on the sales side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Vendor bills and payments made.
    Purchase,
    /// Customer bills and payments received.
    Sales,
}

impl Side {
    /// Section label used on combined project statements.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Purchase => "Purchase",
            Self::Sales => "Sales",
        }
    }

    /// Noun for the counterparty on this side.
    #[must_use]
    pub fn counterparty_noun(self) -> &'static str {
        match self {
            Self::Purchase => "vendor",
            Self::Sales => "customer",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
