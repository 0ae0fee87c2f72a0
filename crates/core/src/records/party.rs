//! Projects, counterparties, purchase categories and user profiles.

use serde::{Deserialize, Serialize};
use sitebook_shared::types::{CounterpartyId, ProjectId, PurchaseCategoryId, UserId};
use uuid::Uuid;

use crate::workflow::access::{Actor, UserRole};

/// Project lifecycle flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Project is running.
    #[default]
    Active,
    /// Project is closed or on hold.
    Inactive,
}

impl ProjectStatus {
    /// Column value of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// A project that owns bills and payments on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: ProjectId,
    /// Display name.
    #[serde(alias = "project_name")]
    pub name: String,
    /// Active or inactive.
    #[serde(default)]
    pub status: ProjectStatus,
    /// Grouping label.
    #[serde(default)]
    pub group: Option<String>,
    /// Billing company name.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Manual ordering hint.
    #[serde(default)]
    pub order_number: Option<i64>,
}

/// A vendor (purchase side) or customer (sales side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    /// Counterparty ID.
    pub id: CounterpartyId,
    /// Display name.
    #[serde(alias = "vendor_name", alias = "customer_name")]
    pub name: String,
}

/// A purchase category with its comma-joined subcategory list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseCategory {
    /// Category ID.
    pub id: PurchaseCategoryId,
    /// Category name.
    pub category: String,
    /// Comma-joined subcategory names.
    #[serde(default)]
    pub subcategories: String,
}

impl PurchaseCategory {
    /// Selectable subcategories: trimmed, non-empty, first occurrence wins.
    #[must_use]
    pub fn subcategory_options(&self) -> Vec<&str> {
        let mut options: Vec<&str> = Vec::new();
        for name in self.subcategories.split(',').map(str::trim) {
            if !name.is_empty() && !options.contains(&name) {
                options.push(name);
            }
        }
        options
    }
}

/// Application user profile, linked to the identity provider by `auth_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Profile ID, used in audit stamps.
    pub id: UserId,
    /// Identity-provider user ID.
    pub auth_id: Uuid,
    /// Display name.
    pub name: String,
    /// Login name.
    pub username: String,
    /// Role.
    pub role: UserRole,
}

impl User {
    /// The session context passed to workflow checks.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}
