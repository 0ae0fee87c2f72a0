//! Session actor and role checks.
//!
//! The actor is passed explicitly to every gated operation; there is no
//! ambient session state.

use serde::{Deserialize, Serialize};
use sitebook_shared::types::UserId;

use crate::workflow::error::WorkflowError;

/// User role.
///
/// Roles are ordered from lowest to highest privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Enters bills; cannot approve, delete or record payments.
    User = 0,
    /// Full access.
    Admin = 1,
}

impl UserRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Who is performing an action: used for permission checks and audit stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Profile ID written into audit stamps.
    pub id: UserId,
    /// Role used for gating.
    pub role: UserRole,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(id: UserId, role: UserRole) -> Self {
        Self { id, role }
    }

    /// Returns true for admin-class actors.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role >= UserRole::Admin
    }

    /// Fails with `InsufficientRole` unless the actor is an admin.
    pub fn require_admin(&self, action: &'static str) -> Result<(), WorkflowError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(WorkflowError::InsufficientRole {
                action,
                user_role: self.role.as_str().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("user"), Some(UserRole::User));
        assert_eq!(UserRole::parse("owner"), None);
    }

    #[test]
    fn test_role_ordering() {
        assert!(UserRole::Admin > UserRole::User);
    }

    #[test]
    fn test_require_admin() {
        let admin = Actor::new(UserId::new(), UserRole::Admin);
        let user = Actor::new(UserId::new(), UserRole::User);

        assert!(admin.require_admin("delete bill").is_ok());
        match user.require_admin("delete bill") {
            Err(WorkflowError::InsufficientRole { action, user_role }) => {
                assert_eq!(action, "delete bill");
                assert_eq!(user_role, "user");
            }
            other => panic!("expected InsufficientRole, got {other:?}"),
        }
    }
}
