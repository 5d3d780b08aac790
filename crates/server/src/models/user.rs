//! User entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freedns_core::{Email, Plan, UserId};

use crate::services::quota::DEFAULT_SUBDOMAIN_LIMIT;

/// A registered user.
///
/// Created on first successful Google OAuth login. The admin flag is derived
/// from the configured admin email at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique across users).
    pub email: Email,
    /// Display name from the OAuth profile.
    pub name: String,
    /// Avatar URL from the OAuth profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Subscription plan.
    pub plan: Plan,
    /// Base subdomain quota before purchased slots.
    pub subdomain_limit: u32,
    /// Whether this user has admin access.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh user record from an OAuth profile.
    #[must_use]
    pub fn new(email: Email, name: String, image: Option<String>, is_admin: bool) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            email,
            name,
            image,
            plan: Plan::Free,
            subdomain_limit: DEFAULT_SUBDOMAIN_LIMIT,
            is_admin,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            Email::parse("user@example.com").unwrap(),
            "Test User".to_string(),
            None,
            false,
        );
        assert_eq!(user.plan, Plan::Free);
        assert_eq!(user.subdomain_limit, DEFAULT_SUBDOMAIN_LIMIT);
        assert!(!user.is_admin);
    }

    #[test]
    fn test_camel_case_serialization() {
        let user = User::new(
            Email::parse("user@example.com").unwrap(),
            "Test User".to_string(),
            None,
            true,
        );
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("subdomainLimit").is_some());
        assert!(json.get("isAdmin").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
