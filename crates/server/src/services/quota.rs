//! Subdomain quota arithmetic.
//!
//! A user's effective limit is the larger of their base limit (on the user
//! record, adjustable by admins) and their purchased-slot ledger entry.
//! Both default to [`DEFAULT_SUBDOMAIN_LIMIT`], so a fresh account can
//! create two subdomains before buying more.

use crate::models::User;
use crate::store::{JsonStore, StoreError};

/// Subdomains every account gets for free.
pub const DEFAULT_SUBDOMAIN_LIMIT: u32 = 2;

/// A user's quota position: how many subdomains they hold against how many
/// they may hold.
#[derive(Debug, Clone, Copy)]
pub struct QuotaUsage {
    /// Subdomains currently owned.
    pub used: u32,
    /// Effective limit.
    pub limit: u32,
}

impl QuotaUsage {
    /// Slots still available.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }

    /// Whether another subdomain may be created.
    #[must_use]
    pub const fn has_capacity(&self) -> bool {
        self.used < self.limit
    }
}

/// The larger of the base limit and the purchased-slot ledger entry.
#[must_use]
pub const fn effective_limit(base_limit: u32, ledger_limit: u32) -> u32 {
    if base_limit > ledger_limit {
        base_limit
    } else {
        ledger_limit
    }
}

/// Compute a user's quota position from the store.
///
/// # Errors
///
/// Returns `StoreError` if a data file cannot be read.
pub async fn usage_for(store: &JsonStore, user: &User) -> Result<QuotaUsage, StoreError> {
    let used = store.subdomains().count_by_user(user.id).await?;
    let ledger_limit = store.transactions().limit_for(&user.email).await?;
    Ok(QuotaUsage {
        used: u32::try_from(used).unwrap_or(u32::MAX),
        limit: effective_limit(user.subdomain_limit, ledger_limit),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use freedns_core::Email;

    #[test]
    fn test_effective_limit_takes_max() {
        assert_eq!(effective_limit(2, 5), 5);
        assert_eq!(effective_limit(7, 5), 7);
        assert_eq!(effective_limit(2, 2), 2);
    }

    #[test]
    fn test_quota_capacity() {
        let full = QuotaUsage { used: 2, limit: 2 };
        assert!(!full.has_capacity());
        assert_eq!(full.remaining(), 0);

        let open = QuotaUsage { used: 1, limit: 3 };
        assert!(open.has_capacity());
        assert_eq!(open.remaining(), 2);
    }

    #[tokio::test]
    async fn test_usage_reflects_paid_slots() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let user = store
            .users()
            .create(User::new(
                Email::parse("buyer@example.com").unwrap(),
                "Buyer".to_string(),
                None,
                false,
            ))
            .await
            .unwrap();

        let before = usage_for(&store, &user).await.unwrap();
        assert_eq!(before.limit, DEFAULT_SUBDOMAIN_LIMIT);

        store
            .transactions()
            .set_limit(&user.email, 6)
            .await
            .unwrap();
        let after = usage_for(&store, &user).await.unwrap();
        assert_eq!(after.limit, 6);
    }
}
