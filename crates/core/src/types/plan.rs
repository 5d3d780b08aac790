//! User plans and transaction statuses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A user's subscription plan.
///
/// Every user starts on `Free`; the paid tiers exist for display purposes
/// and do not change quota arithmetic (slots are purchased individually).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    /// Free tier with the default subdomain quota.
    #[default]
    Free,
    /// Pro tier.
    Pro,
    /// Enterprise tier.
    Enterprise,
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("Free"),
            Self::Pro => f.write_str("Pro"),
            Self::Enterprise => f.write_str("Enterprise"),
        }
    }
}

/// Lifecycle status of a payment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Order created, payment not yet confirmed.
    Created,
    /// Payment verified; purchased slots have been credited.
    Paid,
    /// Payment verification failed.
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Paid => f.write_str("paid"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_serde_names() {
        assert_eq!(serde_json::to_string(&Plan::Free).unwrap(), "\"FREE\"");
        assert_eq!(
            serde_json::to_string(&Plan::Enterprise).unwrap(),
            "\"ENTERPRISE\""
        );
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Paid).unwrap(),
            "\"paid\""
        );
        let parsed: TransactionStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, TransactionStatus::Failed);
    }
}
