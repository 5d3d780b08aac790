//! Payment transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freedns_core::{Email, TransactionId, TransactionStatus, UserId};

/// A slot-purchase transaction.
///
/// Created alongside the Razorpay order; transitions to `paid` or `failed`
/// when the payment callback is verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction ID.
    pub id: TransactionId,
    /// Owning user.
    pub user_id: UserId,
    /// Owner's email at purchase time (ledger key).
    pub user_email: Email,
    /// Owner's display name at purchase time.
    pub user_name: String,
    /// Razorpay order ID.
    pub order_id: String,
    /// Razorpay payment ID, set once the payment is verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    /// Amount in rupees.
    pub amount: u64,
    /// Currency code (INR).
    pub currency: String,
    /// Number of subdomain slots purchased.
    pub subdomain_slots: u32,
    /// Lifecycle status.
    pub status: TransactionStatus,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the payment was verified, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Build a fresh `created` transaction for a new order.
    #[must_use]
    pub fn new(
        user_id: UserId,
        user_email: Email,
        user_name: String,
        order_id: String,
        amount: u64,
        currency: String,
        subdomain_slots: u32,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            user_email,
            user_name,
            order_id,
            payment_id: None,
            amount,
            currency,
            subdomain_slots,
            status: TransactionStatus::Created,
            created_at: Utc::now(),
            paid_at: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction_is_created() {
        let tx = Transaction::new(
            UserId::generate(),
            Email::parse("user@example.com").unwrap(),
            "Test User".to_string(),
            "order_123".to_string(),
            16,
            "INR".to_string(),
            2,
        );
        assert_eq!(tx.status, TransactionStatus::Created);
        assert!(tx.payment_id.is_none());
        assert!(tx.paid_at.is_none());
    }
}
