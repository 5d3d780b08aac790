//! Transaction and purchased-slot-ledger operations.

use chrono::Utc;
use freedns_core::{Email, TransactionId, TransactionStatus, UserId};
use serde::Serialize;

use super::{JsonStore, StoreError};
use crate::models::Transaction;
use crate::services::quota::DEFAULT_SUBDOMAIN_LIMIT;

/// Aggregate transaction figures for the admin dashboard.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    /// Total number of transactions ever created.
    pub total: usize,
    /// Number of paid transactions.
    pub paid: usize,
    /// Number of failed transactions.
    pub failed: usize,
    /// Sum of paid amounts, in rupees.
    pub revenue: u64,
}

/// Transaction and slot-ledger operations.
pub struct TransactionStore<'a> {
    store: &'a JsonStore,
}

impl<'a> TransactionStore<'a> {
    pub(super) const fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// Insert a new transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the ledger file cannot be read or written.
    pub async fn create(&self, transaction: Transaction) -> Result<Transaction, StoreError> {
        self.store
            .with_ledger(move |ledger| {
                ledger.transactions.push(transaction.clone());
                Ok(transaction)
            })
            .await
    }

    /// Find a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the ledger file cannot be read.
    pub async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        let ledger = self.store.read_ledger().await?;
        Ok(ledger.transactions.into_iter().find(|t| t.id == id))
    }

    /// Find a transaction by its Razorpay order ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the ledger file cannot be read.
    pub async fn find_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let ledger = self.store.read_ledger().await?;
        Ok(ledger.transactions.into_iter().find(|t| t.order_id == order_id))
    }

    /// All transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the ledger file cannot be read.
    pub async fn find_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let ledger = self.store.read_ledger().await?;
        let mut transactions = ledger.transactions;
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transactions)
    }

    /// Transactions belonging to a user, matched by ID or email, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the ledger file cannot be read.
    pub async fn find_for_user(
        &self,
        user_id: UserId,
        email: &Email,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut transactions: Vec<_> = self
            .store
            .read_ledger()
            .await?
            .transactions
            .into_iter()
            .filter(|t| t.user_id == user_id || t.user_email == *email)
            .collect();
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transactions)
    }

    /// Move a transaction to a new status, keyed by order ID.
    ///
    /// A transition to `paid` records the payment ID, stamps `paid_at` and
    /// credits the purchased slots to the owner's ledger entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no transaction has that order ID.
    pub async fn update_status(
        &self,
        order_id: &str,
        status: TransactionStatus,
        payment_id: Option<String>,
    ) -> Result<Transaction, StoreError> {
        let order_id = order_id.to_string();
        self.store
            .with_ledger(move |ledger| {
                let tx = ledger
                    .transactions
                    .iter_mut()
                    .find(|t| t.order_id == order_id)
                    .ok_or(StoreError::NotFound)?;

                tx.status = status;
                if status == TransactionStatus::Paid {
                    tx.payment_id = payment_id;
                    tx.paid_at = Some(Utc::now());
                }
                let updated = tx.clone();

                if status == TransactionStatus::Paid {
                    let key = updated.user_email.as_str().to_string();
                    let current = ledger
                        .user_subdomain_limits
                        .get(&key)
                        .copied()
                        .unwrap_or(DEFAULT_SUBDOMAIN_LIMIT);
                    ledger
                        .user_subdomain_limits
                        .insert(key, current + updated.subdomain_slots);
                }

                Ok(updated)
            })
            .await
    }

    /// Purchased-slot limit for an email, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the ledger file cannot be read.
    pub async fn limit_for(&self, email: &Email) -> Result<u32, StoreError> {
        let ledger = self.store.read_ledger().await?;
        Ok(ledger
            .user_subdomain_limits
            .get(email.as_str())
            .copied()
            .unwrap_or(DEFAULT_SUBDOMAIN_LIMIT))
    }

    /// Overwrite a user's slot limit (admin override).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the ledger file cannot be read or written.
    pub async fn set_limit(&self, email: &Email, limit: u32) -> Result<(), StoreError> {
        let key = email.as_str().to_string();
        self.store
            .with_ledger(move |ledger| {
                ledger.user_subdomain_limits.insert(key, limit);
                Ok(())
            })
            .await
    }

    /// Remove a user's ledger entry so they fall back to the default limit.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the ledger file cannot be read or written.
    pub async fn reset_limit(&self, email: &Email) -> Result<(), StoreError> {
        let key = email.as_str().to_string();
        self.store
            .with_ledger(move |ledger| {
                ledger.user_subdomain_limits.remove(&key);
                Ok(())
            })
            .await
    }

    /// Aggregate figures over all transactions.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the ledger file cannot be read.
    pub async fn stats(&self) -> Result<TransactionStats, StoreError> {
        let ledger = self.store.read_ledger().await?;
        let mut stats = TransactionStats {
            total: ledger.transactions.len(),
            paid: 0,
            failed: 0,
            revenue: 0,
        };
        for tx in &ledger.transactions {
            match tx.status {
                TransactionStatus::Paid => {
                    stats.paid += 1;
                    stats.revenue += tx.amount;
                }
                TransactionStatus::Failed => stats.failed += 1,
                TransactionStatus::Created => {}
            }
        }
        Ok(stats)
    }
}
