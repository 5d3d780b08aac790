//! DNS-record operations on the flat-file store.

use freedns_core::{RecordId, SubdomainId, UserId};

use super::{JsonStore, StoreError};
use crate::models::DnsRecord;

/// DNS-record operations.
pub struct RecordStore<'a> {
    store: &'a JsonStore,
}

impl<'a> RecordStore<'a> {
    pub(super) const fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// All records attached to a subdomain.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn find_by_subdomain(
        &self,
        subdomain_id: SubdomainId,
    ) -> Result<Vec<DnsRecord>, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db
            .dns_records
            .into_iter()
            .filter(|r| r.subdomain_id == subdomain_id)
            .collect())
    }

    /// How many records a user owns.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn count_by_user(&self, user_id: UserId) -> Result<usize, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.dns_records.iter().filter(|r| r.user_id == user_id).count())
    }

    /// Total number of records (admin stats).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn count_all(&self) -> Result<usize, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.dns_records.len())
    }

    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read or written.
    pub async fn create(&self, record: DnsRecord) -> Result<DnsRecord, StoreError> {
        self.store
            .with_db(move |db| {
                db.dns_records.push(record.clone());
                Ok(record)
            })
            .await
    }

    /// Delete a record.
    ///
    /// Returns `true` if a record was deleted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read or written.
    pub async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        self.store
            .with_db(move |db| {
                let before = db.dns_records.len();
                db.dns_records.retain(|r| r.id != id);
                Ok(db.dns_records.len() != before)
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use freedns_core::RecordType;

    fn record(subdomain_id: SubdomainId, user_id: UserId) -> DnsRecord {
        DnsRecord {
            id: RecordId::generate(),
            record_type: RecordType::A,
            name: "@".to_string(),
            value: "203.0.113.1".to_string(),
            ttl: RecordType::DEFAULT_TTL,
            priority: None,
            weight: None,
            port: None,
            subdomain_id,
            user_id,
            cloudflare_record_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_subdomain() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let subdomain = SubdomainId::generate();
        let user = UserId::generate();
        store.records().create(record(subdomain, user)).await.unwrap();
        store
            .records()
            .create(record(SubdomainId::generate(), user))
            .await
            .unwrap();

        let found = store.records().find_by_subdomain(subdomain).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(store.records().count_by_user(user).await.unwrap(), 2);
        assert_eq!(store.records().count_all().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let rec = store
            .records()
            .create(record(SubdomainId::generate(), UserId::generate()))
            .await
            .unwrap();

        assert!(store.records().delete(rec.id).await.unwrap());
        assert!(!store.records().delete(rec.id).await.unwrap());
    }
}
