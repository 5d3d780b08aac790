//! Subdomain operations on the flat-file store.

use freedns_core::{DomainId, Label, SubdomainId, UserId};

use super::{JsonStore, StoreError};
use crate::models::Subdomain;

/// Subdomain operations.
pub struct SubdomainStore<'a> {
    store: &'a JsonStore,
}

impl<'a> SubdomainStore<'a> {
    pub(super) const fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// All subdomains owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Subdomain>, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db
            .subdomains
            .into_iter()
            .filter(|s| s.user_id == user_id)
            .collect())
    }

    /// Find a subdomain by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn find_by_id(&self, id: SubdomainId) -> Result<Option<Subdomain>, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.subdomains.into_iter().find(|s| s.id == id))
    }

    /// All subdomains (admin listing).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn find_all(&self) -> Result<Vec<Subdomain>, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.subdomains)
    }

    /// How many subdomains a user owns (quota input).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn count_by_user(&self, user_id: UserId) -> Result<usize, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.subdomains.iter().filter(|s| s.user_id == user_id).count())
    }

    /// Insert a new subdomain.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the label is already taken under
    /// the same parent domain.
    pub async fn create(&self, subdomain: Subdomain) -> Result<Subdomain, StoreError> {
        self.store
            .with_db(move |db| {
                let taken = db
                    .subdomains
                    .iter()
                    .any(|s| s.label == subdomain.label && s.domain_id == subdomain.domain_id);
                if taken {
                    return Err(StoreError::Conflict(
                        "subdomain already exists for this domain".to_string(),
                    ));
                }
                db.subdomains.push(subdomain.clone());
                Ok(subdomain)
            })
            .await
    }

    /// Whether a label is already taken under a parent domain.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn exists(&self, label: &Label, domain_id: DomainId) -> Result<bool, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db
            .subdomains
            .iter()
            .any(|s| s.label == *label && s.domain_id == domain_id))
    }

    /// Delete a subdomain, cascading to its DNS records.
    ///
    /// Returns `true` if a subdomain was deleted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read or written.
    pub async fn delete(&self, id: SubdomainId) -> Result<bool, StoreError> {
        self.store
            .with_db(move |db| {
                let before = db.subdomains.len();
                db.subdomains.retain(|s| s.id != id);
                if db.subdomains.len() == before {
                    return Ok(false);
                }
                db.dns_records.retain(|r| r.subdomain_id != id);
                Ok(true)
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn subdomain(label: &str, domain_id: DomainId, user_id: UserId) -> Subdomain {
        Subdomain::new(Label::parse(label).unwrap(), domain_id, user_id, None)
    }

    #[tokio::test]
    async fn test_label_unique_per_domain() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let domain_a = DomainId::generate();
        let domain_b = DomainId::generate();
        let user = UserId::generate();

        store
            .subdomains()
            .create(subdomain("api", domain_a, user))
            .await
            .unwrap();

        // Same label under a different parent domain is fine.
        store
            .subdomains()
            .create(subdomain("api", domain_b, user))
            .await
            .unwrap();

        // Same label under the same domain conflicts, regardless of owner.
        let err = store
            .subdomains()
            .create(subdomain("api", domain_a, UserId::generate()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_count_by_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let domain = DomainId::generate();
        let user = UserId::generate();
        store
            .subdomains()
            .create(subdomain("one", domain, user))
            .await
            .unwrap();
        store
            .subdomains()
            .create(subdomain("two", domain, user))
            .await
            .unwrap();
        store
            .subdomains()
            .create(subdomain("other", domain, UserId::generate()))
            .await
            .unwrap();

        assert_eq!(store.subdomains().count_by_user(user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        assert!(
            !store
                .subdomains()
                .delete(SubdomainId::generate())
                .await
                .unwrap()
        );
    }
}
