//! Parent-domain operations on the flat-file store.

use freedns_core::DomainId;

use super::{JsonStore, StoreError};
use crate::models::Domain;

/// Parent-domain operations.
pub struct DomainStore<'a> {
    store: &'a JsonStore,
}

impl<'a> DomainStore<'a> {
    pub(super) const fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// All active domains (the set offered for subdomain creation).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn find_active(&self) -> Result<Vec<Domain>, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.domains.into_iter().filter(|d| d.active).collect())
    }

    /// Find a domain by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn find_by_id(&self, id: DomainId) -> Result<Option<Domain>, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.domains.into_iter().find(|d| d.id == id))
    }

    /// Find a domain by name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Domain>, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.domains.into_iter().find(|d| d.name == name))
    }

    /// Insert a new domain.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a domain with the same name already
    /// exists.
    pub async fn create(&self, domain: Domain) -> Result<Domain, StoreError> {
        self.store
            .with_db(move |db| {
                if db.domains.iter().any(|d| d.name == domain.name) {
                    return Err(StoreError::Conflict("domain already exists".to_string()));
                }
                db.domains.push(domain.clone());
                Ok(domain)
            })
            .await
    }

    /// Delete a domain, cascading to its subdomains and their DNS records.
    ///
    /// Returns `true` if a domain was deleted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read or written.
    pub async fn delete(&self, id: DomainId) -> Result<bool, StoreError> {
        self.store
            .with_db(move |db| {
                let before = db.domains.len();
                db.domains.retain(|d| d.id != id);
                if db.domains.len() == before {
                    return Ok(false);
                }

                let orphaned: Vec<_> = db
                    .subdomains
                    .iter()
                    .filter(|s| s.domain_id == id)
                    .map(|s| s.id)
                    .collect();
                db.subdomains.retain(|s| s.domain_id != id);
                db.dns_records
                    .retain(|r| !orphaned.contains(&r.subdomain_id));
                Ok(true)
            })
            .await
    }
}
