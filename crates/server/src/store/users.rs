//! User operations on the flat-file store.

use chrono::Utc;
use freedns_core::{Email, Plan, UserId};

use super::{JsonStore, StoreError};
use crate::models::User;

/// Partial update applied to a user.
#[derive(Debug, Default, Clone)]
pub struct UserPatch {
    /// New display name.
    pub name: Option<String>,
    /// New avatar URL.
    pub image: Option<String>,
    /// New plan.
    pub plan: Option<Plan>,
    /// New base subdomain limit.
    pub subdomain_limit: Option<u32>,
}

/// User operations.
pub struct UserStore<'a> {
    store: &'a JsonStore,
}

impl<'a> UserStore<'a> {
    pub(super) const fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// Find a user by email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.users.into_iter().find(|u| u.email == *email))
    }

    /// Find a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.users.into_iter().find(|u| u.id == id))
    }

    /// All users.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read.
    pub async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let db = self.store.read_db().await?;
        Ok(db.users)
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a user with the same email already
    /// exists.
    pub async fn create(&self, user: User) -> Result<User, StoreError> {
        self.store
            .with_db(move |db| {
                if db.users.iter().any(|u| u.email == user.email) {
                    return Err(StoreError::Conflict("email already exists".to_string()));
                }
                db.users.push(user.clone());
                Ok(user)
            })
            .await
    }

    /// Apply a partial update and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, StoreError> {
        self.store
            .with_db(move |db| {
                let user = db
                    .users
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or(StoreError::NotFound)?;

                if let Some(name) = patch.name {
                    user.name = name;
                }
                if let Some(image) = patch.image {
                    user.image = Some(image);
                }
                if let Some(plan) = patch.plan {
                    user.plan = plan;
                }
                if let Some(limit) = patch.subdomain_limit {
                    user.subdomain_limit = limit;
                }
                user.updated_at = Utc::now();

                Ok(user.clone())
            })
            .await
    }

    /// Delete a user, cascading to their subdomains and DNS records.
    ///
    /// Returns `true` if a user was deleted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data file cannot be read or written.
    pub async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        self.store
            .with_db(move |db| {
                let before = db.users.len();
                db.users.retain(|u| u.id != id);
                if db.users.len() == before {
                    return Ok(false);
                }

                db.subdomains.retain(|s| s.user_id != id);
                db.dns_records.retain(|r| r.user_id != id);
                Ok(true)
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{DnsRecord, Subdomain};
    use freedns_core::{DomainId, Label, RecordId, RecordType, SubdomainId};

    fn test_user(email: &str) -> User {
        User::new(
            Email::parse(email).unwrap(),
            "Test User".to_string(),
            None,
            false,
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let user = store.users().create(test_user("a@example.com")).await.unwrap();

        let by_email = store
            .users()
            .find_by_email(&Email::parse("a@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = store.users().find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, user.email);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store.users().create(test_user("a@example.com")).await.unwrap();
        let err = store
            .users()
            .create(test_user("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_limit_refreshes_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let user = store.users().create(test_user("a@example.com")).await.unwrap();
        let updated = store
            .users()
            .update(
                user.id,
                UserPatch {
                    subdomain_limit: Some(5),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.subdomain_limit, 5);
        assert!(updated.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let err = store
            .users()
            .update(UserId::generate(), UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let user = store.users().create(test_user("a@example.com")).await.unwrap();
        let subdomain_id = SubdomainId::generate();

        store
            .with_db(|db| {
                db.subdomains.push(Subdomain {
                    id: subdomain_id,
                    label: Label::parse("api").unwrap(),
                    domain_id: DomainId::generate(),
                    user_id: user.id,
                    active: true,
                    cloudflare_record_id: None,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                });
                db.dns_records.push(DnsRecord {
                    id: RecordId::generate(),
                    record_type: RecordType::A,
                    name: "@".to_string(),
                    value: "203.0.113.1".to_string(),
                    ttl: RecordType::DEFAULT_TTL,
                    priority: None,
                    weight: None,
                    port: None,
                    subdomain_id,
                    user_id: user.id,
                    cloudflare_record_id: None,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                });
                Ok(())
            })
            .await
            .unwrap();

        assert!(store.users().delete(user.id).await.unwrap());

        let db = store.read_db().await.unwrap();
        assert!(db.users.is_empty());
        assert!(db.subdomains.is_empty());
        assert!(db.dns_records.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        assert!(!store.users().delete(UserId::generate()).await.unwrap());
    }
}
