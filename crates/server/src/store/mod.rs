//! Flat-file JSON persistence.
//!
//! # Data files
//!
//! The store keeps two JSON documents under the configured data directory:
//!
//! - `database.json` - users, parent domains, subdomains and DNS records
//! - `transactions.json` - payment transactions and the purchased-slot
//!   ledger (user email → slot limit)
//!
//! Every mutation follows the same cycle: read the whole file, mutate the
//! in-memory document, write the whole file back. A process-wide
//! `tokio::sync::Mutex` per file serializes those cycles so concurrent
//! handlers cannot lose writes. There is no indexing and no transactional
//! coupling between the two files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::{DnsRecord, Domain, Subdomain, Transaction, User};

pub mod domains;
pub mod records;
pub mod subdomains;
pub mod transactions;
pub mod users;

pub use domains::DomainStore;
pub use records::RecordStore;
pub use subdomains::SubdomainStore;
pub use transactions::TransactionStore;
pub use users::UserStore;

/// Name of the main data file.
const DATABASE_FILE: &str = "database.json";

/// Name of the transactions data file.
const TRANSACTIONS_FILE: &str = "transactions.json";

/// Errors that can occur in the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a data file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A data file does not contain valid JSON.
    #[error("storage data corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Uniqueness constraint violation (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// The full `database.json` document.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Database {
    /// Registered users.
    pub users: Vec<User>,
    /// Admin-configured parent domains.
    pub domains: Vec<Domain>,
    /// User-owned subdomains.
    pub subdomains: Vec<Subdomain>,
    /// DNS records attached to subdomains.
    pub dns_records: Vec<DnsRecord>,
}

/// The full `transactions.json` document.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentLedger {
    /// All payment transactions.
    pub transactions: Vec<Transaction>,
    /// Purchased-slot limits keyed by user email.
    pub user_subdomain_limits: HashMap<String, u32>,
}

/// Flat-file JSON store.
///
/// Cheap to share behind the application state; all I/O is async via
/// `tokio::fs`.
pub struct JsonStore {
    data_dir: PathBuf,
    db_lock: Mutex<()>,
    ledger_lock: Mutex<()>,
}

impl JsonStore {
    /// Create a store rooted at the given data directory.
    ///
    /// Does not touch the filesystem; call [`JsonStore::init`] to create the
    /// directory and empty data files.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db_lock: Mutex::new(()),
            ledger_lock: Mutex::new(()),
        }
    }

    /// The data directory this store reads and writes.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create the data directory and seed missing data files with empty
    /// documents.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory or files cannot be created.
    pub async fn init(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let db_path = self.data_dir.join(DATABASE_FILE);
        if tokio::fs::try_exists(&db_path).await? {
            // keep existing data
        } else {
            self.write_json(DATABASE_FILE, &Database::default()).await?;
        }

        let ledger_path = self.data_dir.join(TRANSACTIONS_FILE);
        if !tokio::fs::try_exists(&ledger_path).await? {
            self.write_json(TRANSACTIONS_FILE, &PaymentLedger::default())
                .await?;
        }

        Ok(())
    }

    /// Whether the data directory is usable (exists or can be created).
    ///
    /// Used by the readiness probe.
    pub async fn is_ready(&self) -> bool {
        tokio::fs::create_dir_all(&self.data_dir).await.is_ok()
    }

    async fn read_json<T>(&self, file: &str) -> Result<T, StoreError>
    where
        T: Default + DeserializeOwned,
    {
        let path = self.data_dir.join(file);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            // A missing file is an empty document, matching first-run behavior.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let path = self.data_dir.join(file);
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    /// Read the main database document (no write lock; single read).
    pub(crate) async fn read_db(&self) -> Result<Database, StoreError> {
        self.read_json(DATABASE_FILE).await
    }

    /// Run a read-modify-write cycle against `database.json` under the
    /// write lock.
    pub(crate) async fn with_db<T>(
        &self,
        f: impl FnOnce(&mut Database) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.db_lock.lock().await;
        let mut db = self.read_json::<Database>(DATABASE_FILE).await?;
        let out = f(&mut db)?;
        self.write_json(DATABASE_FILE, &db).await?;
        Ok(out)
    }

    /// Read the payment ledger document.
    pub(crate) async fn read_ledger(&self) -> Result<PaymentLedger, StoreError> {
        self.read_json(TRANSACTIONS_FILE).await
    }

    /// Run a read-modify-write cycle against `transactions.json` under the
    /// write lock.
    pub(crate) async fn with_ledger<T>(
        &self,
        f: impl FnOnce(&mut PaymentLedger) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.ledger_lock.lock().await;
        let mut ledger = self.read_json::<PaymentLedger>(TRANSACTIONS_FILE).await?;
        let out = f(&mut ledger)?;
        self.write_json(TRANSACTIONS_FILE, &ledger).await?;
        Ok(out)
    }

    /// User operations.
    #[must_use]
    pub const fn users(&self) -> UserStore<'_> {
        UserStore::new(self)
    }

    /// Parent-domain operations.
    #[must_use]
    pub const fn domains(&self) -> DomainStore<'_> {
        DomainStore::new(self)
    }

    /// Subdomain operations.
    #[must_use]
    pub const fn subdomains(&self) -> SubdomainStore<'_> {
        SubdomainStore::new(self)
    }

    /// DNS-record operations.
    #[must_use]
    pub const fn records(&self) -> RecordStore<'_> {
        RecordStore::new(self)
    }

    /// Transaction and slot-ledger operations.
    #[must_use]
    pub const fn transactions(&self) -> TransactionStore<'_> {
        TransactionStore::new(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        store.init().await.unwrap();

        assert!(dir.path().join(DATABASE_FILE).exists());
        assert!(dir.path().join(TRANSACTIONS_FILE).exists());

        let db = store.read_db().await.unwrap();
        assert!(db.users.is_empty());
        assert!(db.domains.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let db = store.read_db().await.unwrap();
        assert!(db.users.is_empty());

        let ledger = store.read_ledger().await.unwrap();
        assert!(ledger.transactions.is_empty());
        assert!(ledger.user_subdomain_limits.is_empty());
    }

    #[tokio::test]
    async fn test_corrupted_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(DATABASE_FILE), b"{not json")
            .await
            .unwrap();

        let store = JsonStore::new(dir.path());
        let err = store.read_db().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupted(_)));
    }

    #[tokio::test]
    async fn test_with_db_persists_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store
            .with_db(|db| {
                db.domains.push(crate::models::Domain::new(
                    "freedns.example".to_string(),
                    "zone-1".to_string(),
                    "token-1".to_string(),
                ));
                Ok(())
            })
            .await
            .unwrap();

        let db = store.read_db().await.unwrap();
        assert_eq!(db.domains.len(), 1);
        assert_eq!(db.domains[0].name, "freedns.example");
    }
}
