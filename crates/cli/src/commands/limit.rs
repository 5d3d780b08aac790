//! Purchased-slot limit commands.

use std::path::Path;

use freedns_core::{Email, EmailError};
use freedns_server::services::quota::DEFAULT_SUBDOMAIN_LIMIT;
use freedns_server::store::{JsonStore, StoreError};
use thiserror::Error;

/// Errors that can occur in limit commands.
#[derive(Debug, Error)]
pub enum LimitError {
    /// The email argument is not a usable address.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Set a user's purchased-slot limit in the ledger.
///
/// # Errors
///
/// Returns `LimitError` if the email is invalid or storage fails.
#[allow(clippy::print_stdout)]
pub async fn set(data_dir: &Path, email: &str, limit: u32) -> Result<(), LimitError> {
    let email = Email::parse(email)?;
    let store = JsonStore::new(data_dir);
    store.transactions().set_limit(&email, limit).await?;
    println!("Set slot limit for {email} to {limit}");
    Ok(())
}

/// Remove a user's ledger entry, restoring the default limit.
///
/// # Errors
///
/// Returns `LimitError` if the email is invalid or storage fails.
#[allow(clippy::print_stdout)]
pub async fn reset(data_dir: &Path, email: &str) -> Result<(), LimitError> {
    let email = Email::parse(email)?;
    let store = JsonStore::new(data_dir);
    store.transactions().reset_limit(&email).await?;
    println!("Reset slot limit for {email} to the default ({DEFAULT_SUBDOMAIN_LIMIT})");
    Ok(())
}
