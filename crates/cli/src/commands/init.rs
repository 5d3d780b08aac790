//! Data directory initialization.

use std::path::Path;

use freedns_server::store::{JsonStore, StoreError};

/// Create the data directory and seed empty data files.
///
/// Existing files are left untouched, so this is safe to run repeatedly.
///
/// # Errors
///
/// Returns `StoreError` if the directory or files cannot be created.
#[allow(clippy::print_stdout)]
pub async fn run(data_dir: &Path) -> Result<(), StoreError> {
    let store = JsonStore::new(data_dir);
    store.init().await?;
    println!("Initialized data directory at {}", data_dir.display());
    Ok(())
}
