//! Parent-domain management commands.

use std::path::Path;

use freedns_server::cloudflare::{CloudflareClient, CloudflareError};
use freedns_server::models::Domain;
use freedns_server::store::{JsonStore, StoreError};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur in domain commands.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Cloudflare rejected the credentials.
    #[error("Cloudflare error: {0}")]
    Cloudflare(#[from] CloudflareError),

    /// No domain with the given name exists.
    #[error("Domain not found: {0}")]
    NotFound(String),
}

/// Verify Cloudflare credentials and add a parent domain.
///
/// # Errors
///
/// Returns `DomainError` if the probe fails, the name is taken, or storage
/// fails.
#[allow(clippy::print_stdout)]
pub async fn add(
    data_dir: &Path,
    name: &str,
    zone_id: &str,
    token: &str,
    skip_verify: bool,
) -> Result<(), DomainError> {
    let name = name.trim().to_lowercase();

    if skip_verify {
        tracing::warn!("Skipping Cloudflare credential probe");
    } else {
        let secret = SecretString::from(token.to_string());
        let client = CloudflareClient::new(zone_id, &secret)?;
        let zone = client.probe_zone().await?;
        println!("Verified zone {} ({})", zone.name, zone.status);
    }

    let store = JsonStore::new(data_dir);
    let domain = store
        .domains()
        .create(Domain::new(name, zone_id.to_string(), token.to_string()))
        .await?;

    println!("Added domain {} ({})", domain.name, domain.id);
    Ok(())
}

/// List configured parent domains with their subdomain counts.
///
/// # Errors
///
/// Returns `DomainError` if storage fails.
#[allow(clippy::print_stdout)]
pub async fn list(data_dir: &Path) -> Result<(), DomainError> {
    let store = JsonStore::new(data_dir);
    let domains = store.domains().find_active().await?;
    let subdomains = store.subdomains().find_all().await?;

    if domains.is_empty() {
        println!("No domains configured");
        return Ok(());
    }

    for domain in domains {
        let count = subdomains
            .iter()
            .filter(|s| s.domain_id == domain.id)
            .count();
        println!(
            "{}  zone={}  subdomains={}  created={}",
            domain.name,
            domain.cloudflare_zone_id,
            count,
            domain.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

/// Remove a parent domain by name, cascading to its subdomains.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no domain has that name.
#[allow(clippy::print_stdout)]
pub async fn remove(data_dir: &Path, name: &str) -> Result<(), DomainError> {
    let store = JsonStore::new(data_dir);
    let domain = store
        .domains()
        .find_by_name(&name.trim().to_lowercase())
        .await?
        .ok_or_else(|| DomainError::NotFound(name.to_string()))?;

    store.domains().delete(domain.id).await?;
    println!("Removed domain {} and its subdomains", domain.name);
    Ok(())
}
