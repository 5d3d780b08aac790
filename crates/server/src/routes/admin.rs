//! Admin API handlers: user, domain, and subdomain management.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use freedns_core::{DomainId, Email, Label, Plan, SubdomainId, UserId};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cloudflare::CloudflareClient;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Domain;
use crate::routes::dashboard::cleanup_cloudflare;
use crate::state::AppState;
use crate::store::users::UserPatch;

/// A user row in the admin listing. Never includes other users' sessions or
/// any credential material.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    /// User ID.
    pub id: UserId,
    /// Email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Plan.
    pub plan: Plan,
    /// Base subdomain limit.
    pub subdomain_limit: u32,
    /// Subdomains currently owned.
    pub subdomain_count: usize,
    /// Whether the user is an admin.
    pub is_admin: bool,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

/// A domain row in the admin listing; the API token never leaves the store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDomainView {
    /// Domain ID.
    pub id: DomainId,
    /// Domain name.
    pub name: String,
    /// Cloudflare zone ID.
    pub cloudflare_zone_id: String,
    /// Whether the domain accepts new subdomains.
    pub active: bool,
    /// Subdomains under this domain.
    pub subdomain_count: usize,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A subdomain row in the admin listing, with owner and domain context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSubdomainView {
    /// Subdomain ID.
    pub id: SubdomainId,
    /// The label.
    pub label: Label,
    /// Fully qualified name.
    pub full_domain: String,
    /// Parent domain name.
    pub domain_name: String,
    /// Owner's email.
    pub owner_email: Option<Email>,
    /// Owner's display name.
    pub owner_name: Option<String>,
    /// Whether the subdomain is active.
    pub active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Request body for `PUT /api/admin/users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// User to update.
    pub user_id: UserId,
    /// New base subdomain limit.
    pub subdomain_limit: u32,
}

/// Request body for `DELETE /api/admin/users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    /// User to delete.
    pub user_id: UserId,
}

/// Request body for `POST /api/admin/domains`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDomainRequest {
    /// Domain name.
    pub name: String,
    /// Cloudflare zone ID.
    pub cloudflare_zone_id: String,
    /// Cloudflare API token for the zone.
    pub cloudflare_api_token: String,
}

/// Request body for `DELETE /api/admin/domains`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDomainRequest {
    /// Domain to delete.
    pub domain_id: DomainId,
}

/// Request body for `POST /api/admin/domains/test`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDomainRequest {
    /// Cloudflare zone ID.
    pub cloudflare_zone_id: String,
    /// Cloudflare API token for the zone.
    pub cloudflare_api_token: String,
}

/// Request body for `DELETE /api/admin/subdomains`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSubdomainRequest {
    /// Subdomain to delete.
    pub subdomain_id: SubdomainId,
}

/// Entity counts for the admin dashboard.
///
/// # Route
///
/// `GET /api/admin/stats`
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<serde_json::Value>> {
    let store = state.store();
    let users = store.users().find_all().await?;
    let domains = store.domains().find_active().await?;
    let subdomains = store.subdomains().find_all().await?;
    let dns_records = store.records().count_all().await?;

    Ok(Json(json!({
        "users": users.iter().filter(|u| !u.is_admin).count(),
        "domains": domains.len(),
        "subdomains": subdomains.len(),
        "dnsRecords": dns_records,
    })))
}

/// All users with their subdomain counts.
///
/// # Route
///
/// `GET /api/admin/users`
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<AdminUserView>>> {
    let store = state.store();
    let users = store.users().find_all().await?;

    let mut views = Vec::with_capacity(users.len());
    for user in users {
        let subdomain_count = store.subdomains().count_by_user(user.id).await?;
        views.push(AdminUserView {
            id: user.id,
            email: user.email,
            name: user.name,
            plan: user.plan,
            subdomain_limit: user.subdomain_limit,
            subdomain_count,
            is_admin: user.is_admin,
            created_at: user.created_at,
        });
    }

    Ok(Json(views))
}

/// Update a user's base subdomain limit.
///
/// # Route
///
/// `PUT /api/admin/users`
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .store()
        .users()
        .update(
            req.user_id,
            UserPatch {
                subdomain_limit: Some(req.subdomain_limit),
                ..UserPatch::default()
            },
        )
        .await?;

    tracing::info!(
        admin = %admin.email,
        user = %user.email,
        limit = req.subdomain_limit,
        "User base limit updated"
    );
    Ok(Json(json!({
        "success": true,
        "subdomainLimit": user.subdomain_limit,
    })))
}

/// Delete a user, cascading to their subdomains and DNS records.
///
/// # Route
///
/// `DELETE /api/admin/users`
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<DeleteUserRequest>,
) -> Result<Json<serde_json::Value>> {
    let store = state.store();

    // Cloudflare cleanup before the cascade removes the record references
    let subdomains = store.subdomains().find_by_user(req.user_id).await?;
    for subdomain in &subdomains {
        cleanup_cloudflare(&state, subdomain).await;
    }

    if !store.users().delete(req.user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(admin = %admin.email, user_id = %req.user_id, "User deleted");
    Ok(Json(json!({ "success": true })))
}

/// All active domains with subdomain counts.
///
/// # Route
///
/// `GET /api/admin/domains`
pub async fn list_domains(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<AdminDomainView>>> {
    let store = state.store();
    let domains = store.domains().find_active().await?;
    let subdomains = store.subdomains().find_all().await?;

    Ok(Json(
        domains
            .into_iter()
            .map(|domain| {
                let subdomain_count = subdomains
                    .iter()
                    .filter(|s| s.domain_id == domain.id)
                    .count();
                AdminDomainView {
                    id: domain.id,
                    name: domain.name,
                    cloudflare_zone_id: domain.cloudflare_zone_id,
                    active: domain.active,
                    subdomain_count,
                    created_at: domain.created_at,
                }
            })
            .collect(),
    ))
}

/// Create a parent domain after verifying its Cloudflare credentials.
///
/// The zone is probed first so a typo'd token or zone ID is caught before
/// anything is persisted.
///
/// # Route
///
/// `POST /api/admin/domains`
pub async fn create_domain(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<CreateDomainRequest>,
) -> Result<Json<AdminDomainView>> {
    let name = req.name.trim().to_lowercase();
    if name.is_empty() {
        return Err(AppError::BadRequest("Domain name is required".to_string()));
    }

    let token = SecretString::from(req.cloudflare_api_token.clone());
    let cloudflare = CloudflareClient::new(&req.cloudflare_zone_id, &token)?;
    let zone = cloudflare.probe_zone().await?;
    tracing::debug!(zone = %zone.name, status = %zone.status, "Cloudflare zone verified");

    let domain = state
        .store()
        .domains()
        .create(Domain::new(
            name,
            req.cloudflare_zone_id,
            req.cloudflare_api_token,
        ))
        .await?;

    tracing::info!(admin = %admin.email, domain = %domain.name, "Domain created");
    Ok(Json(AdminDomainView {
        id: domain.id,
        name: domain.name,
        cloudflare_zone_id: domain.cloudflare_zone_id,
        active: domain.active,
        subdomain_count: 0,
        created_at: domain.created_at,
    }))
}

/// Delete a domain, cascading to its subdomains and their records.
///
/// # Route
///
/// `DELETE /api/admin/domains`
pub async fn delete_domain(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<DeleteDomainRequest>,
) -> Result<Json<serde_json::Value>> {
    if !state.store().domains().delete(req.domain_id).await? {
        return Err(AppError::NotFound("Domain not found".to_string()));
    }

    tracing::info!(admin = %admin.email, domain_id = %req.domain_id, "Domain deleted");
    Ok(Json(json!({ "success": true })))
}

/// Probe a zone-id/token pair without persisting anything.
///
/// # Route
///
/// `POST /api/admin/domains/test`
pub async fn test_domain(
    State(_state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(req): Json<TestDomainRequest>,
) -> Result<Json<serde_json::Value>> {
    let token = SecretString::from(req.cloudflare_api_token);
    let cloudflare = CloudflareClient::new(&req.cloudflare_zone_id, &token)?;
    let zone = cloudflare.probe_zone().await?;

    Ok(Json(json!({
        "success": true,
        "zone": { "id": zone.id, "name": zone.name, "status": zone.status },
    })))
}

/// All subdomains with owner and domain context.
///
/// # Route
///
/// `GET /api/admin/subdomains`
pub async fn list_subdomains(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<AdminSubdomainView>>> {
    let store = state.store();
    let subdomains = store.subdomains().find_all().await?;

    let mut views = Vec::with_capacity(subdomains.len());
    for subdomain in subdomains {
        let domain_name = store
            .domains()
            .find_by_id(subdomain.domain_id)
            .await?
            .map_or_else(|| "unknown".to_string(), |d| d.name);
        let owner = store.users().find_by_id(subdomain.user_id).await?;

        views.push(AdminSubdomainView {
            id: subdomain.id,
            full_domain: subdomain.label.fqdn(&domain_name),
            label: subdomain.label,
            domain_name,
            owner_email: owner.as_ref().map(|u| u.email.clone()),
            owner_name: owner.map(|u| u.name),
            active: subdomain.active,
            created_at: subdomain.created_at,
        });
    }

    Ok(Json(views))
}

/// Delete any subdomain, with the same best-effort Cloudflare cleanup as
/// the user path.
///
/// # Route
///
/// `DELETE /api/admin/subdomains`
pub async fn delete_subdomain(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<DeleteSubdomainRequest>,
) -> Result<Json<serde_json::Value>> {
    let store = state.store();
    let subdomain = store
        .subdomains()
        .find_by_id(req.subdomain_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subdomain not found".to_string()))?;

    cleanup_cloudflare(&state, &subdomain).await;
    store.subdomains().delete(subdomain.id).await?;

    tracing::info!(admin = %admin.email, subdomain = %subdomain.label, "Subdomain deleted");
    Ok(Json(json!({ "success": true })))
}

/// Storage and configuration status, for operational debugging.
///
/// Reports file presence, transaction totals and which credentials are
/// configured. Never echoes credential values.
///
/// # Route
///
/// `GET /api/admin/debug`
pub async fn debug(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<serde_json::Value>> {
    let store = state.store();
    let config = state.config();

    let data_dir = store.data_dir();
    let database_exists = tokio::fs::try_exists(data_dir.join("database.json"))
        .await
        .unwrap_or(false);
    let ledger_exists = tokio::fs::try_exists(data_dir.join("transactions.json"))
        .await
        .unwrap_or(false);

    let tx_stats = store.transactions().stats().await?;
    let recent: Vec<_> = store
        .transactions()
        .find_all()
        .await?
        .into_iter()
        .take(5)
        .collect();

    Ok(Json(json!({
        "storage": {
            "dataDir": data_dir.display().to_string(),
            "databaseFile": database_exists,
            "transactionsFile": ledger_exists,
        },
        "transactions": {
            "total": tx_stats.total,
            "paid": tx_stats.paid,
            "failed": tx_stats.failed,
            "revenue": tx_stats.revenue,
        },
        "recentTransactions": recent,
        "configured": {
            "google": !config.google.client_id.is_empty(),
            "razorpay": !config.razorpay.key_id.is_empty(),
            "sentry": config.sentry_dsn.is_some(),
        },
    })))
}
