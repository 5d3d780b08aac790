//! Dashboard API handlers: the logged-in user's subdomains and records.

use std::net::Ipv4Addr;

use axum::{
    Json,
    extract::State,
};
use chrono::{DateTime, Utc};
use freedns_core::{DomainId, Label, Plan, RecordType, SubdomainId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cloudflare::RecordSpec;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::DnsRecord;
use crate::services::quota;
use crate::state::AppState;

/// Response body for `GET /api/dashboard/stats`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Subdomains the user owns.
    pub subdomains: u32,
    /// DNS records the user owns.
    pub dns_records: usize,
    /// Effective subdomain limit.
    pub subdomain_limit: u32,
    /// The user's plan.
    pub plan: Plan,
}

/// A parent domain as shown to users: name only, never credentials.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSummary {
    /// Domain ID.
    pub id: DomainId,
    /// Domain name.
    pub name: String,
}

/// A DNS record summary inside a subdomain listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record value.
    pub value: String,
    /// Time to live.
    pub ttl: u32,
    /// SRV priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// SRV weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    /// SRV port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl From<&DnsRecord> for RecordSummary {
    fn from(record: &DnsRecord) -> Self {
        Self {
            record_type: record.record_type,
            value: record.value.clone(),
            ttl: record.ttl,
            priority: record.priority,
            weight: record.weight,
            port: record.port,
        }
    }
}

/// One of the user's subdomains, with parent-domain context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainView {
    /// Subdomain ID.
    pub id: SubdomainId,
    /// The label.
    pub label: Label,
    /// Parent domain ID.
    pub domain_id: DomainId,
    /// Parent domain name.
    pub domain_name: String,
    /// Fully qualified name.
    pub full_domain: String,
    /// Whether the subdomain is active.
    pub active: bool,
    /// First DNS record, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordSummary>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/dashboard/subdomains`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubdomainRequest {
    /// Desired label; slugified before validation.
    pub label: String,
    /// Parent domain to create under.
    pub domain_id: DomainId,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record value (IPv4 for A, hostname for CNAME, target for SRV).
    pub value: String,
    /// Time to live; defaults to 300.
    pub ttl: Option<u32>,
    /// SRV priority; defaults to 10.
    pub priority: Option<u16>,
    /// SRV weight; defaults to 10.
    pub weight: Option<u16>,
    /// SRV port; defaults to 80.
    pub port: Option<u16>,
}

/// Request body for `DELETE /api/dashboard/subdomains`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSubdomainRequest {
    /// Subdomain to delete.
    pub subdomain_id: SubdomainId,
}

/// Dashboard statistics for the current user.
///
/// # Route
///
/// `GET /api/dashboard/stats`
pub async fn stats(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<DashboardStats>> {
    let store = state.store();
    let user = store
        .users()
        .find_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

    let usage = quota::usage_for(store, &user).await?;
    let dns_records = store.records().count_by_user(user.id).await?;

    Ok(Json(DashboardStats {
        subdomains: usage.used,
        dns_records,
        subdomain_limit: usage.limit,
        plan: user.plan,
    }))
}

/// Active parent domains available for subdomain creation.
///
/// # Route
///
/// `GET /api/dashboard/domains`
pub async fn list_domains(
    State(state): State<AppState>,
    RequireUser(_current): RequireUser,
) -> Result<Json<Vec<DomainSummary>>> {
    let domains = state.store().domains().find_active().await?;
    Ok(Json(
        domains
            .into_iter()
            .map(|d| DomainSummary {
                id: d.id,
                name: d.name,
            })
            .collect(),
    ))
}

/// The current user's subdomains with domain and first-record context.
///
/// # Route
///
/// `GET /api/dashboard/subdomains`
pub async fn list_subdomains(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Vec<SubdomainView>>> {
    let store = state.store();
    let subdomains = store.subdomains().find_by_user(current.id).await?;

    let mut views = Vec::with_capacity(subdomains.len());
    for subdomain in subdomains {
        let domain_name = store
            .domains()
            .find_by_id(subdomain.domain_id)
            .await?
            .map_or_else(|| "unknown".to_string(), |d| d.name);
        let records = store.records().find_by_subdomain(subdomain.id).await?;

        views.push(SubdomainView {
            id: subdomain.id,
            full_domain: subdomain.label.fqdn(&domain_name),
            label: subdomain.label,
            domain_id: subdomain.domain_id,
            domain_name,
            active: subdomain.active,
            record: records.first().map(RecordSummary::from),
            created_at: subdomain.created_at,
        });
    }

    Ok(Json(views))
}

/// Reject record values that cannot work for the chosen type.
fn validate_value(record_type: RecordType, value: &str) -> Result<()> {
    match record_type {
        RecordType::A => {
            value.parse::<Ipv4Addr>().map_err(|_| {
                AppError::BadRequest("A record value must be an IPv4 address".to_string())
            })?;
        }
        RecordType::Cname | RecordType::Srv => {
            if value.trim().is_empty() {
                return Err(AppError::BadRequest("Record value is required".to_string()));
            }
        }
    }
    Ok(())
}

/// Create a subdomain with its first DNS record.
///
/// Enforces the effective subdomain limit, creates the record in Cloudflare
/// first, then persists locally with Cloudflare's record ID.
///
/// # Route
///
/// `POST /api/dashboard/subdomains`
pub async fn create_subdomain(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(req): Json<CreateSubdomainRequest>,
) -> Result<Json<SubdomainView>> {
    let store = state.store();
    let user = store
        .users()
        .find_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

    let label = Label::slugify(&req.label)
        .map_err(|e| AppError::BadRequest(format!("Invalid label: {e}")))?;
    validate_value(req.record_type, &req.value)?;

    let usage = quota::usage_for(store, &user).await?;
    if !usage.has_capacity() {
        return Err(AppError::BadRequest(format!(
            "Subdomain limit reached ({} of {})",
            usage.used, usage.limit
        )));
    }

    let domain = store
        .domains()
        .find_by_id(req.domain_id)
        .await?
        .filter(|d| d.active)
        .ok_or_else(|| AppError::NotFound("Domain not found".to_string()))?;

    if store.subdomains().exists(&label, domain.id).await? {
        return Err(AppError::Store(crate::store::StoreError::Conflict(
            "Subdomain already taken".to_string(),
        )));
    }

    let ttl = req.ttl.unwrap_or(RecordType::DEFAULT_TTL);
    let spec = RecordSpec {
        record_type: req.record_type,
        name: label.fqdn(&domain.name),
        value: req.value.clone(),
        ttl,
        priority: req.priority,
        weight: req.weight,
        port: req.port,
    };

    let cloudflare = state.cloudflare_for(&domain)?;
    let cloudflare_record_id = cloudflare.create_record(&spec).await?;

    let subdomain = store
        .subdomains()
        .create(crate::models::Subdomain::new(
            label,
            domain.id,
            user.id,
            Some(cloudflare_record_id.clone()),
        ))
        .await?;

    let now = Utc::now();
    let record = store
        .records()
        .create(DnsRecord {
            id: freedns_core::RecordId::generate(),
            record_type: req.record_type,
            name: "@".to_string(),
            value: req.value,
            ttl,
            priority: req.record_type.is_srv().then(|| {
                req.priority.unwrap_or(RecordType::DEFAULT_SRV_PRIORITY)
            }),
            weight: req
                .record_type
                .is_srv()
                .then(|| req.weight.unwrap_or(RecordType::DEFAULT_SRV_WEIGHT)),
            port: req
                .record_type
                .is_srv()
                .then(|| req.port.unwrap_or(RecordType::DEFAULT_SRV_PORT)),
            subdomain_id: subdomain.id,
            user_id: user.id,
            cloudflare_record_id: Some(cloudflare_record_id),
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(
        user_id = %user.id,
        subdomain = %subdomain.label,
        domain = %domain.name,
        "Subdomain created"
    );

    Ok(Json(SubdomainView {
        id: subdomain.id,
        full_domain: subdomain.label.fqdn(&domain.name),
        label: subdomain.label,
        domain_id: domain.id,
        domain_name: domain.name,
        active: subdomain.active,
        record: Some(RecordSummary::from(&record)),
        created_at: subdomain.created_at,
    }))
}

/// Delete one of the user's subdomains.
///
/// Cloudflare cleanup is best effort: the local cascade proceeds even when
/// the remote delete fails, so stale zone records never block the user.
///
/// # Route
///
/// `DELETE /api/dashboard/subdomains`
pub async fn delete_subdomain(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(req): Json<DeleteSubdomainRequest>,
) -> Result<Json<serde_json::Value>> {
    let store = state.store();
    let subdomain = store
        .subdomains()
        .find_by_id(req.subdomain_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subdomain not found".to_string()))?;

    if subdomain.user_id != current.id {
        return Err(AppError::Forbidden(
            "You do not own this subdomain".to_string(),
        ));
    }

    cleanup_cloudflare(&state, &subdomain).await;
    store.subdomains().delete(subdomain.id).await?;

    tracing::info!(user_id = %current.id, subdomain = %subdomain.label, "Subdomain deleted");
    Ok(Json(json!({ "success": true })))
}

/// Best-effort removal of a subdomain's Cloudflare records.
pub(crate) async fn cleanup_cloudflare(state: &AppState, subdomain: &crate::models::Subdomain) {
    let store = state.store();
    let Ok(Some(domain)) = store.domains().find_by_id(subdomain.domain_id).await else {
        return;
    };
    let Ok(cloudflare) = state.cloudflare_for(&domain) else {
        return;
    };

    let mut remote_ids: Vec<String> = subdomain.cloudflare_record_id.iter().cloned().collect();
    if let Ok(records) = store.records().find_by_subdomain(subdomain.id).await {
        remote_ids.extend(records.into_iter().filter_map(|r| r.cloudflare_record_id));
    }
    remote_ids.dedup();

    for record_id in remote_ids {
        if let Err(e) = cloudflare.delete_record(&record_id).await {
            tracing::warn!(
                record_id = %record_id,
                error = %e,
                "Cloudflare record cleanup failed; continuing with local delete"
            );
        }
    }
}
