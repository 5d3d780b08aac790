//! Transaction API handlers: history, limits, and revenue stats.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use freedns_core::{Email, TransactionId, UserId};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireUser};
use crate::models::{CurrentUser, Transaction};
use crate::services::quota;
use crate::state::AppState;
use crate::store::transactions::TransactionStats;

/// Query parameters for `GET /api/transactions`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// When true, return every transaction (admin only).
    #[serde(default)]
    pub admin: bool,
}

/// Request body for `POST /api/transactions/limit`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLimitRequest {
    /// User email keying the ledger entry.
    pub email: Email,
    /// New slot limit.
    pub limit: u32,
}

/// Request body for `POST /api/transactions/reset`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetLimitRequest {
    /// User email keying the ledger entry.
    pub email: Email,
}

/// List transactions: the caller's own, or all with `?admin=true`.
///
/// # Route
///
/// `GET /api/transactions`
pub async fn list(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Transaction>>> {
    let store = state.store();
    if query.admin {
        if !current.is_admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        return Ok(Json(store.transactions().find_all().await?));
    }

    Ok(Json(
        store
            .transactions()
            .find_for_user(current.id, &current.email)
            .await?,
    ))
}

/// Fetch a single transaction; owners and admins only.
///
/// # Route
///
/// `GET /api/transactions/{id}`
pub async fn by_id(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<Transaction>> {
    let id = TransactionId::from_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid transaction id".to_string()))?;

    let transaction = state
        .store()
        .transactions()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    if !owns(&current, &transaction) && !current.is_admin {
        return Err(AppError::Forbidden(
            "This transaction belongs to another user".to_string(),
        ));
    }

    Ok(Json(transaction))
}

/// Transactions for a user given their ID or email (admin only).
///
/// # Route
///
/// `GET /api/transactions/user/{user}`
pub async fn for_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(user): Path<String>,
) -> Result<Json<Vec<Transaction>>> {
    let by_id = UserId::from_str(&user).ok();
    let by_email = Email::parse(&user).ok();

    let mut transactions: Vec<_> = state
        .store()
        .transactions()
        .find_all()
        .await?
        .into_iter()
        .filter(|t| {
            by_id.is_some_and(|id| t.user_id == id)
                || by_email.as_ref().is_some_and(|e| t.user_email == *e)
        })
        .collect();
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(transactions))
}

/// The caller's effective subdomain limit and usage.
///
/// # Route
///
/// `GET /api/transactions/limit`
pub async fn own_limit(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<serde_json::Value>> {
    let store = state.store();
    let user = store
        .users()
        .find_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
    let usage = quota::usage_for(store, &user).await?;

    Ok(Json(json!({
        "limit": usage.limit,
        "used": usage.used,
        "remaining": usage.remaining(),
    })))
}

/// A user's effective limit, looked up by email (admin only).
///
/// # Route
///
/// `GET /api/transactions/limit/{user}`
pub async fn user_limit(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(user): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let email =
        Email::parse(&user).map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))?;

    let store = state.store();
    let ledger_limit = store.transactions().limit_for(&email).await?;
    let base_limit = store
        .users()
        .find_by_email(&email)
        .await?
        .map_or(quota::DEFAULT_SUBDOMAIN_LIMIT, |u| u.subdomain_limit);

    Ok(Json(json!({
        "email": email.as_str(),
        "limit": quota::effective_limit(base_limit, ledger_limit),
    })))
}

/// Set a user's slot limit in the ledger (admin only).
///
/// # Route
///
/// `POST /api/transactions/limit`
pub async fn set_limit(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<SetLimitRequest>,
) -> Result<Json<serde_json::Value>> {
    state
        .store()
        .transactions()
        .set_limit(&req.email, req.limit)
        .await?;

    tracing::info!(
        admin = %admin.email,
        user = %req.email,
        limit = req.limit,
        "Slot limit set"
    );
    Ok(Json(json!({ "success": true, "limit": req.limit })))
}

/// Reset a user's slot limit to the default (admin only).
///
/// # Route
///
/// `POST /api/transactions/reset`
pub async fn reset_limit(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<ResetLimitRequest>,
) -> Result<Json<serde_json::Value>> {
    state.store().transactions().reset_limit(&req.email).await?;

    tracing::info!(admin = %admin.email, user = %req.email, "Slot limit reset");
    Ok(Json(json!({
        "success": true,
        "limit": quota::DEFAULT_SUBDOMAIN_LIMIT,
    })))
}

/// Aggregate transaction statistics (admin only).
///
/// # Route
///
/// `GET /api/transactions/stats`
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<TransactionStats>> {
    Ok(Json(state.store().transactions().stats().await?))
}

fn owns(current: &CurrentUser, transaction: &Transaction) -> bool {
    transaction.user_id == current.id || transaction.user_email == current.email
}
