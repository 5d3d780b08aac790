//! Payment API handlers: Razorpay order creation and verification.

use axum::{Json, extract::State};
use freedns_core::TransactionStatus;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::Transaction;
use crate::razorpay::EXTRA_SLOT_PRICE_RUPEES;
use crate::services::quota;
use crate::state::AppState;

/// Request body for `POST /api/payment/create-order`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Number of extra subdomain slots to purchase.
    pub slots: u32,
}

/// Response body for `POST /api/payment/create-order`.
///
/// Carries everything the Razorpay checkout widget needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Razorpay order ID.
    pub order_id: String,
    /// Amount in paise, as the widget expects.
    pub amount: u64,
    /// Currency code.
    pub currency: String,
    /// Public Razorpay key ID.
    pub key_id: String,
    /// Slots being purchased.
    pub slots: u32,
}

/// Request body for `POST /api/payment/verify`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Razorpay order ID.
    pub razorpay_order_id: String,
    /// Razorpay payment ID.
    pub razorpay_payment_id: String,
    /// Hex HMAC-SHA256 signature over `"{order_id}|{payment_id}"`.
    pub razorpay_signature: String,
}

/// Create a Razorpay order for extra subdomain slots.
///
/// The amount is stored locally in rupees and sent to Razorpay in paise.
///
/// # Route
///
/// `POST /api/payment/create-order`
pub async fn create_order(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>> {
    if req.slots == 0 {
        return Err(AppError::BadRequest(
            "At least one slot must be purchased".to_string(),
        ));
    }

    let amount_rupees = u64::from(req.slots) * EXTRA_SLOT_PRICE_RUPEES;
    let receipt = format!("slots-{}-{}", req.slots, current.id);
    let notes = json!({
        "email": current.email.as_str(),
        "slots": req.slots,
    });

    let order = state
        .razorpay()
        .create_order(amount_rupees, "INR", &receipt, notes)
        .await?;

    state
        .store()
        .transactions()
        .create(Transaction::new(
            current.id,
            current.email.clone(),
            current.name.clone(),
            order.id.clone(),
            amount_rupees,
            order.currency.clone(),
            req.slots,
        ))
        .await?;

    tracing::info!(
        user_id = %current.id,
        order_id = %order.id,
        slots = req.slots,
        "Payment order created"
    );

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: state.razorpay().key_id().to_string(),
        slots: req.slots,
    }))
}

/// Verify a completed checkout and credit the purchased slots.
///
/// The signature is recomputed server-side; a mismatch marks the
/// transaction failed and returns 400 without crediting anything.
///
/// # Route
///
/// `POST /api/payment/verify`
pub async fn verify(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<serde_json::Value>> {
    let store = state.store();
    let transaction = store
        .transactions()
        .find_by_order_id(&req.razorpay_order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    if transaction.user_id != current.id && transaction.user_email != current.email {
        return Err(AppError::Forbidden(
            "This transaction belongs to another user".to_string(),
        ));
    }

    let valid = state.razorpay().verify_payment_signature(
        &req.razorpay_order_id,
        &req.razorpay_payment_id,
        &req.razorpay_signature,
    );

    if !valid {
        store
            .transactions()
            .update_status(&req.razorpay_order_id, TransactionStatus::Failed, None)
            .await?;
        tracing::warn!(
            order_id = %req.razorpay_order_id,
            user_id = %current.id,
            "Payment signature verification failed"
        );
        return Err(AppError::BadRequest(
            "Invalid payment signature".to_string(),
        ));
    }

    store
        .transactions()
        .update_status(
            &req.razorpay_order_id,
            TransactionStatus::Paid,
            Some(req.razorpay_payment_id.clone()),
        )
        .await?;

    // Report the limit the user now has
    let limit = match store.users().find_by_id(current.id).await? {
        Some(user) => quota::usage_for(store, &user).await?.limit,
        None => store.transactions().limit_for(&current.email).await?,
    };

    tracing::info!(
        order_id = %req.razorpay_order_id,
        user_id = %current.id,
        slots = transaction.subdomain_slots,
        "Payment verified, slots credited"
    );

    Ok(Json(json!({
        "success": true,
        "slotsAdded": transaction.subdomain_slots,
        "subdomainLimit": limit,
    })))
}
