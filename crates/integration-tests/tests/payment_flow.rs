//! Payment flow tests against a running server.
//!
//! These tests require:
//! - A running freedns server (`FREEDNS_BASE_URL`)
//! - A logged-in session cookie in `FREEDNS_SESSION_COOKIE`
//! - Razorpay test-mode keys configured on the server
//!
//! Run with: `cargo test -p freedns-integration-tests -- --ignored`

use freedns_integration_tests::base_url;
use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

fn logged_in_client() -> Option<Client> {
    let cookie = std::env::var("FREEDNS_SESSION_COOKIE").ok()?;
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::COOKIE,
        header::HeaderValue::from_str(&format!("fd_session={cookie}")).ok()?,
    );
    Client::builder().default_headers(headers).build().ok()
}

#[tokio::test]
#[ignore = "Requires running server, session cookie, and Razorpay test keys"]
async fn test_create_order_returns_checkout_details() {
    let client = logged_in_client().expect("FREEDNS_SESSION_COOKIE must be set");

    let resp = client
        .post(format!("{}/api/payment/create-order", base_url()))
        .json(&json!({ "slots": 2 }))
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::OK);

    let order: Value = resp.json().await.expect("Expected JSON order");
    assert!(
        order["orderId"]
            .as_str()
            .is_some_and(|id| id.starts_with("order_"))
    );
    // 2 slots at Rs.8 each, in paise
    assert_eq!(order["amount"], 1600);
    assert_eq!(order["currency"], "INR");
    assert!(order["keyId"].is_string());
}

#[tokio::test]
#[ignore = "Requires running server and session cookie"]
async fn test_zero_slots_rejected() {
    let client = logged_in_client().expect("FREEDNS_SESSION_COOKIE must be set");

    let resp = client
        .post(format!("{}/api/payment/create-order", base_url()))
        .json(&json!({ "slots": 0 }))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server, session cookie, and Razorpay test keys"]
async fn test_forged_signature_marks_failed() {
    let client = logged_in_client().expect("FREEDNS_SESSION_COOKIE must be set");
    let base = base_url();

    // Create a real order, then try to verify it with a forged signature
    let order: Value = client
        .post(format!("{base}/api/payment/create-order"))
        .json(&json!({ "slots": 1 }))
        .send()
        .await
        .expect("Failed to create order")
        .json()
        .await
        .expect("Expected JSON order");
    let order_id = order["orderId"].as_str().expect("orderId missing");

    let resp = client
        .post(format!("{base}/api/payment/verify"))
        .json(&json!({
            "razorpayOrderId": order_id,
            "razorpayPaymentId": "pay_forged",
            "razorpaySignature": "00".repeat(32),
        }))
        .send()
        .await
        .expect("Failed to reach server");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The transaction must now be failed, not paid
    let transactions: Vec<Value> = client
        .get(format!("{base}/api/transactions"))
        .send()
        .await
        .expect("Failed to list transactions")
        .json()
        .await
        .expect("Expected JSON transaction list");
    let tx = transactions
        .iter()
        .find(|t| t["orderId"] == order_id)
        .expect("Transaction missing");
    assert_eq!(tx["status"], "failed");
}

#[tokio::test]
#[ignore = "Requires running server and session cookie"]
async fn test_limit_endpoint_reports_usage() {
    let client = logged_in_client().expect("FREEDNS_SESSION_COOKIE must be set");

    let limit: Value = client
        .get(format!("{}/api/transactions/limit", base_url()))
        .send()
        .await
        .expect("Failed to fetch limit")
        .json()
        .await
        .expect("Expected JSON body");

    let total = limit["limit"].as_u64().expect("limit missing");
    let used = limit["used"].as_u64().expect("used missing");
    let remaining = limit["remaining"].as_u64().expect("remaining missing");
    assert_eq!(remaining, total.saturating_sub(used));
}
