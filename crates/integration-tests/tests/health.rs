//! Health and auth-gate checks against a running server.
//!
//! Run with: `cargo test -p freedns-integration-tests -- --ignored`

use freedns_integration_tests::{base_url, session_client};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running freedns server"]
async fn test_health() {
    let client = session_client();
    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running freedns server"]
async fn test_readiness() {
    let client = session_client();
    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running freedns server"]
async fn test_dashboard_requires_session() {
    let client = session_client();
    let resp = client
        .get(format!("{}/api/dashboard/stats", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.expect("Expected JSON error body");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running freedns server"]
async fn test_admin_requires_session() {
    let client = session_client();
    let resp = client
        .get(format!("{}/api/admin/stats", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running freedns server"]
async fn test_google_login_redirects_to_consent() {
    // Don't follow the redirect; inspect it
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client");

    let resp = client
        .get(format!("{}/auth/google/login", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("Redirect must carry a Location header");
    assert!(location.starts_with("https://accounts.google.com/"));
    assert!(location.contains("state="));
}
