//! Admin API tests against a running server.
//!
//! These tests require:
//! - A running freedns server (`FREEDNS_BASE_URL`)
//! - An admin session cookie in `FREEDNS_ADMIN_SESSION_COOKIE`
//! - Valid Cloudflare credentials in `FREEDNS_TEST_ZONE_ID` /
//!   `FREEDNS_TEST_ZONE_TOKEN` for the credential-probe tests
//!
//! Run with: `cargo test -p freedns-integration-tests -- --ignored`

use freedns_integration_tests::base_url;
use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

/// Client that sends the externally provided admin session cookie.
fn admin_client() -> Option<Client> {
    let cookie = std::env::var("FREEDNS_ADMIN_SESSION_COOKIE").ok()?;
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::COOKIE,
        header::HeaderValue::from_str(&format!("fd_session={cookie}")).ok()?,
    );
    Client::builder().default_headers(headers).build().ok()
}

#[tokio::test]
#[ignore = "Requires running server and admin session cookie"]
async fn test_admin_stats_shape() {
    let client = admin_client().expect("FREEDNS_ADMIN_SESSION_COOKIE must be set");

    let stats: Value = client
        .get(format!("{}/api/admin/stats", base_url()))
        .send()
        .await
        .expect("Failed to fetch admin stats")
        .json()
        .await
        .expect("Expected JSON stats");

    for key in ["users", "domains", "subdomains", "dnsRecords"] {
        assert!(stats[key].is_u64(), "missing count: {key}");
    }
}

#[tokio::test]
#[ignore = "Requires running server and admin session cookie"]
async fn test_admin_users_listing_excludes_secrets() {
    let client = admin_client().expect("FREEDNS_ADMIN_SESSION_COOKIE must be set");

    let users: Vec<Value> = client
        .get(format!("{}/api/admin/users", base_url()))
        .send()
        .await
        .expect("Failed to fetch users")
        .json()
        .await
        .expect("Expected JSON user list");

    for user in &users {
        assert!(user["email"].is_string());
        assert!(user["subdomainCount"].is_u64());
    }
}

#[tokio::test]
#[ignore = "Requires running server, admin cookie, and Cloudflare test credentials"]
async fn test_domain_credential_probe() {
    let client = admin_client().expect("FREEDNS_ADMIN_SESSION_COOKIE must be set");
    let zone_id = std::env::var("FREEDNS_TEST_ZONE_ID").expect("FREEDNS_TEST_ZONE_ID must be set");
    let token =
        std::env::var("FREEDNS_TEST_ZONE_TOKEN").expect("FREEDNS_TEST_ZONE_TOKEN must be set");

    let resp = client
        .post(format!("{}/api/admin/domains/test", base_url()))
        .json(&json!({
            "cloudflareZoneId": zone_id,
            "cloudflareApiToken": token,
        }))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Expected JSON body");
    assert_eq!(body["success"], true);
    assert!(body["zone"]["name"].is_string());
}

#[tokio::test]
#[ignore = "Requires running server and admin session cookie"]
async fn test_bad_credentials_rejected() {
    let client = admin_client().expect("FREEDNS_ADMIN_SESSION_COOKIE must be set");

    let resp = client
        .post(format!("{}/api/admin/domains/test", base_url()))
        .json(&json!({
            "cloudflareZoneId": "0000000000000000",
            "cloudflareApiToken": "invalid-token",
        }))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
#[ignore = "Requires running server and admin session cookie"]
async fn test_domain_listing_never_exposes_tokens() {
    let client = admin_client().expect("FREEDNS_ADMIN_SESSION_COOKIE must be set");

    let resp = client
        .get(format!("{}/api/admin/domains", base_url()))
        .send()
        .await
        .expect("Failed to fetch domains");
    assert_eq!(resp.status(), StatusCode::OK);

    let raw = resp.text().await.expect("Failed to read body");
    assert!(
        !raw.contains("cloudflareApiToken"),
        "Domain listing must not leak API tokens"
    );
}

#[tokio::test]
#[ignore = "Requires running server and admin session cookie"]
async fn test_debug_reports_configuration_booleans() {
    let client = admin_client().expect("FREEDNS_ADMIN_SESSION_COOKIE must be set");

    let debug: Value = client
        .get(format!("{}/api/admin/debug", base_url()))
        .send()
        .await
        .expect("Failed to fetch debug info")
        .json()
        .await
        .expect("Expected JSON body");

    assert!(debug["storage"]["databaseFile"].is_boolean());
    assert!(debug["configured"]["google"].is_boolean());
    assert!(debug["configured"]["razorpay"].is_boolean());
}
