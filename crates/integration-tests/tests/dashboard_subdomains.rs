//! Subdomain lifecycle tests against a running server.
//!
//! These tests require:
//! - A running freedns server (`FREEDNS_BASE_URL`)
//! - A logged-in session cookie in `FREEDNS_SESSION_COOKIE`
//!   (log in via the browser and copy the `fd_session` value)
//! - At least one active parent domain with valid Cloudflare credentials
//!
//! Run with: `cargo test -p freedns-integration-tests -- --ignored`

use freedns_integration_tests::base_url;
use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};
use uuid::Uuid;

/// Client that sends the externally provided session cookie.
fn logged_in_client() -> Option<Client> {
    let cookie = std::env::var("FREEDNS_SESSION_COOKIE").ok()?;
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::COOKIE,
        header::HeaderValue::from_str(&format!("fd_session={cookie}")).ok()?,
    );
    Client::builder().default_headers(headers).build().ok()
}

/// A random label that is valid and extremely unlikely to collide.
fn random_label() -> String {
    format!("it-{}", Uuid::new_v4().simple())
        .chars()
        .take(20)
        .collect()
}

#[tokio::test]
#[ignore = "Requires running server, session cookie, and Cloudflare credentials"]
async fn test_subdomain_create_list_delete() {
    let client = logged_in_client().expect("FREEDNS_SESSION_COOKIE must be set");
    let base = base_url();

    // Need an active parent domain to create under
    let domains: Vec<Value> = client
        .get(format!("{base}/api/dashboard/domains"))
        .send()
        .await
        .expect("Failed to list domains")
        .json()
        .await
        .expect("Expected JSON domain list");
    let domain_id = domains
        .first()
        .and_then(|d| d["id"].as_str())
        .expect("At least one active domain required")
        .to_string();

    let label = random_label();
    let resp = client
        .post(format!("{base}/api/dashboard/subdomains"))
        .json(&json!({
            "label": label,
            "domainId": domain_id,
            "type": "A",
            "value": "203.0.113.10",
        }))
        .send()
        .await
        .expect("Failed to create subdomain");
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = resp.json().await.expect("Expected created subdomain");
    assert_eq!(created["label"], label.as_str());
    let subdomain_id = created["id"].as_str().expect("id missing").to_string();

    // It shows up in the listing with its record
    let listed: Vec<Value> = client
        .get(format!("{base}/api/dashboard/subdomains"))
        .send()
        .await
        .expect("Failed to list subdomains")
        .json()
        .await
        .expect("Expected JSON subdomain list");
    let mine = listed
        .iter()
        .find(|s| s["id"] == subdomain_id.as_str())
        .expect("Created subdomain missing from listing");
    assert_eq!(mine["record"]["type"], "A");

    // Clean up
    let resp = client
        .delete(format!("{base}/api/dashboard/subdomains"))
        .json(&json!({ "subdomainId": subdomain_id }))
        .send()
        .await
        .expect("Failed to delete subdomain");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and session cookie"]
async fn test_invalid_label_rejected() {
    let client = logged_in_client().expect("FREEDNS_SESSION_COOKIE must be set");
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/dashboard/subdomains"))
        .json(&json!({
            "label": "!!!",
            "domainId": Uuid::new_v4(),
            "type": "A",
            "value": "203.0.113.10",
        }))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and session cookie"]
async fn test_bad_ipv4_rejected() {
    let client = logged_in_client().expect("FREEDNS_SESSION_COOKIE must be set");
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/dashboard/subdomains"))
        .json(&json!({
            "label": random_label(),
            "domainId": Uuid::new_v4(),
            "type": "A",
            "value": "not-an-ip",
        }))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and session cookie"]
async fn test_stats_reports_limit() {
    let client = logged_in_client().expect("FREEDNS_SESSION_COOKIE must be set");

    let stats: Value = client
        .get(format!("{}/api/dashboard/stats", base_url()))
        .send()
        .await
        .expect("Failed to fetch stats")
        .json()
        .await
        .expect("Expected JSON stats");

    assert!(stats["subdomainLimit"].as_u64().unwrap_or(0) >= 2);
    assert!(stats["plan"].is_string());
}
