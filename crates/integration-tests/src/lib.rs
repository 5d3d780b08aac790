//! Integration tests for freedns.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server with a scratch data directory
//! FREEDNS_DATA_DIR=$(mktemp -d) cargo run -p freedns-server
//!
//! # Run the ignored server tests
//! cargo test -p freedns-integration-tests -- --ignored
//! ```
//!
//! Server-facing tests are `#[ignore]`d: they need a running server
//! (`FREEDNS_BASE_URL`, default `http://localhost:3000`) and, for the
//! full flows, real Google/Cloudflare/Razorpay credentials. Tests of
//! unauthenticated surfaces (health, auth gates) only need the server.

use reqwest::Client;

/// Base URL for the server under test (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("FREEDNS_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Build a cookie-keeping client, as a browser session would behave.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialized.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
