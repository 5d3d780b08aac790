//! Application state shared across handlers.

use std::sync::Arc;

use crate::cloudflare::{CloudflareClient, CloudflareError};
use crate::config::ServerConfig;
use crate::models::Domain;
use crate::razorpay::RazorpayClient;
use crate::services::oauth::GoogleOAuthClient;
use crate::store::JsonStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Cloudflare clients are not held here:
/// every parent domain carries its own credentials, so handlers build one
/// with [`AppState::cloudflare_for`] as needed.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: JsonStore,
    razorpay: RazorpayClient,
    google: GoogleOAuthClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, store: JsonStore) -> Self {
        let razorpay = RazorpayClient::new(&config.razorpay);
        let google = GoogleOAuthClient::new(&config.google);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                razorpay,
                google,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the flat-file store.
    #[must_use]
    pub fn store(&self) -> &JsonStore {
        &self.inner.store
    }

    /// Get a reference to the Razorpay client.
    #[must_use]
    pub fn razorpay(&self) -> &RazorpayClient {
        &self.inner.razorpay
    }

    /// Get a reference to the Google OAuth client.
    #[must_use]
    pub fn google(&self) -> &GoogleOAuthClient {
        &self.inner.google
    }

    /// Build a Cloudflare client for a parent domain's zone.
    ///
    /// # Errors
    ///
    /// Returns `CloudflareError` if the domain's API token is malformed.
    pub fn cloudflare_for(&self, domain: &Domain) -> Result<CloudflareClient, CloudflareError> {
        CloudflareClient::new(
            &domain.cloudflare_zone_id,
            &domain.cloudflare_api_token.clone().into(),
        )
    }
}
