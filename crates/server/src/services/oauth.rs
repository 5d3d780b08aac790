//! Google OAuth 2.0 client.
//!
//! Implements the authorization-code flow: build the consent URL, exchange
//! the returned code for an access token, then fetch the user's profile.

use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GoogleConfig;

/// Google's OAuth authorization endpoint.
const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google's token exchange endpoint.
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google's userinfo endpoint.
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Scopes requested during login.
const SCOPES: &str = "openid email profile";

/// Errors that can occur during the OAuth flow.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token or userinfo endpoint returned an error response.
    #[error("OAuth provider error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The profile is missing a field we require.
    #[error("OAuth profile missing {0}")]
    MissingField(&'static str),
}

/// Access token returned by the token exchange.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Raw userinfo payload.
#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// The subset of the Google profile the application uses.
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    /// Verified email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub picture: Option<String>,
}

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.expose_secret().to_string(),
            token_url: TOKEN_URL.to_string(),
            userinfo_url: USERINFO_URL.to_string(),
        }
    }

    /// Client with endpoint overrides, for tests against a local mock.
    #[cfg(test)]
    fn with_endpoints(token_url: String, userinfo_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            token_url,
            userinfo_url,
        }
    }

    /// Build the consent-screen URL the user is redirected to.
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{AUTH_URL}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&access_type=online&prompt=select_account",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError` if the request fails or Google rejects the code.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String, OAuthError> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        let response = self.client.post(&self.token_url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OAuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError` if the request fails or the profile lacks an
    /// email address.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, OAuthError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OAuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let info: UserInfo = response.json().await?;
        let email = info.email.ok_or(OAuthError::MissingField("email"))?;
        // Fall back to the mailbox name when Google omits the display name.
        let name = info
            .name
            .unwrap_or_else(|| email.split('@').next().unwrap_or(&email).to_string());

        Ok(GoogleProfile {
            email,
            name,
            picture: info.picture,
        })
    }
}
