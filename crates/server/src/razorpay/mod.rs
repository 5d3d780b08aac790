//! Razorpay payments client.
//!
//! Orders are created server-side with basic auth; the browser completes
//! checkout and posts back `(order_id, payment_id, signature)`, which we
//! verify with HMAC-SHA256 before crediting any slots.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::config::RazorpayConfig;

type HmacSha256 = Hmac<Sha256>;

/// Razorpay API base URL.
const BASE_URL: &str = "https://api.razorpay.com/v1";

/// Price of one extra subdomain slot, in rupees.
pub const EXTRA_SLOT_PRICE_RUPEES: u64 = 8;

/// Errors that can occur when talking to Razorpay.
#[derive(Debug, Error)]
pub enum RazorpayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// An order as Razorpay reports it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Order {
    /// Razorpay order ID (`order_...`).
    pub id: String,
    /// Amount in the currency's smallest unit (paise).
    pub amount: u64,
    /// Currency code.
    pub currency: String,
    /// Receipt string we supplied.
    pub receipt: Option<String>,
    /// Order status.
    pub status: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
    notes: serde_json::Value,
}

/// Razorpay API client.
#[derive(Clone)]
pub struct RazorpayClient {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: SecretString,
}

impl RazorpayClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self::with_base_url(BASE_URL.to_string(), config)
    }

    /// Client against a non-default base URL, for tests.
    #[must_use]
    pub fn with_base_url(base_url: String, config: &RazorpayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }

    /// The public key ID, needed by the checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create an order.
    ///
    /// `amount_rupees` is converted to paise on the wire; `notes` travels
    /// with the order and comes back in webhooks and dashboard exports.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError` if the request fails or Razorpay rejects it.
    pub async fn create_order(
        &self,
        amount_rupees: u64,
        currency: &str,
        receipt: &str,
        notes: serde_json::Value,
    ) -> Result<Order, RazorpayError> {
        let url = format!("{}/orders", self.base_url);
        let body = CreateOrderBody {
            amount: amount_rupees * 100,
            currency,
            receipt,
            notes,
        };

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Verify the checkout callback signature.
    ///
    /// Razorpay signs `"{order_id}|{payment_id}"` with the key secret and
    /// sends the hex digest. Comparison is constant-time via the MAC
    /// verifier; a malformed hex signature simply fails verification.
    #[must_use]
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        let Ok(mut mac) = HmacSha256::new_from_slice(self.key_secret.expose_secret().as_bytes())
        else {
            return false;
        };
        mac.update(format!("{order_id}|{payment_id}").as_bytes());

        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        mac.verify_slice(&expected).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn test_config() -> RazorpayConfig {
        RazorpayConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: SecretString::from("rzp_test_secret"),
        }
    }

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[tokio::test]
    async fn test_create_order_converts_to_paise() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/orders")
                .json_body_partial(r#"{"amount":1600,"currency":"INR"}"#);
            then.status(200).json_body(serde_json::json!({
                "id": "order_123",
                "amount": 1600,
                "currency": "INR",
                "receipt": "slots-2",
                "status": "created"
            }));
        });

        let client = RazorpayClient::with_base_url(server.url(""), &test_config());
        let order = client
            .create_order(16, "INR", "slots-2", serde_json::json!({ "slots": 2 }))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(order.id, "order_123");
        assert_eq!(order.amount, 1600);
    }

    #[tokio::test]
    async fn test_create_order_auth_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/orders");
            then.status(401)
                .json_body(serde_json::json!({ "error": { "description": "Authentication failed" } }));
        });

        let client = RazorpayClient::with_base_url(server.url(""), &test_config());
        let err = client
            .create_order(8, "INR", "slots-1", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, RazorpayError::Api { status: 401, .. }));
    }

    #[test]
    fn test_signature_round_trip() {
        let client = RazorpayClient::with_base_url(String::new(), &test_config());
        let signature = sign("rzp_test_secret", "order_123", "pay_456");
        assert!(client.verify_payment_signature("order_123", "pay_456", &signature));
    }

    #[test]
    fn test_tampered_payment_id_rejected() {
        let client = RazorpayClient::with_base_url(String::new(), &test_config());
        let signature = sign("rzp_test_secret", "order_123", "pay_456");
        assert!(!client.verify_payment_signature("order_123", "pay_999", &signature));
    }

    #[test]
    fn test_malformed_signature_rejected() {
        let client = RazorpayClient::with_base_url(String::new(), &test_config());
        assert!(!client.verify_payment_signature("order_123", "pay_456", "not-hex!"));
        assert!(!client.verify_payment_signature("order_123", "pay_456", ""));
    }
}
