//! Cloudflare DNS API client.
//!
//! Each parent domain carries its own zone ID and API token, so clients are
//! built per-domain rather than held in application state. All calls go
//! through the v4 REST API, whose responses share a
//! `{ success, errors, result }` envelope.

use freedns_core::RecordType;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cloudflare API base URL.
const BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Errors that can occur when talking to Cloudflare.
#[derive(Debug, Error)]
pub enum CloudflareError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API answered 200 but the envelope reported failure.
    #[error("Cloudflare rejected the request: {0}")]
    Rejected(String),

    /// Failed to build the client or parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Response envelope shared by all v4 endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<EnvelopeError>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    code: i64,
    message: String,
}

/// SRV payload: Cloudflare wants the value split into structured fields.
#[derive(Debug, Serialize)]
struct SrvData<'a> {
    priority: u16,
    weight: u16,
    port: u16,
    target: &'a str,
}

/// Request body for record creation and updates.
#[derive(Debug, Serialize)]
struct RecordPayload<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<SrvData<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxied: Option<bool>,
}

/// A DNS record to create or update, in application terms.
#[derive(Debug, Clone)]
pub struct RecordSpec {
    /// Record type.
    pub record_type: RecordType,
    /// Fully qualified record name.
    pub name: String,
    /// Record value: an IP for A, a hostname for CNAME, the SRV target.
    pub value: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// SRV priority.
    pub priority: Option<u16>,
    /// SRV weight.
    pub weight: Option<u16>,
    /// SRV port.
    pub port: Option<u16>,
}

/// A record as Cloudflare reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareRecord {
    /// Cloudflare's record ID.
    pub id: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: String,
    /// Fully qualified record name.
    pub name: String,
}

/// Zone details, returned by the credential probe.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneInfo {
    /// Zone ID.
    pub id: String,
    /// Zone name (the apex domain).
    pub name: String,
    /// Zone status, e.g. `active`.
    pub status: String,
}

/// Cloudflare DNS client scoped to a single zone.
#[derive(Clone)]
pub struct CloudflareClient {
    client: reqwest::Client,
    base_url: String,
    zone_id: String,
}

impl CloudflareClient {
    /// Create a client for a zone with its API token.
    ///
    /// # Errors
    ///
    /// Returns `CloudflareError::Parse` if the token is not a valid header
    /// value.
    pub fn new(zone_id: &str, api_token: &SecretString) -> Result<Self, CloudflareError> {
        Self::with_base_url(BASE_URL.to_string(), zone_id, api_token)
    }

    /// Create a client against a non-default base URL, for tests.
    ///
    /// # Errors
    ///
    /// Returns `CloudflareError::Parse` if the token is not a valid header
    /// value.
    pub fn with_base_url(
        base_url: String,
        zone_id: &str,
        api_token: &SecretString,
    ) -> Result<Self, CloudflareError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", api_token.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| CloudflareError::Parse(format!("invalid API token: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url,
            zone_id: zone_id.to_string(),
        })
    }

    /// Fetch zone details, verifying the zone ID and token are usable.
    ///
    /// # Errors
    ///
    /// Returns `CloudflareError` if the credentials are rejected or the
    /// request fails.
    pub async fn probe_zone(&self) -> Result<ZoneInfo, CloudflareError> {
        let url = format!("{}/zones/{}", self.base_url, self.zone_id);
        let response = self.client.get(&url).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// Create a DNS record in the zone. Returns Cloudflare's record ID.
    ///
    /// # Errors
    ///
    /// Returns `CloudflareError` if the request fails or is rejected.
    pub async fn create_record(&self, spec: &RecordSpec) -> Result<String, CloudflareError> {
        let url = format!("{}/zones/{}/dns_records", self.base_url, self.zone_id);
        let response = self
            .client
            .post(&url)
            .json(&Self::payload(spec))
            .send()
            .await?;
        let record: CloudflareRecord = Self::unwrap_envelope(response).await?;
        Ok(record.id)
    }

    /// Fetch a single DNS record by its Cloudflare ID.
    ///
    /// # Errors
    ///
    /// Returns `CloudflareError` if the record does not exist or the request
    /// fails.
    pub async fn get_record(&self, record_id: &str) -> Result<CloudflareRecord, CloudflareError> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, self.zone_id, record_id
        );
        let response = self.client.get(&url).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// Overwrite an existing DNS record.
    ///
    /// # Errors
    ///
    /// Returns `CloudflareError` if the request fails or is rejected.
    pub async fn update_record(
        &self,
        record_id: &str,
        spec: &RecordSpec,
    ) -> Result<(), CloudflareError> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, self.zone_id, record_id
        );
        let response = self
            .client
            .put(&url)
            .json(&Self::payload(spec))
            .send()
            .await?;
        Self::unwrap_envelope::<CloudflareRecord>(response).await?;
        Ok(())
    }

    /// Delete a DNS record from the zone.
    ///
    /// # Errors
    ///
    /// Returns `CloudflareError` if the request fails or is rejected.
    pub async fn delete_record(&self, record_id: &str) -> Result<(), CloudflareError> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, self.zone_id, record_id
        );
        let response = self.client.delete(&url).send().await?;

        #[derive(Debug, Deserialize)]
        struct Deleted {
            #[allow(dead_code)]
            id: String,
        }
        Self::unwrap_envelope::<Deleted>(response).await?;
        Ok(())
    }

    /// List the zone's records, optionally filtered by name.
    ///
    /// # Errors
    ///
    /// Returns `CloudflareError` if the request fails or is rejected.
    pub async fn list_records(
        &self,
        name: Option<&str>,
    ) -> Result<Vec<CloudflareRecord>, CloudflareError> {
        let mut url = format!("{}/zones/{}/dns_records", self.base_url, self.zone_id);
        if let Some(name) = name {
            url = format!("{url}?name={}", urlencoding::encode(name));
        }
        let response = self.client.get(&url).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// Build the wire payload for a record spec.
    ///
    /// SRV records move the value into the structured `data` object; A and
    /// CNAME records use `content` and are never proxied, so the hostname
    /// resolves to what the user configured.
    fn payload(spec: &RecordSpec) -> RecordPayload<'_> {
        if spec.record_type.is_srv() {
            RecordPayload {
                record_type: spec.record_type.as_str(),
                name: &spec.name,
                ttl: spec.ttl,
                content: None,
                data: Some(SrvData {
                    priority: spec.priority.unwrap_or(RecordType::DEFAULT_SRV_PRIORITY),
                    weight: spec.weight.unwrap_or(RecordType::DEFAULT_SRV_WEIGHT),
                    port: spec.port.unwrap_or(RecordType::DEFAULT_SRV_PORT),
                    target: &spec.value,
                }),
                proxied: None,
            }
        } else {
            RecordPayload {
                record_type: spec.record_type.as_str(),
                name: &spec.name,
                ttl: spec.ttl,
                content: Some(&spec.value),
                data: None,
                proxied: Some(false),
            }
        }
    }

    /// Check the HTTP status, then the envelope's `success` flag, and pull
    /// out `result`.
    async fn unwrap_envelope<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CloudflareError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .map_or(body.clone(), |env| Self::join_errors(&env.errors));
            return Err(CloudflareError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| CloudflareError::Parse(e.to_string()))?;
        if !envelope.success {
            return Err(CloudflareError::Rejected(Self::join_errors(
                &envelope.errors,
            )));
        }
        envelope
            .result
            .ok_or_else(|| CloudflareError::Parse("envelope missing result".to_string()))
    }

    fn join_errors(errors: &[EnvelopeError]) -> String {
        if errors.is_empty() {
            return "unknown error".to_string();
        }
        errors
            .iter()
            .map(|e| format!("{} ({})", e.message, e.code))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
