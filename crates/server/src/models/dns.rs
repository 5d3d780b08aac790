//! Parent domains, subdomains and DNS records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freedns_core::{DomainId, Label, RecordId, RecordType, SubdomainId, UserId};

/// An admin-configured parent domain.
///
/// Each parent domain carries its own Cloudflare zone credentials; all
/// subdomain records for the domain are created in that zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Unique domain ID.
    pub id: DomainId,
    /// Fully-qualified domain name (unique, e.g. `freedns.example`).
    pub name: String,
    /// Cloudflare zone ID for this domain.
    pub cloudflare_zone_id: String,
    /// Cloudflare API token scoped to the zone.
    ///
    /// Persisted in the data file but never included in API responses.
    pub cloudflare_api_token: String,
    /// Whether the domain accepts new subdomains.
    pub active: bool,
    /// When the domain was created.
    pub created_at: DateTime<Utc>,
    /// When the domain was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Domain {
    /// Build a fresh, active domain record.
    #[must_use]
    pub fn new(name: String, cloudflare_zone_id: String, cloudflare_api_token: String) -> Self {
        let now = Utc::now();
        Self {
            id: DomainId::generate(),
            name,
            cloudflare_zone_id,
            cloudflare_api_token,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A user-owned subdomain under a parent domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subdomain {
    /// Unique subdomain ID.
    pub id: SubdomainId,
    /// The subdomain label (unique per parent domain).
    pub label: Label,
    /// Parent domain this subdomain belongs to.
    pub domain_id: DomainId,
    /// Owning user.
    pub user_id: UserId,
    /// Whether the subdomain is active.
    pub active: bool,
    /// ID of the record created in Cloudflare, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloudflare_record_id: Option<String>,
    /// When the subdomain was created.
    pub created_at: DateTime<Utc>,
    /// When the subdomain was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Subdomain {
    /// Build a fresh, active subdomain record.
    #[must_use]
    pub fn new(
        label: Label,
        domain_id: DomainId,
        user_id: UserId,
        cloudflare_record_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SubdomainId::generate(),
            label,
            domain_id,
            user_id,
            active: true,
            cloudflare_record_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A DNS record attached to a subdomain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Unique record ID.
    pub id: RecordId,
    /// Record type (A/CNAME/SRV).
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record name relative to the subdomain (`@` for the root).
    pub name: String,
    /// Record value (IPv4 address, CNAME target, SRV target).
    pub value: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// SRV priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// SRV weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    /// SRV port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Subdomain this record belongs to.
    pub subdomain_id: SubdomainId,
    /// Owning user.
    pub user_id: UserId,
    /// ID of the record created in Cloudflare, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloudflare_record_id: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_field_serializes_as_type() {
        let record = DnsRecord {
            id: RecordId::generate(),
            record_type: RecordType::Cname,
            name: "@".to_string(),
            value: "target.example.com".to_string(),
            ttl: RecordType::DEFAULT_TTL,
            priority: None,
            weight: None,
            port: None,
            subdomain_id: SubdomainId::generate(),
            user_id: UserId::generate(),
            cloudflare_record_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "CNAME");
        assert!(json.get("priority").is_none());
    }

    #[test]
    fn test_new_domain_is_active() {
        let domain = Domain::new(
            "freedns.example".to_string(),
            "zone-1".to_string(),
            "token-1".to_string(),
        );
        assert!(domain.active);
    }
}
