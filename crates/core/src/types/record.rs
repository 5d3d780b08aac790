//! DNS record types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Supported DNS record types.
///
/// Only the record types the provisioning flow accepts; everything else is
/// rejected at the API boundary before reaching Cloudflare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// Canonical name record.
    #[serde(rename = "CNAME")]
    Cname,
    /// Service locator record (carries priority, weight and port).
    #[serde(rename = "SRV")]
    Srv,
}

impl RecordType {
    /// Default TTL in seconds applied when the client does not supply one.
    pub const DEFAULT_TTL: u32 = 300;

    /// Default SRV priority.
    pub const DEFAULT_SRV_PRIORITY: u16 = 10;
    /// Default SRV weight.
    pub const DEFAULT_SRV_WEIGHT: u16 = 10;
    /// Default SRV port.
    pub const DEFAULT_SRV_PORT: u16 = 80;

    /// Whether this is an SRV record (requires the `data` payload shape on
    /// the Cloudflare API).
    #[must_use]
    pub const fn is_srv(self) -> bool {
        matches!(self, Self::Srv)
    }

    /// Wire name as used by the Cloudflare API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Cname => "CNAME",
            Self::Srv => "SRV",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
