//! Domain models for the server.
//!
//! These are the persisted entity types (flat-file JSON) plus the
//! session-stored identity. API request/response DTOs live next to their
//! route handlers.

pub mod dns;
pub mod session;
pub mod transaction;
pub mod user;

pub use dns::{DnsRecord, Domain, Subdomain};
pub use session::{CurrentUser, session_keys};
pub use transaction::Transaction;
pub use user::User;
