//! Shared newtype wrappers and enums.

pub mod email;
pub mod id;
pub mod label;
pub mod plan;
pub mod record;

pub use email::{Email, EmailError};
pub use id::{DomainId, RecordId, SubdomainId, TransactionId, UserId};
pub use label::{Label, LabelError};
pub use plan::{Plan, TransactionStatus};
pub use record::RecordType;
