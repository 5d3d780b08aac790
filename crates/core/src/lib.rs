//! freedns core - Shared types library.
//!
//! This crate provides common types used across all freedns components:
//! - `server` - The public web service (dashboard, payments, admin API)
//! - `cli` - Command-line tools for data-directory and domain management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, subdomain
//!   labels, DNS record types, plans and transaction statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
