//! freedns server - subdomain provisioning web service.
//!
//! Users authenticate with Google OAuth, receive a free quota of subdomains,
//! create DNS records (A/CNAME/SRV) against admin-configured parent domains
//! through the Cloudflare API, and may purchase additional subdomain slots
//! via Razorpay. An admin API covers user, domain, transaction and subdomain
//! management.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Unified `AppError` with Sentry capture
//! - [`store`] - Flat-file JSON persistence (users, domains, subdomains,
//!   DNS records, transactions)
//! - [`cloudflare`] - Cloudflare DNS API client
//! - [`razorpay`] - Razorpay orders client and signature verification
//! - [`services`] - Google OAuth client and quota arithmetic
//! - [`middleware`] - Session layer and auth extractors
//! - [`routes`] - HTTP route handlers
//! - [`state`] - Shared application state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod cloudflare;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod razorpay;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
