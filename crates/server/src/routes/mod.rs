//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check
//!
//! # Auth (Google OAuth)
//! GET  /auth/google/login           - Redirect to Google consent screen
//! GET  /auth/google/callback        - Handle OAuth callback, upsert user
//! POST /auth/logout                 - Clear the session
//!
//! # Dashboard (requires user session)
//! GET    /api/dashboard/stats       - Subdomain/record counts, plan
//! GET    /api/dashboard/domains     - Active parent domains
//! GET    /api/dashboard/subdomains  - The user's subdomains
//! POST   /api/dashboard/subdomains  - Create subdomain + DNS record
//! DELETE /api/dashboard/subdomains  - Delete an owned subdomain
//!
//! # Payments (requires user session)
//! POST /api/payment/create-order    - Create a Razorpay order
//! POST /api/payment/verify          - Verify checkout signature, credit slots
//!
//! # Transactions (requires user session; admin where noted)
//! GET  /api/transactions            - Own transactions (?admin=true: all)
//! GET  /api/transactions/{id}       - One transaction (owner or admin)
//! GET  /api/transactions/user/{user} - By user id or email (admin)
//! GET  /api/transactions/limit      - Caller's effective limit
//! GET  /api/transactions/limit/{user} - A user's limit (admin)
//! POST /api/transactions/limit      - Set a user's limit (admin)
//! POST /api/transactions/reset      - Reset a user's limit (admin)
//! GET  /api/transactions/stats      - Revenue/status totals (admin)
//!
//! # Admin (requires admin session)
//! GET    /api/admin/stats           - Entity counts
//! GET    /api/admin/users           - Users with subdomain counts
//! PUT    /api/admin/users           - Update a user's base limit
//! DELETE /api/admin/users           - Delete a user (cascades)
//! GET    /api/admin/domains         - Domains with subdomain counts
//! POST   /api/admin/domains         - Verify credentials, create domain
//! DELETE /api/admin/domains         - Delete a domain (cascades)
//! POST   /api/admin/domains/test    - Probe a zone-id/token pair
//! GET    /api/admin/subdomains      - All subdomains with owner detail
//! DELETE /api/admin/subdomains      - Delete any subdomain
//! GET    /api/admin/debug           - Storage and configuration status
//! ```

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod payment;
pub mod transactions;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/google/login", get(auth::login))
        .route("/google/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
}

/// Create the dashboard API router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/domains", get(dashboard::list_domains))
        .route(
            "/subdomains",
            get(dashboard::list_subdomains)
                .post(dashboard::create_subdomain)
                .delete(dashboard::delete_subdomain),
        )
}

/// Create the payment API router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(payment::create_order))
        .route("/verify", post(payment::verify))
}

/// Create the transactions API router.
pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(transactions::list))
        .route("/stats", get(transactions::stats))
        .route(
            "/limit",
            get(transactions::own_limit).post(transactions::set_limit),
        )
        .route("/limit/{user}", get(transactions::user_limit))
        .route("/reset", post(transactions::reset_limit))
        .route("/user/{user}", get(transactions::for_user))
        .route("/{id}", get(transactions::by_id))
}

/// Create the admin API router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route(
            "/users",
            get(admin::list_users)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        .route(
            "/domains",
            get(admin::list_domains)
                .post(admin::create_domain)
                .delete(admin::delete_domain),
        )
        .route("/domains/test", post(admin::test_domain))
        .route(
            "/subdomains",
            get(admin::list_subdomains).delete(admin::delete_subdomain),
        )
        .route("/debug", get(admin::debug))
}

/// Assemble all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/api/dashboard", dashboard_routes())
        .nest("/api/payment", payment_routes())
        .nest("/api/transactions", transaction_routes())
        .nest("/api/admin", admin_routes())
}
