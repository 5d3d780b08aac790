//! freedns server - subdomain provisioning service.
//!
//! Serves the JSON API on the configured host/port.
//!
//! # Architecture
//!
//! - Axum web framework with session-cookie authentication
//! - Google OAuth for login
//! - Flat-file JSON persistence under the configured data directory
//! - Cloudflare DNS API for record management (per-domain credentials)
//! - Razorpay for purchasing extra subdomain slots

#![cfg_attr(not(test), forbid(unsafe_code))]

use freedns_server::app::{build_router, shutdown_signal};
use freedns_server::config::ServerConfig;
use freedns_server::state::AppState;
use freedns_server::store::JsonStore;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "freedns_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Initialize the flat-file store (creates the data directory and empty
    // data files on first run)
    let store = JsonStore::new(config.data_dir.clone());
    store.init().await.expect("Failed to initialize data store");
    tracing::info!(data_dir = %store.data_dir().display(), "Data store initialized");

    let addr = config.socket_addr();
    let state = AppState::new(config, store);
    let app = build_router(state);

    tracing::info!("freedns server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
