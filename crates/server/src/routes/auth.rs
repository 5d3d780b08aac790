//! Google OAuth route handlers.
//!
//! Handles the OAuth flow:
//! - Login: redirects to Google's consent screen
//! - Callback: validates state, exchanges the code, upserts the local user
//! - Logout: clears the session

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use freedns_core::Email;
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User, session_keys};
use crate::state::AppState;
use crate::store::users::UserPatch;

/// Query parameters from the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for a token.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect()
}

/// Initiate Google OAuth login.
///
/// Generates a CSRF state, stores it in the session, and redirects to
/// Google's consent screen.
///
/// # Route
///
/// `GET /auth/google/login`
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    let oauth_state = generate_random_string(32);

    if let Err(e) = session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        return Redirect::to("/?error=session").into_response();
    }

    let redirect_uri = format!("{}/auth/google/callback", state.config().base_url);
    let auth_url = state.google().authorization_url(&redirect_uri, &oauth_state);

    Redirect::to(&auth_url).into_response()
}

/// Handle the Google OAuth callback.
///
/// Validates the state parameter, exchanges the code, fetches the profile,
/// upserts the local user and stores their identity in the session.
///
/// # Route
///
/// `GET /auth/google/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = query.error {
        tracing::warn!("Google OAuth error: {}", error);
        return Redirect::to("/?error=google_denied").into_response();
    }

    let Some(code) = query.code else {
        tracing::warn!("Google OAuth callback missing code");
        return Redirect::to("/?error=missing_code").into_response();
    };

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("Google OAuth callback missing state");
        return Redirect::to("/?error=missing_state").into_response();
    };

    let stored_state: Option<String> = session
        .get(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Google OAuth state mismatch");
        return Redirect::to("/?error=invalid_state").into_response();
    }

    // Clear the stored state (one-time use)
    let _ = session.remove::<String>(session_keys::OAUTH_STATE).await;

    let redirect_uri = format!("{}/auth/google/callback", state.config().base_url);

    let access_token = match state.google().exchange_code(&code, &redirect_uri).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to exchange Google OAuth code: {}", e);
            return Redirect::to("/?error=token_exchange").into_response();
        }
    };

    let profile = match state.google().fetch_profile(&access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch Google profile: {}", e);
            return Redirect::to("/?error=profile").into_response();
        }
    };

    let Ok(email) = Email::parse(&profile.email) else {
        tracing::warn!("Google profile carried an unusable email");
        return Redirect::to("/?error=profile").into_response();
    };

    let user = match upsert_user(&state, &email, profile.name, profile.picture).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to upsert user after OAuth: {}", e);
            return Redirect::to("/?error=storage").into_response();
        }
    };

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        is_admin: user.is_admin,
    };
    if let Err(e) = set_current_user(&session, &current).await {
        tracing::error!("Failed to store user in session: {}", e);
        return Redirect::to("/?error=session").into_response();
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "User authenticated via Google");

    Redirect::to("/dashboard").into_response()
}

/// Find-or-create the user for an authenticated profile, refreshing the
/// display name and avatar on every login.
async fn upsert_user(
    state: &AppState,
    email: &Email,
    name: String,
    image: Option<String>,
) -> Result<User, crate::store::StoreError> {
    let store = state.store();
    if let Some(existing) = store.users().find_by_email(email).await? {
        return store
            .users()
            .update(
                existing.id,
                UserPatch {
                    name: Some(name),
                    image,
                    ..UserPatch::default()
                },
            )
            .await;
    }

    let is_admin = state.config().is_admin_email(email);
    store
        .users()
        .create(User::new(email.clone(), name, image, is_admin))
        .await
}

/// Log out the current user.
///
/// # Route
///
/// `POST /auth/logout`
pub async fn logout(session: Session) -> Response {
    let _ = clear_current_user(&session).await;
    clear_sentry_user();
    Redirect::to("/").into_response()
}
