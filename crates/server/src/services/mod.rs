//! Application services.

pub mod oauth;
pub mod quota;

pub use oauth::{GoogleOAuthClient, GoogleProfile, OAuthError};
