//! Request middleware: authentication extractors and sessions.

pub mod auth;
pub mod session;

pub use auth::{OptionalUser, RequireAdmin, RequireUser};
pub use session::create_session_layer;
