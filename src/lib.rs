//! Credential store, authenticator and cookie-based session identity for a
//! small account backend.
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod users;

pub use auth::Authenticator;
pub use error::AuthError;
pub use users::{MemoryUserStore, PgUserStore, SanitizedIdentity, UserStore};
