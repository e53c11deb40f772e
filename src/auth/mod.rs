pub mod cookies;
pub mod csrf;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod services;

pub use extractors::{AuthUser, RestoredUser};
pub use services::Authenticator;
