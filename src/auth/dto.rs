use serde::{Deserialize, Serialize};

use crate::users::SanitizedIdentity;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login. `credential` is a username or an email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub credential: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: SanitizedIdentity,
}

/// Session restore; `user` is null for anonymous requests.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<SanitizedIdentity>,
}

#[derive(Debug, Serialize)]
pub struct CsrfResponse {
    #[serde(rename = "XSRF-Token")]
    pub xsrf_token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
