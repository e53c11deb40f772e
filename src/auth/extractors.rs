use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::{debug, warn};

use super::cookies::{read_cookie, SESSION_COOKIE};
use super::jwt::SessionKeys;
use crate::{error::AuthError, state::AppState, users::SanitizedIdentity};

/// Identity behind the session cookie, if any. Rejects only when storage fails.
pub struct RestoredUser(pub Option<SanitizedIdentity>);

/// Identity behind the session cookie; rejects anonymous requests.
pub struct AuthUser(pub SanitizedIdentity);

/// `Ok(None)` for anonymous or stale sessions; storage failures propagate.
async fn restore(
    parts: &Parts,
    state: &AppState,
) -> Result<Option<SanitizedIdentity>, AuthError> {
    let Some(token) = read_cookie(&parts.headers, SESSION_COOKIE) else {
        return Ok(None);
    };
    let keys = SessionKeys::from_ref(state);
    let claims = match keys.verify(&token) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "session token rejected");
            return Ok(None);
        }
    };
    match state.auth.find_by_id(claims.sub).await {
        Ok(user) => Ok(Some(user)),
        Err(AuthError::NotFound) => {
            warn!(user_id = %claims.sub, "session user no longer exists");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RestoredUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RestoredUser(restore(parts, state).await?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        restore(parts, state)
            .await?
            .map(AuthUser)
            .ok_or(AuthError::Unauthenticated)
    }
}
