//! HTTP glue over the authenticator. The embedding service mounts these
//! handlers and layers `csrf::require_csrf` over its state-changing routes.
use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, HeaderMap},
    Json,
};
use tracing::{debug, info, instrument};

use super::{
    cookies::{
        build_clear_cookie, build_set_cookie, read_cookie, CookieOptions, CSRF_SECRET_COOKIE,
        CSRF_TOKEN_COOKIE, SESSION_COOKIE,
    },
    csrf,
    dto::{
        CsrfResponse, LoginRequest, MessageResponse, SessionResponse, SignupRequest,
        UserResponse,
    },
    extractors::{AuthUser, RestoredUser},
    jwt::SessionKeys,
};
use crate::{error::AuthError, state::AppState, users::SanitizedIdentity};

/// Issues a CSRF token, minting the `_csrf` secret on first visit.
#[instrument(skip(state, headers))]
pub async fn restore_csrf(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (HeaderMap, Json<CsrfResponse>) {
    let env = state.config.environment;
    let mut out = HeaderMap::new();

    let secret = match read_cookie(&headers, CSRF_SECRET_COOKIE) {
        Some(secret) => secret,
        None => {
            let secret = csrf::generate_secret();
            out.append(
                SET_COOKIE,
                build_set_cookie(CSRF_SECRET_COOKIE, &secret, CookieOptions::for_env(env, true)),
            );
            debug!("csrf secret issued");
            secret
        }
    };

    let token = csrf::create_token(&secret);
    out.append(
        SET_COOKIE,
        build_set_cookie(CSRF_TOKEN_COOKIE, &token, CookieOptions::for_env(env, false)),
    );
    (out, Json(CsrfResponse { xsrf_token: token }))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(HeaderMap, Json<UserResponse>), AuthError> {
    let user = state
        .auth
        .signup(payload.username.trim(), payload.email.trim(), &payload.password)
        .await?;
    let headers = session_cookie(&state, &user)?;
    Ok((headers, Json(UserResponse { user })))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<UserResponse>), AuthError> {
    let user = state
        .auth
        .login(payload.credential.trim(), &payload.password)
        .await?;
    let headers = session_cookie(&state, &user)?;
    Ok((headers, Json(UserResponse { user })))
}

pub async fn logout() -> (HeaderMap, Json<MessageResponse>) {
    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, build_clear_cookie(SESSION_COOKIE));
    (headers, Json(MessageResponse { message: "success" }))
}

pub async fn restore_session(RestoredUser(user): RestoredUser) -> Json<SessionResponse> {
    Json(SessionResponse { user })
}

pub async fn current_user(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse { user })
}

fn session_cookie(state: &AppState, user: &SanitizedIdentity) -> Result<HeaderMap, AuthError> {
    let keys = SessionKeys::from_ref(state);
    let token = keys.sign(user.id)?;
    let opts = CookieOptions::for_env(state.config.environment, true).max_age(keys.ttl);

    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, build_set_cookie(SESSION_COOKIE, &token, opts));
    info!(user_id = %user.id, "session cookie issued");
    Ok(headers)
}
