//! Double-submit CSRF protection.
//!
//! A random secret lives in the HttpOnly `_csrf` cookie. Tokens handed to the
//! client are `<salt>-<base64url(sha256(salt "-" secret))>`, so any number of
//! tokens can be minted for one secret and checked without server state.
use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng, RngCore};
use sha2::{Digest, Sha256};
use tracing::warn;

use super::cookies::{read_cookie, CSRF_SECRET_COOKIE};
use crate::error::AuthError;

const SECRET_BYTES: usize = 18;
const SALT_LEN: usize = 8;

/// Request headers a token is accepted from, checked in order.
pub const TOKEN_HEADERS: [&str; 4] = ["csrf-token", "xsrf-token", "x-csrf-token", "x-xsrf-token"];

pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}

pub fn create_token(secret: &str) -> String {
    let salt: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect();
    format!("{salt}-{}", digest(&salt, secret))
}

pub fn verify_token(secret: &str, token: &str) -> bool {
    let Some((salt, provided)) = token.split_once('-') else {
        return false;
    };
    if salt.is_empty() {
        return false;
    }
    constant_time_eq(digest(salt, secret).as_bytes(), provided.as_bytes())
}

fn digest(salt: &str, secret: &str) -> String {
    let hash = Sha256::digest(format!("{salt}-{secret}").as_bytes());
    Base64UrlUnpadded::encode_string(&hash)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Rejects state-changing requests that lack a token matching the `_csrf` secret.
pub async fn require_csrf(req: Request, next: Next) -> Result<Response, AuthError> {
    if matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(next.run(req).await);
    }

    let headers = req.headers();
    let secret = read_cookie(headers, CSRF_SECRET_COOKIE);
    let token = TOKEN_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|v| v.to_str().ok());

    let valid = matches!(
        (&secret, token),
        (Some(secret), Some(token)) if verify_token(secret, token)
    );
    if !valid {
        warn!(
            method = %req.method(),
            uri = %req.uri(),
            has_secret = secret.is_some(),
            has_token = token.is_some(),
            "csrf check failed"
        );
        return Err(AuthError::InvalidCsrfToken);
    }

    Ok(next.run(req).await)
}
