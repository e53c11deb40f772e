//! `Set-Cookie` construction and `Cookie` header parsing.
use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderValue};
use tracing::warn;

use crate::config::Environment;

pub const SESSION_COOKIE: &str = "token";
pub const CSRF_SECRET_COOKIE: &str = "_csrf";
pub const CSRF_TOKEN_COOKIE: &str = "XSRF-TOKEN";

#[derive(Debug, Clone, Copy)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site_lax: bool,
    pub max_age: Option<Duration>,
}

impl CookieOptions {
    /// Secure and SameSite=Lax are only set in production.
    pub fn for_env(env: Environment, http_only: bool) -> Self {
        let production = env.is_production();
        Self {
            http_only,
            secure: production,
            same_site_lax: production,
            max_age: None,
        }
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }
}

pub fn build_set_cookie(name: &str, value: &str, opts: CookieOptions) -> HeaderValue {
    let mut cookie = format!("{name}={value}; Path=/");
    if let Some(max_age) = opts.max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age.as_secs()));
    }
    if opts.http_only {
        cookie.push_str("; HttpOnly");
    }
    if opts.secure {
        cookie.push_str("; Secure");
    }
    if opts.same_site_lax {
        cookie.push_str("; SameSite=Lax");
    }
    header_value(name, cookie)
}

pub fn build_clear_cookie(name: &str) -> HeaderValue {
    header_value(name, format!("{name}=; Path=/; Max-Age=0"))
}

// Values are base64url or JWTs; an unencodable one is sent empty and logged.
fn header_value(name: &str, cookie: String) -> HeaderValue {
    HeaderValue::from_str(&cookie).unwrap_or_else(|e| {
        warn!(cookie = name, error = %e, "cookie not encodable as a header; sending empty");
        HeaderValue::from_static("")
    })
}

/// First value of cookie `name` across all `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_cookie_is_not_secure() {
        let opts = CookieOptions::for_env(Environment::Development, true)
            .max_age(Duration::from_secs(60));
        let v = build_set_cookie("token", "abc", opts);
        assert_eq!(v.to_str().unwrap(), "token=abc; Path=/; Max-Age=60; HttpOnly");
    }

    #[test]
    fn production_cookie_is_secure_and_lax() {
        let opts = CookieOptions::for_env(Environment::Production, false);
        let v = build_set_cookie("XSRF-TOKEN", "t", opts);
        assert_eq!(v.to_str().unwrap(), "XSRF-TOKEN=t; Path=/; Secure; SameSite=Lax");
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert_eq!(
            build_clear_cookie("token").to_str().unwrap(),
            "token=; Path=/; Max-Age=0"
        );
    }

    #[test]
    fn unencodable_value_yields_empty_header() {
        let opts = CookieOptions::for_env(Environment::Development, true);
        let v = build_set_cookie("token", "bad\nvalue", opts);
        assert!(v.is_empty());
    }

    #[test]
    fn reads_named_cookie_from_any_header() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1; _csrf=sec"));
        headers.append(header::COOKIE, HeaderValue::from_static("token=jwt.value.here"));
        assert_eq!(read_cookie(&headers, "_csrf").as_deref(), Some("sec"));
        assert_eq!(read_cookie(&headers, "token").as_deref(), Some("jwt.value.here"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert_eq!(read_cookie(&headers, "token"), None);
    }
}
