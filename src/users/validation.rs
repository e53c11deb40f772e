//! Format rules a user record must satisfy before it is stored.
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AuthError;

pub const USERNAME_MIN: usize = 4;
pub const USERNAME_MAX: usize = 30;
pub const EMAIL_MIN: usize = 3;
pub const EMAIL_MAX: usize = 256;
pub const VERIFIER_LEN: usize = 60;

/// `local@domain.tld` where the top-level label is at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

/// Checks every rule and reports all violations at once.
pub fn validate_new_user(
    username: &str,
    email: &str,
    hashed_password: &str,
) -> Result<(), AuthError> {
    let mut errors = Vec::new();

    let username_len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&username_len) {
        errors.push(format!(
            "Username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        ));
    }
    if is_valid_email(username) {
        errors.push("Username cannot be an email".to_string());
    }

    let email_len = email.chars().count();
    if !(EMAIL_MIN..=EMAIL_MAX).contains(&email_len) {
        errors.push(format!(
            "Email must be between {EMAIL_MIN} and {EMAIL_MAX} characters"
        ));
    }
    if !is_valid_email(email) {
        errors.push("Email must be a valid email".to_string());
    }

    if hashed_password.len() != VERIFIER_LEN {
        errors.push(format!(
            "Password verifier must be exactly {VERIFIER_LEN} characters"
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}
