//! Error taxonomy shared by the store, the authenticator and the HTTP glue.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// One message per violated rule. Nothing was written.
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Deliberately identical for unknown credential and wrong password.
    #[error("The provided credentials were invalid")]
    AuthenticationFailed,

    #[error("Not found")]
    NotFound,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid CSRF token")]
    InvalidCsrfToken,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON body sent for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub title: &'static str,
    pub message: String,
    pub errors: Vec<String>,
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        AuthError::Validation(vec![message.into()])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::AuthenticationFailed | AuthError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCsrfToken => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            AuthError::Validation(errors) => ErrorBody {
                title: "Validation Error",
                message: "Validation error".into(),
                errors: errors.clone(),
            },
            AuthError::AuthenticationFailed => ErrorBody {
                title: "Login failed",
                message: "Login failed".into(),
                errors: vec!["The provided credentials were invalid.".into()],
            },
            AuthError::NotFound => ErrorBody {
                title: "Resource Not Found",
                message: "The requested resource could not be found".into(),
                errors: vec!["The requested resource was not found".into()],
            },
            AuthError::Unauthenticated => ErrorBody {
                title: "Authentication required",
                message: "Authentication required".into(),
                errors: vec!["Authentication required".into()],
            },
            AuthError::InvalidCsrfToken => ErrorBody {
                title: "Invalid CSRF token",
                message: "invalid csrf token".into(),
                errors: vec!["invalid csrf token".into()],
            },
            AuthError::Internal(e) => ErrorBody {
                title: "Server Error",
                // Detailed only in debug builds
                message: if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    "An internal server error occurred".into()
                },
                errors: Vec::new(),
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
