use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use super::repo_types::{NewUser, SanitizedIdentity, UserRecord};
use super::validation::validate_new_user;
use crate::error::AuthError;

/// Storage capability the authenticator works against.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Sanitized identity for `id`, or `AuthError::NotFound`.
    async fn find_by_id(&self, id: Uuid) -> Result<SanitizedIdentity, AuthError>;

    /// Full record whose username or email equals `credential`.
    async fn find_by_credential(&self, credential: &str)
        -> Result<Option<UserRecord>, AuthError>;

    /// Validates and inserts a user; uniqueness is enforced atomically.
    async fn create(&self, new_user: NewUser<'_>) -> Result<SanitizedIdentity, AuthError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<SanitizedIdentity, AuthError> {
        let user = sqlx::query_as::<_, SanitizedIdentity>(
            r#"
            SELECT id, username, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        user.ok_or(AuthError::NotFound)
    }

    async fn find_by_credential(
        &self,
        credential: &str,
    ) -> Result<Option<UserRecord>, AuthError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, hashed_password, created_at, updated_at
            FROM users
            WHERE username = $1 OR email = $1
            LIMIT 1
            "#,
        )
        .bind(credential)
        .fetch_optional(&self.db)
        .await
        .context("find user by credential")?;
        Ok(user)
    }

    async fn create(&self, new_user: NewUser<'_>) -> Result<SanitizedIdentity, AuthError> {
        validate_new_user(new_user.username, new_user.email, new_user.hashed_password)?;

        let inserted = sqlx::query_as::<_, SanitizedIdentity>(
            r#"
            INSERT INTO users (username, email, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email
            "#,
        )
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.hashed_password)
        .fetch_one(&self.db)
        .await;

        match inserted {
            Ok(user) => {
                debug!(user_id = %user.id, "user row inserted");
                Ok(user)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!(constraint = ?db_err.constraint(), "unique constraint violated");
                Err(AuthError::Validation(unique_violation_messages(
                    db_err.constraint(),
                )))
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }
}

/// Maps a violated constraint name to the column message callers see.
fn unique_violation_messages(constraint: Option<&str>) -> Vec<String> {
    match constraint {
        Some(c) if c.contains("username") => vec!["username must be unique".into()],
        Some(c) if c.contains("email") => vec!["email must be unique".into()],
        _ => vec!["username and email must be unique".into()],
    }
}
