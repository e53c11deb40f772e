use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Public-safe view of a user. The only shape that leaves the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SanitizedIdentity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Full stored row, verifier included. Only the login path reads one.
#[derive(Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    hashed_password: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl UserRecord {
    pub fn new(id: Uuid, username: String, email: String, hashed_password: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id,
            username,
            email,
            hashed_password,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn verifier(&self) -> &str {
        &self.hashed_password
    }

    pub fn sanitized(&self) -> SanitizedIdentity {
        SanitizedIdentity {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("hashed_password", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Input to `UserStore::create`; the verifier is already hashed.
#[derive(Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub hashed_password: &'a str,
}
