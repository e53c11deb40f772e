use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo::UserStore;
use super::repo_types::{NewUser, SanitizedIdentity, UserRecord};
use super::validation::validate_new_user;
use crate::error::AuthError;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    usernames: HashMap<String, Uuid>,
    emails: HashMap<String, Uuid>,
}

/// In-process store. Check-and-insert runs under a single write lock.
#[derive(Default)]
pub struct MemoryUserStore {
    tables: RwLock<Tables>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<SanitizedIdentity, AuthError> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&id)
            .map(UserRecord::sanitized)
            .ok_or(AuthError::NotFound)
    }

    async fn find_by_credential(
        &self,
        credential: &str,
    ) -> Result<Option<UserRecord>, AuthError> {
        let tables = self.tables.read().await;
        let id = tables
            .usernames
            .get(credential)
            .or_else(|| tables.emails.get(credential));
        Ok(id.and_then(|id| tables.users.get(id)).cloned())
    }

    async fn create(&self, new_user: NewUser<'_>) -> Result<SanitizedIdentity, AuthError> {
        validate_new_user(new_user.username, new_user.email, new_user.hashed_password)?;

        let mut tables = self.tables.write().await;
        if tables.usernames.contains_key(new_user.username) {
            return Err(AuthError::validation("username must be unique"));
        }
        if tables.emails.contains_key(new_user.email) {
            return Err(AuthError::validation("email must be unique"));
        }

        let record = UserRecord::new(
            Uuid::new_v4(),
            new_user.username.to_owned(),
            new_user.email.to_owned(),
            new_user.hashed_password.to_owned(),
        );
        let identity = record.sanitized();
        tables.usernames.insert(record.username.clone(), record.id);
        tables.emails.insert(record.email.clone(), record.id);
        tables.users.insert(record.id, record);
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERIFIER: &str = "$2b$04$abcdefghijklmnopqrstuuGq3S0zJ2zB9b2Kq0nZ3yQ0m1u8Zb6W6";

    fn new_user<'a>(username: &'a str, email: &'a str) -> NewUser<'a> {
        NewUser {
            username,
            email,
            hashed_password: VERIFIER,
        }
    }

    #[tokio::test]
    async fn create_then_find_by_id_and_credential() {
        let store = MemoryUserStore::new();
        let created = store
            .create(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(store.find_by_id(created.id).await.unwrap(), created);

        let by_name = store.find_by_credential("alice").await.unwrap().unwrap();
        let by_email = store
            .find_by_credential("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_name.verifier(), VERIFIER);
    }

    #[tokio::test]
    async fn unknown_lookups() {
        let store = MemoryUserStore::new();
        assert!(matches!(
            store.find_by_id(Uuid::new_v4()).await,
            Err(AuthError::NotFound)
        ));
        assert!(store.find_by_credential("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_or_email_is_rejected() {
        let store = MemoryUserStore::new();
        store.create(new_user("alice", "alice@example.com")).await.unwrap();

        let err = store
            .create(new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref e) if e[0] == "username must be unique"));

        let err = store
            .create(new_user("alice2", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref e) if e[0] == "email must be unique"));

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn invalid_input_writes_nothing() {
        let store = MemoryUserStore::new();
        let err = store.create(new_user("abc", "bad")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref e) if e.len() == 2));
        assert!(store.is_empty().await);
    }
}
