use std::sync::Arc;

use anyhow::Context;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::password::{hash_password, verify_password};
use crate::error::AuthError;
use crate::users::{NewUser, SanitizedIdentity, UserStore};

/// Signup and login over a `UserStore`. Holds no per-request state.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn UserStore>,
    cost: u32,
    // Verified against when the credential is unknown, so both failure paths cost a hash.
    decoy: Arc<str>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn UserStore>, cost: u32) -> anyhow::Result<Self> {
        let decoy = hash_password(&Uuid::new_v4().to_string(), cost)?;
        Ok(Self {
            store,
            cost,
            decoy: decoy.into(),
        })
    }

    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<SanitizedIdentity, AuthError> {
        let hashed_password = self.hash(password).await?;
        let user = self
            .store
            .create(NewUser {
                username,
                email,
                hashed_password: &hashed_password,
            })
            .await?;
        info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        credential: &str,
        password: &str,
    ) -> Result<SanitizedIdentity, AuthError> {
        let Some(record) = self.store.find_by_credential(credential).await? else {
            let _ = self.verify(password, self.decoy.to_string()).await;
            warn!("login for unknown credential");
            return Err(AuthError::AuthenticationFailed);
        };

        match self.verify(password, record.verifier().to_owned()).await {
            Ok(true) => {
                info!(user_id = %record.id, "user logged in");
                Ok(record.sanitized())
            }
            Ok(false) => {
                warn!(user_id = %record.id, "login invalid password");
                Err(AuthError::AuthenticationFailed)
            }
            Err(e) => {
                warn!(user_id = %record.id, error = %e, "stored verifier unusable");
                Err(AuthError::AuthenticationFailed)
            }
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<SanitizedIdentity, AuthError> {
        self.store.find_by_id(id).await
    }

    async fn hash(&self, password: &str) -> anyhow::Result<String> {
        let plain = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash_password(&plain, cost))
            .await
            .context("hash task panicked")?
    }

    async fn verify(&self, password: &str, verifier: String) -> anyhow::Result<bool> {
        let plain = password.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&plain, &verifier))
            .await
            .context("verify task panicked")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::MIN_COST;
    use crate::users::MemoryUserStore;

    fn authenticator() -> (Authenticator, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        let auth = Authenticator::new(store.clone(), MIN_COST).expect("authenticator");
        (auth, store)
    }

    #[tokio::test]
    async fn alice_scenario() {
        let (auth, _) = authenticator();
        let alice = auth
            .signup("alice", "alice@example.com", "Secret123!")
            .await
            .expect("signup");
        assert_eq!(alice.username, "alice");
        assert_eq!(alice.email, "alice@example.com");

        let by_name = auth.login("alice", "Secret123!").await.expect("login");
        assert_eq!(by_name, alice);

        let wrong = auth.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(wrong, AuthError::AuthenticationFailed));

        let by_email = auth
            .login("alice@example.com", "Secret123!")
            .await
            .expect("login by email");
        assert_eq!(by_email, alice);
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let (auth, _) = authenticator();
        auth.signup("bobby", "bob@example.com", "hunter22").await.unwrap();

        let wrong_password = auth.login("bobby", "nope").await.unwrap_err();
        let unknown_user = auth.login("nobody", "hunter22").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(wrong_password.status_code(), unknown_user.status_code());
        assert_eq!(
            serde_json::to_value(wrong_password.body()).unwrap(),
            serde_json::to_value(unknown_user.body()).unwrap()
        );
    }

    #[tokio::test]
    async fn username_boundaries() {
        let (auth, _) = authenticator();
        let four = auth.signup("abcd", "four@example.com", "pw").await;
        let thirty = auth
            .signup(&"b".repeat(30), "thirty@example.com", "pw")
            .await;
        assert!(four.is_ok());
        assert!(thirty.is_ok());

        let three = auth.signup("abc", "three@example.com", "pw").await;
        let thirty_one = auth
            .signup(&"c".repeat(31), "thirtyone@example.com", "pw")
            .await;
        assert!(matches!(three, Err(AuthError::Validation(_))));
        assert!(matches!(thirty_one, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn username_may_not_be_an_email() {
        let (auth, store) = authenticator();
        let err = auth
            .signup("carol@example.com", "carol@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn second_signup_with_same_username_fails() {
        let (auth, store) = authenticator();
        auth.signup("dave", "dave@example.com", "pw").await.unwrap();
        let err = auth
            .signup("dave", "dave2@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref e) if e == &["username must be unique"]));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn identical_passwords_get_distinct_verifiers() {
        let (auth, store) = authenticator();
        auth.signup("erin", "erin@example.com", "same-pw").await.unwrap();
        auth.signup("frank", "frank@example.com", "same-pw").await.unwrap();

        let erin = store.find_by_credential("erin").await.unwrap().unwrap();
        let frank = store.find_by_credential("frank").await.unwrap().unwrap();
        assert_ne!(erin.verifier(), frank.verifier());
        assert_ne!(erin.verifier(), "same-pw");

        assert!(auth.login("erin", "same-pw").await.is_ok());
        assert!(auth.login("frank", "same-pw").await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_duplicate_signups_admit_one() {
        let (auth, store) = authenticator();
        let (a, b) = tokio::join!(
            auth.signup("grace", "grace1@example.com", "pw"),
            auth.signup("grace", "grace2@example.com", "pw"),
        );
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn find_by_id_round_trips_and_reports_missing() {
        let (auth, _) = authenticator();
        let user = auth.signup("heidi", "heidi@example.com", "pw").await.unwrap();
        assert_eq!(auth.find_by_id(user.id).await.unwrap(), user);
        assert!(matches!(
            auth.find_by_id(Uuid::new_v4()).await,
            Err(AuthError::NotFound)
        ));
    }
}
