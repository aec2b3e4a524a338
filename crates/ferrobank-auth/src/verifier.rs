//! Credential verification.
//!
//! Checks presented user and client credentials against their stores and
//! produces the [`Principal`] consumed by token issuance.
//!
//! # Enumeration resistance
//!
//! Unknown identity and wrong secret are indistinguishable to the caller:
//! both return [`AuthError::BadCredentials`], and the unknown-identity path
//! burns an Argon2 verification against a fixed dummy hash so the two
//! failures take comparable time.

use std::sync::Arc;

use tracing::warn;

use crate::AuthResult;
use crate::error::AuthError;
use crate::principal::Principal;
use crate::secret;
use crate::storage::client::ClientStorage;
use crate::storage::user::UserStorage;

/// Verifies user and client credentials.
pub struct CredentialVerifier {
    users: Arc<dyn UserStorage>,
    clients: Arc<dyn ClientStorage>,
    dummy_hash: String,
}

impl CredentialVerifier {
    /// Creates a new verifier.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Encoding`] if the dummy hash used for timing
    /// equalization cannot be computed.
    pub fn new(users: Arc<dyn UserStorage>, clients: Arc<dyn ClientStorage>) -> AuthResult<Self> {
        let dummy_hash = secret::hash_secret("ferrobank.timing.equalizer")?;
        Ok(Self {
            users,
            clients,
            dummy_hash,
        })
    }

    /// Verifies a user's e-mail and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::BadCredentials`] when the identity is unknown
    /// or the password does not match; the two cases are not
    /// distinguishable from the outside.
    pub async fn verify_user(&self, identity: &str, raw_password: &str) -> AuthResult<Principal> {
        match self.users.find_by_email(identity).await? {
            Some(user) => {
                if secret::verify_secret(raw_password, &user.password_hash) {
                    Ok(user.principal())
                } else {
                    warn!(identity, "user credential verification failed");
                    Err(AuthError::BadCredentials)
                }
            }
            None => {
                self.burn_verification(raw_password);
                warn!(identity, "user credential verification failed");
                Err(AuthError::BadCredentials)
            }
        }
    }

    /// Verifies a machine client's id and secret.
    ///
    /// Same contract as [`verify_user`](Self::verify_user).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::BadCredentials`] when the client is unknown or
    /// the secret does not match.
    pub async fn verify_client(&self, client_id: &str, raw_secret: &str) -> AuthResult<Principal> {
        match self.clients.find_by_id(client_id).await? {
            Some(client) => {
                if secret::verify_secret(raw_secret, &client.secret_hash) {
                    Ok(Principal::client(
                        client.client_id.clone(),
                        client.authorities(),
                    ))
                } else {
                    warn!(client_id, "client credential verification failed");
                    Err(AuthError::BadCredentials)
                }
            }
            None => {
                self.burn_verification(raw_secret);
                warn!(client_id, "client credential verification failed");
                Err(AuthError::BadCredentials)
            }
        }
    }

    /// Spends one Argon2 verification against the dummy hash so unknown
    /// identities cost the same as wrong secrets.
    fn burn_verification(&self, presented: &str) {
        let _ = secret::verify_secret(presented, &self.dummy_hash);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use async_trait::async_trait;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::storage::user::{Role, User};
    use crate::types::client::{Client, Scope};

    struct MapUserStorage(RwLock<HashMap<Uuid, User>>);

    #[async_trait]
    impl UserStorage for MapUserStorage {
        async fn find_by_id(&self, user_id: Uuid) -> AuthResult<Option<User>> {
            Ok(self.0.read().unwrap().get(&user_id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
            Ok(self
                .0
                .read()
                .unwrap()
                .values()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn exists_by_email(&self, email: &str) -> AuthResult<bool> {
            Ok(self.find_by_email(email).await?.is_some())
        }

        async fn create(&self, user: &User) -> AuthResult<()> {
            self.0.write().unwrap().insert(user.id, user.clone());
            Ok(())
        }
    }

    struct MapClientStorage(RwLock<HashMap<String, Client>>);

    #[async_trait]
    impl ClientStorage for MapClientStorage {
        async fn exists_by_id(&self, client_id: &str) -> AuthResult<bool> {
            Ok(self.0.read().unwrap().contains_key(client_id))
        }

        async fn find_by_id(&self, client_id: &str) -> AuthResult<Option<Client>> {
            Ok(self.0.read().unwrap().get(client_id).cloned())
        }

        async fn create(&self, client: &Client) -> AuthResult<()> {
            self.0
                .write()
                .unwrap()
                .insert(client.client_id.clone(), client.clone());
            Ok(())
        }
    }

    async fn test_verifier() -> CredentialVerifier {
        let users = Arc::new(MapUserStorage(RwLock::new(HashMap::new())));
        let clients = Arc::new(MapClientStorage(RwLock::new(HashMap::new())));

        let user = User::new(
            "a@b.com",
            secret::hash_secret("Correct#Pass1").unwrap(),
            "Ada",
            "Lovelace",
            vec![Role::User],
            OffsetDateTime::now_utc(),
        );
        users.create(&user).await.unwrap();

        let client = Client::new(
            "svc-1",
            secret::hash_secret("client-secret").unwrap(),
            [Scope::Read, Scope::Write].into(),
            OffsetDateTime::now_utc(),
        );
        clients.create(&client).await.unwrap();

        CredentialVerifier::new(users, clients).unwrap()
    }

    #[tokio::test]
    async fn test_verify_user_success() {
        let verifier = test_verifier().await;
        let principal = verifier.verify_user("a@b.com", "Correct#Pass1").await.unwrap();
        assert!(principal.is_user());
        assert_eq!(principal.subject, "a@b.com");
        assert_eq!(principal.authorities, vec!["USER"]);
    }

    #[tokio::test]
    async fn test_verify_user_wrong_password() {
        let verifier = test_verifier().await;
        let result = verifier.verify_user("a@b.com", "Wrong#Pass1").await;
        assert!(matches!(result, Err(AuthError::BadCredentials)));
    }

    #[tokio::test]
    async fn test_verify_user_unknown_identity_is_uniform() {
        let verifier = test_verifier().await;
        let result = verifier.verify_user("nobody@b.com", "Correct#Pass1").await;
        // Same variant as a wrong password: nothing to enumerate.
        assert!(matches!(result, Err(AuthError::BadCredentials)));
    }

    #[tokio::test]
    async fn test_verify_client_success() {
        let verifier = test_verifier().await;
        let principal = verifier.verify_client("svc-1", "client-secret").await.unwrap();
        assert!(!principal.is_user());
        assert_eq!(principal.subject, "svc-1");
        assert_eq!(principal.authorities, vec!["read", "write"]);
    }

    #[tokio::test]
    async fn test_verify_client_failures_are_uniform() {
        let verifier = test_verifier().await;
        assert!(matches!(
            verifier.verify_client("svc-1", "wrong-secret").await,
            Err(AuthError::BadCredentials)
        ));
        assert!(matches!(
            verifier.verify_client("svc-unknown", "client-secret").await,
            Err(AuthError::BadCredentials)
        ));
    }
}
