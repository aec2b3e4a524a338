//! The auth service surface.
//!
//! [`AuthService`] is what the transport layer (HTTP, out of scope here)
//! talks to: login, refresh, logout and bearer-token checks. It composes
//! the credential verifier and the token issuer and adds nothing beyond
//! orchestration and logging.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::AuthResult;
use crate::clock::Clock;
use crate::error::AuthError;
use crate::token::issuer::TokenService;
use crate::token::jwt::{Claims, JwtService};
use crate::types::token_pair::{AccessGrant, TokenPair};
use crate::verifier::CredentialVerifier;

/// Entry point for authentication operations.
pub struct AuthService {
    verifier: CredentialVerifier,
    issuer: TokenService,
    jwt: Arc<JwtService>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(
        verifier: CredentialVerifier,
        issuer: TokenService,
        jwt: Arc<JwtService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            issuer,
            jwt,
            clock,
        }
    }

    /// Authenticates a user and issues a token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::BadCredentials`] on verification failure, or
    /// issuance errors from the token service.
    pub async fn login(&self, identity: &str, raw_password: &str) -> AuthResult<TokenPair> {
        let principal = self.verifier.verify_user(identity, raw_password).await?;
        let pair = self.issuer.issue_for_login(&principal).await?;
        info!(subject = %principal.subject, "user logged in");
        Ok(pair)
    }

    /// Authenticates a machine client and issues an access-only grant.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::BadCredentials`] on verification failure, or
    /// issuance errors from the token service.
    pub async fn login_client(&self, client_id: &str, raw_secret: &str) -> AuthResult<AccessGrant> {
        let principal = self.verifier.verify_client(client_id, raw_secret).await?;
        let grant = self.issuer.issue_access_token(&principal).await?;
        info!(subject = %principal.subject, "client logged in");
        Ok(grant)
    }

    /// Exchanges a refresh token for a new pair, consuming it.
    ///
    /// # Errors
    ///
    /// See [`TokenService::issue_for_refresh`].
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        self.issuer.issue_for_refresh(refresh_token).await
    }

    /// Revokes every outstanding refresh token for a user.
    ///
    /// Returns the number of tokens revoked.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the revocation cannot be applied.
    pub async fn logout(&self, user_id: Uuid) -> AuthResult<u64> {
        self.issuer.revoke_all_for_user(user_id).await
    }

    /// Validates a bearer access token and returns its claims.
    ///
    /// Signature and issuer are checked by the signer; expiry and the
    /// refusal of refresh tokens as access tokens are enforced here.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for malformed or mis-signed
    /// tokens and refresh tokens presented as access tokens;
    /// [`AuthError::ExpiredOrRevoked`] once the token is past its expiry.
    pub async fn verify_access_token(&self, token: &str) -> AuthResult<Claims> {
        let claims = self.jwt.decode(token)?;
        if claims.is_refresh() {
            return Err(AuthError::invalid_token(
                "refresh token presented as access token",
            ));
        }
        if claims.exp <= self.clock.now().unix_timestamp() {
            return Err(AuthError::ExpiredOrRevoked);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use async_trait::async_trait;
    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::secret;
    use crate::storage::client::ClientStorage;
    use crate::storage::token::TokenStorage;
    use crate::storage::user::{Role, User, UserStorage};
    use crate::token::issuer::TokenConfig;
    use crate::token::jwt::SigningKeyPair;
    use crate::types::client::{Client, Scope};
    use crate::types::refresh_token::RefreshTokenRecord;

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

    struct MapTokenStorage(RwLock<HashMap<String, RefreshTokenRecord>>);

    #[async_trait]
    impl TokenStorage for MapTokenStorage {
        async fn create(&self, record: &RefreshTokenRecord) -> AuthResult<()> {
            self.0
                .write()
                .unwrap()
                .insert(record.token_hash.clone(), record.clone());
            Ok(())
        }

        async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshTokenRecord>> {
            Ok(self.0.read().unwrap().get(token_hash).cloned())
        }

        async fn revoke(&self, token_hash: &str) -> AuthResult<bool> {
            let mut tokens = self.0.write().unwrap();
            match tokens.get_mut(token_hash) {
                Some(record) if record.revoked_at.is_none() => {
                    record.revoked_at = Some(OffsetDateTime::now_utc());
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn revoke_all_by_user(&self, user_id: Uuid) -> AuthResult<u64> {
            let mut tokens = self.0.write().unwrap();
            let mut count = 0;
            for record in tokens.values_mut() {
                if record.user_id == user_id && record.revoked_at.is_none() {
                    record.revoked_at = Some(OffsetDateTime::now_utc());
                    count += 1;
                }
            }
            Ok(count)
        }

        async fn list_active_by_user(
            &self,
            user_id: Uuid,
            now: OffsetDateTime,
        ) -> AuthResult<Vec<RefreshTokenRecord>> {
            Ok(self
                .0
                .read()
                .unwrap()
                .values()
                .filter(|r| r.user_id == user_id && r.is_active(now))
                .cloned()
                .collect())
        }
    }

    struct ManualClock(RwLock<OffsetDateTime>);

    impl Clock for ManualClock {
        fn now(&self) -> OffsetDateTime {
            *self.0.read().unwrap()
        }
    }

    async fn test_service() -> (AuthService, Arc<ManualClock>, Uuid) {
        let users = Arc::new(MapUserStorage(RwLock::new(HashMap::new())));
        let clients = Arc::new(MapClientStorage(RwLock::new(HashMap::new())));
        let tokens = Arc::new(MapTokenStorage(RwLock::new(HashMap::new())));
        let clock = Arc::new(ManualClock(RwLock::new(OffsetDateTime::now_utc())));

        let user = User::new(
            "a@b.com",
            secret::hash_secret("Correct#Pass1").unwrap(),
            "Ada",
            "Lovelace",
            vec![Role::User],
            clock.now(),
        );
        let user_id = user.id;
        users.create(&user).await.unwrap();

        let client = Client::new(
            "svc-1",
            secret::hash_secret("client-secret").unwrap(),
            [Scope::Read].into(),
            clock.now(),
        );
        clients.create(&client).await.unwrap();

        let key_pair = SigningKeyPair::generate_rsa().unwrap();
        let jwt = Arc::new(JwtService::new(key_pair, "https://auth.ferrobank.dev"));
        let issuer = TokenService::new(
            jwt.clone(),
            tokens,
            users.clone(),
            clock.clone(),
            TokenConfig::new(Duration::minutes(15), Duration::days(30)),
        );
        let verifier = CredentialVerifier::new(users, clients).unwrap();

        (
            AuthService::new(verifier, issuer, jwt, clock.clone()),
            clock,
            user_id,
        )
    }

    #[tokio::test]
    async fn test_login_then_verify_access_token() {
        let (service, _, _) = test_service().await;
        let pair = service.login("a@b.com", "Correct#Pass1").await.unwrap();

        let claims = service.verify_access_token(&pair.access_token).await.unwrap();
        assert_eq!(claims.sub, "a@b.com");
        assert_eq!(claims.authorities, vec!["USER"]);
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let (service, _, _) = test_service().await;

        let wrong = service.login("a@b.com", "Wrong#Pass1").await.unwrap_err();
        let unknown = service.login("x@b.com", "Correct#Pass1").await.unwrap_err();
        assert_eq!(wrong.public_message(), "authentication failed");
        assert_eq!(unknown.public_message(), "authentication failed");
    }

    #[tokio::test]
    async fn test_refresh_token_rejected_as_access_token() {
        let (service, _, _) = test_service().await;
        let pair = service.login("a@b.com", "Correct#Pass1").await.unwrap();

        let result = service.verify_access_token(&pair.refresh_token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken { .. })));
    }

    #[tokio::test]
    async fn test_access_token_expires() {
        let (service, clock, _) = test_service().await;
        let pair = service.login("a@b.com", "Correct#Pass1").await.unwrap();

        *clock.0.write().unwrap() += Duration::minutes(16);
        let result = service.verify_access_token(&pair.access_token).await;
        assert!(matches!(result, Err(AuthError::ExpiredOrRevoked)));
    }

    #[tokio::test]
    async fn test_logout_blocks_refresh() {
        let (service, _, user_id) = test_service().await;
        let pair = service.login("a@b.com", "Correct#Pass1").await.unwrap();

        assert_eq!(service.logout(user_id).await.unwrap(), 1);
        let result = service.refresh(&pair.refresh_token).await;
        assert!(matches!(result, Err(AuthError::ExpiredOrRevoked)));
    }

    #[tokio::test]
    async fn test_client_login_grant_verifies() {
        let (service, _, _) = test_service().await;
        let grant = service.login_client("svc-1", "client-secret").await.unwrap();
        assert_eq!(grant.token_type, "Bearer");

        let claims = service.verify_access_token(&grant.access_token).await.unwrap();
        assert_eq!(claims.sub, "svc-1");
        assert_eq!(claims.authorities, vec!["read"]);
    }
}
