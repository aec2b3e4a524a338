//! Token issuance and refresh rotation.
//!
//! The [`TokenService`] orchestrates claim construction, signing and
//! refresh-record persistence for login and refresh, and owns the rotation
//! invariant: a refresh token is usable exactly once.
//!
//! # Rotation ordering
//!
//! The old record is revoked *before* the replacement pair is issued, via a
//! conditional update on the revoked flag. A concurrent second refresh of
//! the same token either observes the revoked record or loses the
//! conditional update; in both cases it fails with `ExpiredOrRevoked`, so
//! two concurrent refreshes can never both succeed.

use std::sync::Arc;

use time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::AuthResult;
use crate::clock::Clock;
use crate::error::AuthError;
use crate::principal::Principal;
use crate::storage::token::TokenStorage;
use crate::storage::user::UserStorage;
use crate::token::jwt::{Claims, JwtService, REFRESH_TOKEN_TYPE};
use crate::types::refresh_token::RefreshTokenRecord;
use crate::types::token_pair::{AccessGrant, TokenPair};

/// Lifetimes applied to issued tokens.
///
/// Durations come from deployment configuration, never from code.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Access token lifetime.
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime.
    pub refresh_token_lifetime: Duration,
}

impl TokenConfig {
    /// Creates a configuration with the given lifetimes.
    #[must_use]
    pub fn new(access_token_lifetime: Duration, refresh_token_lifetime: Duration) -> Self {
        Self {
            access_token_lifetime,
            refresh_token_lifetime,
        }
    }
}

impl From<&crate::config::AuthConfig> for TokenConfig {
    fn from(config: &crate::config::AuthConfig) -> Self {
        Self {
            access_token_lifetime: Duration::seconds(
                config.tokens.access_token_lifetime.as_secs() as i64
            ),
            refresh_token_lifetime: Duration::seconds(
                config.tokens.refresh_token_lifetime.as_secs() as i64,
            ),
        }
    }
}

/// Issues token pairs and enforces one-shot refresh rotation.
pub struct TokenService {
    jwt: Arc<JwtService>,
    tokens: Arc<dyn TokenStorage>,
    users: Arc<dyn UserStorage>,
    clock: Arc<dyn Clock>,
    config: TokenConfig,
}

impl TokenService {
    /// Creates a new token service.
    #[must_use]
    pub fn new(
        jwt: Arc<JwtService>,
        tokens: Arc<dyn TokenStorage>,
        users: Arc<dyn UserStorage>,
        clock: Arc<dyn Clock>,
        config: TokenConfig,
    ) -> Self {
        Self {
            jwt,
            tokens,
            users,
            clock,
            config,
        }
    }

    /// Issues an access + refresh pair for a verified user principal and
    /// persists the refresh record.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] for non-user principals (machine
    /// clients receive access-only grants via
    /// [`issue_access_token`](Self::issue_access_token)),
    /// [`AuthError::Encoding`] if signing fails, or a storage error if the
    /// record cannot be persisted.
    pub async fn issue_for_login(&self, principal: &Principal) -> AuthResult<TokenPair> {
        let user_id = principal
            .user_id
            .ok_or_else(|| AuthError::internal("refresh tokens require a user principal"))?;

        let now = self.clock.now();
        let access_expires = now + self.config.access_token_lifetime;
        let refresh_expires = now + self.config.refresh_token_lifetime;

        let access_claims = Claims {
            iss: self.jwt.issuer().to_string(),
            sub: principal.subject.clone(),
            iat: now.unix_timestamp(),
            exp: access_expires.unix_timestamp(),
            jti: Uuid::new_v4().to_string(),
            authorities: principal.authorities.clone(),
            token_type: None,
        };
        let refresh_claims = Claims {
            iss: self.jwt.issuer().to_string(),
            sub: principal.subject.clone(),
            iat: now.unix_timestamp(),
            exp: refresh_expires.unix_timestamp(),
            jti: Uuid::new_v4().to_string(),
            authorities: Vec::new(),
            token_type: Some(REFRESH_TOKEN_TYPE.to_string()),
        };

        let access_token = self.jwt.encode(&access_claims)?;
        let refresh_token = self.jwt.encode(&refresh_claims)?;

        let record = RefreshTokenRecord::new(
            RefreshTokenRecord::hash_token(&refresh_token),
            user_id,
            now,
            refresh_expires,
        );
        self.tokens.create(&record).await?;

        debug!(subject = %principal.subject, "issued token pair");
        Ok(TokenPair::new(access_token, refresh_token, access_expires))
    }

    /// Issues an access-only grant for a verified machine client.
    ///
    /// No refresh record is created; clients re-authenticate with their
    /// secret instead of rotating refresh tokens.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Encoding`] if signing fails.
    pub async fn issue_access_token(&self, principal: &Principal) -> AuthResult<AccessGrant> {
        let now = self.clock.now();
        let expires = now + self.config.access_token_lifetime;

        let claims = Claims {
            iss: self.jwt.issuer().to_string(),
            sub: principal.subject.clone(),
            iat: now.unix_timestamp(),
            exp: expires.unix_timestamp(),
            jti: Uuid::new_v4().to_string(),
            authorities: principal.authorities.clone(),
            token_type: None,
        };

        let access_token = self.jwt.encode(&claims)?;
        debug!(subject = %principal.subject, "issued access grant");
        Ok(AccessGrant::new(access_token, expires))
    }

    /// Exchanges a presented refresh token for a new pair, consuming it.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidToken`] if no record matches the token
    /// - [`AuthError::ExpiredOrRevoked`] if the record is expired, revoked,
    ///   or a concurrent refresh/logout consumed it first
    /// - [`AuthError::PrincipalNotFound`] if the owning user vanished
    pub async fn issue_for_refresh(&self, presented: &str) -> AuthResult<TokenPair> {
        let token_hash = RefreshTokenRecord::hash_token(presented);
        let record = self
            .tokens
            .find_by_hash(&token_hash)
            .await?
            .ok_or_else(|| AuthError::invalid_token("unknown refresh token"))?;

        let now = self.clock.now();
        if !record.is_active(now) {
            return Err(AuthError::ExpiredOrRevoked);
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or(AuthError::PrincipalNotFound)?;

        // Consume the old record before issuing. Losing the conditional
        // update means another presentation of this token got here first.
        if !self.tokens.revoke(&token_hash).await? {
            return Err(AuthError::ExpiredOrRevoked);
        }

        let pair = self.issue_for_login(&user.principal()).await?;
        info!(user_id = %record.user_id, "rotated refresh token");
        Ok(pair)
    }

    /// Revokes every active refresh token owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the revocation cannot be applied.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> AuthResult<u64> {
        let revoked = self.tokens.revoke_all_by_user(user_id).await?;
        info!(%user_id, revoked, "revoked all refresh tokens for user");
        Ok(revoked)
    }

    /// The configured lifetimes.
    #[must_use]
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }
}

// ============================================================================
// Tests
// ============================================================================
