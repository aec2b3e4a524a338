//! Refresh token record.
//!
//! The persisted state behind refresh-token rotation.
//!
//! # Storage security
//!
//! The signed refresh token itself is never stored. Only a SHA-256 hash is
//! persisted; presenting a token means hashing it and looking the hash up.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A refresh token as tracked by the revocation store.
///
/// Records are created on login and refresh, revoked on rotation or logout,
/// and never hard-deleted: revoked and expired records remain for audit,
/// with expiry acting as the passive cleanup signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRecord {
    /// SHA-256 hash of the signed token value.
    pub token_hash: String,

    /// The user this token was issued to.
    pub user_id: Uuid,

    /// When this token was issued.
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,

    /// When this token expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    /// When this token was revoked. `None` while active; set exactly once
    /// and never cleared.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub revoked_at: Option<OffsetDateTime>,
}

impl RefreshTokenRecord {
    /// Creates an active record.
    #[must_use]
    pub fn new(
        token_hash: impl Into<String>,
        user_id: Uuid,
        issued_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Self {
        Self {
            token_hash: token_hash.into(),
            user_id,
            issued_at,
            expires_at,
            revoked_at: None,
        }
    }

    /// Returns `true` if this record has been revoked.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Returns `true` if this record is expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }

    /// Returns `true` if this record can still be presented at `now`.
    #[must_use]
    pub fn is_active(&self, now: OffsetDateTime) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }

    /// Hash a token value using SHA-256.
    ///
    /// Used both when storing new tokens and when looking up presented
    /// tokens for validation.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
