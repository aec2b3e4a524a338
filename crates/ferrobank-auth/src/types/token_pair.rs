//! Token responses returned to callers.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The token type announced with every issued credential.
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// An access + refresh token pair.
///
/// Produced fresh on every login and refresh, never persisted and never
/// mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Signed access token.
    pub access_token: String,

    /// Signed refresh token, single-use under rotation.
    pub refresh_token: String,

    /// Always `"Bearer"`.
    pub token_type: String,

    /// Expiry of the access token.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl TokenPair {
    /// Creates a new pair with the bearer token type.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: OffsetDateTime,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_at,
        }
    }
}

/// An access-token-only grant, issued to machine clients.
///
/// Machine clients re-authenticate with their secret instead of holding a
/// refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    /// Signed access token.
    pub access_token: String,

    /// Always `"Bearer"`.
    pub token_type: String,

    /// Expiry of the access token.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl AccessGrant {
    /// Creates a new grant with the bearer token type.
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires_at: OffsetDateTime) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_at,
        }
    }
}
