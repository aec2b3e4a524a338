//! Authentication configuration.
//!
//! Deployment-supplied settings for the token lifecycle subsystem: the
//! issuer URL, token lifetimes and signing key material. Durations accept
//! humantime strings (`"15m"`, `"30d"`).
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth]
//! issuer = "https://auth.ferrobank.dev"
//!
//! [auth.tokens]
//! access_token_lifetime = "15m"
//! refresh_token_lifetime = "30d"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the auth subsystem.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Issuer URL placed in the `iss` claim of every token. This should be
    /// the public base URL of the deployment.
    pub issuer: String,

    /// Token lifetime configuration.
    pub tokens: TokenLifetimeConfig,

    /// Signing key configuration.
    pub signing: SigningConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost:8080".to_string(),
            tokens: TokenLifetimeConfig::default(),
            signing: SigningConfig::default(),
        }
    }
}

/// Token lifetimes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenLifetimeConfig {
    /// Access token lifetime. Shorter lifetimes are more secure but require
    /// more frequent refresh.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime. Can be longer since refresh tokens are
    /// single-use under rotation.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,
}

impl Default for TokenLifetimeConfig {
    fn default() -> Self {
        Self {
            access_token_lifetime: Duration::from_secs(15 * 60),
            refresh_token_lifetime: Duration::from_secs(30 * 24 * 3600),
        }
    }
}

/// Signing key material.
///
/// When both PEM fields are absent an ephemeral key pair is generated at
/// startup; that mode is for development only, since restarts invalidate
/// every outstanding token.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SigningConfig {
    /// PEM-encoded RSA private key.
    pub private_key_pem: Option<String>,

    /// PEM-encoded RSA public key.
    pub public_key_pem: Option<String>,
}

impl SigningConfig {
    /// Returns `true` if deployment key material is present.
    #[must_use]
    pub fn has_key_material(&self) -> bool {
        self.private_key_pem.is_some() && self.public_key_pem.is_some()
    }
}
