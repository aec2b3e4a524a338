//! JWT signing and verification.
//!
//! Both access and refresh tokens are compact RS256-signed JWTs produced by
//! the same key pair; refresh tokens carry a `type: "refresh"` marker claim
//! to keep the two distinguishable.
//!
//! Verification here covers signature, structure and issuer only. Expiry
//! and revocation are business checks that belong to the caller, so
//! [`JwtService::decode`] deliberately does not enforce them.
//!
//! # Example
//!
//! ```ignore
//! use ferrobank_auth::token::jwt::{JwtService, SigningKeyPair};
//!
//! let key_pair = SigningKeyPair::generate_rsa()?;
//! let jwt = JwtService::new(key_pair, "https://auth.ferrobank.dev");
//!
//! let token = jwt.encode(&claims)?;
//! let claims = jwt.decode(&token)?;
//! ```

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Marker value of the `type` claim on refresh tokens.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

const ALGORITHM: Algorithm = Algorithm::RS256;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to encode a token.
    #[error("failed to encode token: {message}")]
    Encoding {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode a token (malformed, bad claims, wrong issuer).
    #[error("failed to decode token: {message}")]
    Decoding {
        /// Description of the decoding error.
        message: String,
    },

    /// The token signature is invalid.
    #[error("invalid signature")]
    InvalidSignature,

    /// Invalid key format or data.
    #[error("invalid key: {message}")]
    InvalidKey {
        /// Description of why the key is invalid.
        message: String,
    },

    /// Failed to generate a cryptographic key.
    #[error("key generation error: {message}")]
    KeyGeneration {
        /// Description of the key generation error.
        message: String,
    },
}

impl JwtError {
    /// Creates a new `Encoding` error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Creates a new `Decoding` error.
    #[must_use]
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidKey` error.
    #[must_use]
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Creates a new `KeyGeneration` error.
    #[must_use]
    pub fn key_generation(message: impl Into<String>) -> Self {
        Self::KeyGeneration {
            message: message.into(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
                Self::invalid_key(err.to_string())
            }
            _ => Self::decoding(err.to_string()),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Decoding { message } => AuthError::invalid_token(message),
            JwtError::InvalidSignature => AuthError::invalid_token("invalid signature"),
            other => AuthError::encoding(other.to_string()),
        }
    }
}

// ============================================================================
// Claims
// ============================================================================

/// The claim set carried by every signed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer (deployment base URL).
    pub iss: String,

    /// Subject: the user's e-mail or the client's id.
    pub sub: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Unique token id. Keeps two tokens minted for the same subject in
    /// the same second distinct.
    pub jti: String,

    /// Granted authority strings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorities: Vec<String>,

    /// `"refresh"` on refresh tokens, absent on access tokens.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl Claims {
    /// Returns `true` if this claim set marks a refresh token.
    #[must_use]
    pub fn is_refresh(&self) -> bool {
        self.token_type.as_deref() == Some(REFRESH_TOKEN_TYPE)
    }
}

// ============================================================================
// Signing Key Pair
// ============================================================================

/// An RS256 signing key pair.
///
/// Key material is loaded once at process start and is immutable for the
/// process lifetime; there is no hot rotation.
pub struct SigningKeyPair {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SigningKeyPair {
    /// Generates a fresh 2048-bit RSA key pair.
    ///
    /// Intended for development and tests; deployments load PEM material
    /// via [`from_pem`](Self::from_pem).
    ///
    /// # Errors
    ///
    /// Returns an error if key generation fails.
    pub fn generate_rsa() -> Result<Self, JwtError> {
        let bits = 2048;
        let private_key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| JwtError::key_generation(e.to_string()))?;

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| JwtError::key_generation(e.to_string()))?;
        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| JwtError::key_generation(e.to_string()))?;

        let public_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| JwtError::key_generation(e.to_string()))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| JwtError::key_generation(e.to_string()))?;

        Ok(Self {
            encoding_key,
            decoding_key,
        })
    }

    /// Loads a key pair from PEM strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the PEM data is invalid.
    pub fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| JwtError::invalid_key(e.to_string()))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| JwtError::invalid_key(e.to_string()))?;

        Ok(Self {
            encoding_key,
            decoding_key,
        })
    }
}

// ============================================================================
// JWT Service
// ============================================================================

/// Service for signing and verifying tokens.
///
/// Thread-safe (`Send + Sync`); shared across tasks behind an `Arc`.
pub struct JwtService {
    signing_key: SigningKeyPair,
    issuer: String,
}

impl JwtService {
    /// Creates a new JWT service.
    #[must_use]
    pub fn new(signing_key: SigningKeyPair, issuer: impl Into<String>) -> Self {
        Self {
            signing_key,
            issuer: issuer.into(),
        }
    }

    /// Signs a claim set into a compact token string.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(ALGORITHM);
        encode(&header, claims, &self.signing_key.encoding_key)
            .map_err(|e| JwtError::encoding(e.to_string()))
    }

    /// Verifies signature, structure and issuer, returning the claims.
    ///
    /// Expiry is **not** checked here; callers decide what an expired
    /// token means for their operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, carries the wrong
    /// issuer, or its signature does not verify.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &self.signing_key.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Returns the issuer URL.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_claims(exp_offset: i64) -> Claims {
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        Claims {
            iss: "https://auth.ferrobank.dev".to_string(),
            sub: "a@b.com".to_string(),
            iat: now,
            exp: now + exp_offset,
            jti: uuid::Uuid::new_v4().to_string(),
            authorities: vec!["USER".to_string()],
            token_type: None,
        }
    }

    fn test_service() -> JwtService {
        let key_pair = SigningKeyPair::generate_rsa().unwrap();
        JwtService::new(key_pair, "https://auth.ferrobank.dev")
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let service = test_service();
        let claims = test_claims(900);

        let token = service.encode(&claims).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded = service.decode(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_refresh_marker_roundtrip() {
        let service = test_service();
        let mut claims = test_claims(3600);
        claims.token_type = Some(REFRESH_TOKEN_TYPE.to_string());
        claims.authorities = Vec::new();

        let token = service.encode(&claims).unwrap();
        let decoded = service.decode(&token).unwrap();
        assert!(decoded.is_refresh());
    }

    #[test]
    fn test_claims_json_uses_type_field() {
        let mut claims = test_claims(3600);
        claims.token_type = Some(REFRESH_TOKEN_TYPE.to_string());
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"type\":\"refresh\""));

        let access = test_claims(3600);
        let json = serde_json::to_string(&access).unwrap();
        assert!(!json.contains("\"type\""));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let signer = test_service();
        let other = test_service();

        let token = signer.encode(&test_claims(900)).unwrap();
        let result = other.decode(&token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let key_pair = SigningKeyPair::generate_rsa().unwrap();
        let service = JwtService::new(key_pair, "https://elsewhere.example.com");

        let token = service.encode(&test_claims(900)).unwrap();
        // Same key, different expected issuer.
        let result = service.decode(&token);
        assert!(matches!(result, Err(JwtError::Decoding { .. })));
    }

    #[test]
    fn test_garbage_rejected() {
        let service = test_service();
        assert!(service.decode("not-a-token").is_err());
        assert!(service.decode("").is_err());
    }

    #[test]
    fn test_expired_token_still_decodes() {
        // Expiry is the caller's check, not the signer's.
        let service = test_service();
        let token = service.encode(&test_claims(-3600)).unwrap();
        let decoded = service.decode(&token).unwrap();
        assert!(decoded.exp < time::OffsetDateTime::now_utc().unix_timestamp());
    }

    #[test]
    fn test_from_pem_rejects_garbage() {
        assert!(matches!(
            SigningKeyPair::from_pem("nope", "nope"),
            Err(JwtError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_jwt_error_maps_to_auth_error() {
        let err: AuthError = JwtError::InvalidSignature.into();
        assert!(matches!(err, AuthError::InvalidToken { .. }));

        let err: AuthError = JwtError::encoding("boom").into();
        assert!(matches!(err, AuthError::Encoding { .. }));
    }
}
