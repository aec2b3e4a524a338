//! Secret generation, hashing and verification.
//!
//! This module provides Argon2-based one-way hashing for user passwords and
//! client secrets, plus generation of the opaque secrets handed to
//! machine-to-machine clients at registration time.
//!
//! # Security
//!
//! - Hashing uses Argon2id (hybrid mode) with default parameters
//! - Salts are generated using OsRng (cryptographically secure RNG)
//! - Client secrets mix 192 bits of CSPRNG entropy with the client id and
//!   pass through SHA-256 before encoding, so the raw secret is never a
//!   direct function of either input alone
//!
//! # Example
//!
//! ```
//! use ferrobank_auth::secret::{hash_secret, verify_secret};
//!
//! let hash = hash_secret("Correct#Pass1").unwrap();
//! assert!(verify_secret("Correct#Pass1", &hash));
//! assert!(!verify_secret("Wrong#Pass1", &hash));
//! ```

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Hash a secret for storage using Argon2id.
///
/// The output is a PHC-formatted string with an embedded random salt, so the
/// same input produces a different hash on every call.
///
/// # Errors
///
/// Returns [`AuthError::Encoding`] if the hashing primitive fails. This is
/// fatal for the calling operation and must not be retried.
pub fn hash_secret(secret: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| AuthError::encoding(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a secret against a stored Argon2 hash.
///
/// Recomputes using the salt embedded in `hash` and compares in constant
/// time. Mismatches and malformed hashes both yield `false`; this function
/// never fails.
#[must_use]
pub fn verify_secret(secret: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Generate a raw client secret bound to a client id.
///
/// 24 random bytes are concatenated with the UTF-8 bytes of `client_id`,
/// digested with SHA-256, truncated to 24 bytes and base64-encoded. The
/// characters `\`, `-`, `_` and `/` are replaced with `#`, `^`, `$` and `@`
/// and padding is stripped, so the result is safe to place in headers and
/// URLs.
///
/// The returned value is shown to the caller exactly once; only
/// [`hash_secret`] output may be persisted.
#[must_use]
pub fn generate_client_secret(client_id: &str) -> String {
    let mut random_bytes = [0u8; 24];
    OsRng.fill_bytes(&mut random_bytes);

    let mut hasher = Sha256::new();
    hasher.update(client_id.as_bytes());
    hasher.update(random_bytes);
    let digest = hasher.finalize();

    STANDARD
        .encode(&digest[..24])
        .replace('\\', "#")
        .replace('-', "^")
        .replace('_', "$")
        .replace('/', "@")
        .replace('=', "")
}
