//! Authentication and authorization error types.
//!
//! This module defines all error types that can occur during credential
//! verification, token issuance and client registration, together with the
//! boundary policy that keeps failure details from leaking to callers.

use crate::validation::FieldViolation;

/// Errors that can occur during authentication and token lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The presented credentials do not match a stored credential.
    ///
    /// Unknown identity and wrong secret are deliberately merged into this
    /// single variant so callers cannot enumerate registered identities.
    #[error("bad credentials")]
    BadCredentials,

    /// The presented token is unparseable, incorrectly signed, or unknown.
    #[error("invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The token was found but is no longer usable (expired or revoked).
    #[error("token expired or revoked")]
    ExpiredOrRevoked,

    /// The owner of a token no longer exists.
    #[error("principal not found")]
    PrincipalNotFound,

    /// A client with the given id is already registered.
    #[error("client already registered: {client_id}")]
    DuplicateClient {
        /// The conflicting client id.
        client_id: String,
    },

    /// One or more input fields failed validation.
    #[error("validation failed")]
    Validation {
        /// The field-level violations.
        violations: Vec<FieldViolation>,
    },

    /// The signing or hashing subsystem failed.
    ///
    /// This is fatal for the operation: a failed cryptographic primitive is
    /// never retried.
    #[error("encoding error: {message}")]
    Encoding {
        /// Description of the encoding failure.
        message: String,
    },

    /// An error occurred while reading or writing a backing store.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `DuplicateClient` error.
    #[must_use]
    pub fn duplicate_client(client_id: impl Into<String>) -> Self {
        Self::DuplicateClient {
            client_id: client_id.into(),
        }
    }

    /// Creates a new `Validation` error from a list of violations.
    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    /// Creates a new `Encoding` error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this failure was caused by the caller (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadCredentials
                | Self::InvalidToken { .. }
                | Self::ExpiredOrRevoked
                | Self::PrincipalNotFound
                | Self::DuplicateClient { .. }
                | Self::Validation { .. }
        )
    }

    /// Returns `true` if this is a server-side failure (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Encoding { .. } | Self::Storage { .. } | Self::Internal { .. }
        )
    }

    /// Returns `true` if this failure concerns credential or token checks.
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::BadCredentials
                | Self::InvalidToken { .. }
                | Self::ExpiredOrRevoked
                | Self::PrincipalNotFound
        )
    }

    /// The message safe to surface to an external caller.
    ///
    /// Every authentication failure collapses to the same string so the
    /// response never reveals which sub-check rejected the request.
    /// Validation failures point the caller at [`violations`](Self::violations)
    /// for the structured field messages.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        if self.is_authentication_error() {
            return "authentication failed";
        }
        match self {
            Self::DuplicateClient { .. } | Self::Validation { .. } => "validation failed",
            _ => "internal server error",
        }
    }

    /// The field-level violations carried by a validation failure, if any.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation { violations } => violations,
            _ => &[],
        }
    }
}
