//! # ferrobank-auth
//!
//! Token lifecycle subsystem for the Ferrobank platform.
//!
//! This crate provides:
//! - Credential verification for users and machine clients
//! - RS256-signed access and refresh token issuance
//! - One-shot refresh token rotation with revocation
//! - Logout as per-user mass revocation
//! - Client registration with generated, hash-at-rest secrets
//!
//! ## Overview
//!
//! Tokens are JWTs signed with a process-scoped RSA key pair. Refresh
//! tokens are single-use: presenting one revokes it and mints a fresh
//! pair, and the revocation is a conditional update so concurrent
//! presentations of the same token cannot both succeed. Passwords and
//! client secrets are stored as Argon2id hashes only.
//!
//! Storage is abstracted behind the traits in [`storage`]; the
//! `ferrobank-auth-memory` crate ships an in-memory backend.
//!
//! ## Modules
//!
//! - [`config`] - Deployment configuration (issuer, lifetimes, keys)
//! - [`secret`] - Secret generation, hashing and verification
//! - [`token`] - JWT signing and token issuance/rotation
//! - [`verifier`] - Credential verification
//! - [`registrar`] - User and client registration
//! - [`service`] - The composed auth service surface
//! - [`storage`] - Storage traits for auth-related data

pub mod clock;
pub mod config;
pub mod error;
pub mod principal;
pub mod registrar;
pub mod secret;
pub mod service;
pub mod storage;
pub mod token;
pub mod types;
pub mod validation;
pub mod verifier;

pub use clock::{Clock, SystemClock};
pub use config::{AuthConfig, SigningConfig, TokenLifetimeConfig};
pub use error::AuthError;
pub use principal::{Principal, PrincipalKind};
pub use registrar::{ClientRegistration, RegisterService, RegisterUserRequest};
pub use service::AuthService;
pub use storage::{ClientStorage, Role, TokenStorage, User, UserStorage};
pub use token::{Claims, JwtService, SigningKeyPair, TokenConfig, TokenService};
pub use types::{AccessGrant, Client, RefreshTokenRecord, Scope, TOKEN_TYPE_BEARER, TokenPair};
pub use validation::{DefaultPasswordPolicy, FieldViolation, PasswordPolicy};
pub use verifier::CredentialVerifier;

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;
