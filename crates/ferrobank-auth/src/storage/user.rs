//! User type and storage trait.
//!
//! Defines the interface for user persistence operations. Implementations
//! are provided by storage backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::AuthResult;
use crate::principal::Principal;

// =============================================================================
// Role
// =============================================================================

/// Roles assignable to a user.
///
/// The role name is the authority string carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full access to system functionality.
    Admin,
    /// Standard user with limited access.
    User,
    /// System-to-system interactions and automated processes.
    Service,
}

impl Role {
    /// Returns the authority string for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::Service => "SERVICE",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// User
// =============================================================================

/// A user in the authentication system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier for the user.
    pub id: Uuid,

    /// E-mail address, the identity users authenticate with. Unique.
    pub email: String,

    /// Argon2-hashed password. The raw password is never persisted.
    pub password_hash: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Roles assigned to the user.
    pub roles: Vec<Role>,

    /// When the account was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the account was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Creates a new user with a fresh id.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        roles: Vec<Role>,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            roles,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the stored password hash.
    ///
    /// The hash changes only through this explicit re-issue.
    pub fn set_password_hash(&mut self, hash: impl Into<String>, now: OffsetDateTime) {
        self.password_hash = hash.into();
        self.updated_at = now;
    }

    /// The authority strings carried in tokens issued to this user.
    #[must_use]
    pub fn authorities(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.to_string()).collect()
    }

    /// Returns `true` if the user holds the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// The principal representing this user after verification.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::user(self.id, self.email.clone(), self.authorities())
    }
}

// =============================================================================
// User Storage Trait
// =============================================================================

/// Storage operations for users.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Find a user by their unique id.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, user_id: Uuid) -> AuthResult<Option<User>>;

    /// Find a user by their e-mail address.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Returns `true` if a user with the given e-mail exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn exists_by_email(&self, email: &str) -> AuthResult<bool>;

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if a user with the same e-mail already exists or
    /// the storage operation fails.
    async fn create(&self, user: &User) -> AuthResult<()>;
}
