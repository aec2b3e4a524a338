//! User and client registration.
//!
//! Registration is the only path that writes credential stores. Inputs are
//! validated up front with field-level messages; secrets are hashed before
//! anything is persisted.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::AuthResult;
use crate::clock::Clock;
use crate::error::AuthError;
use crate::secret;
use crate::storage::client::ClientStorage;
use crate::storage::user::{Role, User, UserStorage};
use crate::types::client::{Client, Scope};
use crate::validation::{FieldViolation, PasswordPolicy, validate_email, validate_not_empty};

/// A user registration request.
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    /// E-mail address, the user's login identity.
    pub email: String,

    /// Raw password. Hashed before persistence, never stored.
    pub password: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Roles to assign.
    pub roles: Vec<Role>,
}

/// The outcome of client registration.
///
/// `raw_secret` is returned exactly once; only its hash is persisted, so it
/// is unrecoverable afterwards.
#[derive(Debug, Clone)]
pub struct ClientRegistration {
    /// The registered client id.
    pub client_id: String,

    /// The generated raw secret.
    pub raw_secret: String,
}

/// Registers users and machine clients.
pub struct RegisterService {
    users: Arc<dyn UserStorage>,
    clients: Arc<dyn ClientStorage>,
    password_policy: Arc<dyn PasswordPolicy>,
    clock: Arc<dyn Clock>,
}

impl RegisterService {
    /// Creates a new registration service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStorage>,
        clients: Arc<dyn ClientStorage>,
        password_policy: Arc<dyn PasswordPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            clients,
            password_policy,
            clock,
        }
    }

    /// Registers a new user, returning the assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] with field-level messages when the
    /// request is malformed, the password fails the configured policy, or
    /// the e-mail is already registered; [`AuthError::Encoding`] if
    /// password hashing fails.
    pub async fn register_user(&self, request: &RegisterUserRequest) -> AuthResult<Uuid> {
        let mut violations = Vec::new();
        violations.extend(validate_email("e-mail", &request.email));
        violations.extend(validate_not_empty("firstName", &request.first_name));
        violations.extend(validate_not_empty("lastName", &request.last_name));
        if let Err(message) = self.password_policy.check(&request.password) {
            violations.push(FieldViolation::new("password", message));
        }
        if request.roles.is_empty() {
            violations.push(FieldViolation::new("roles", "must not be empty"));
        }
        if !violations.is_empty() {
            return Err(AuthError::validation(violations));
        }

        if self.users.exists_by_email(&request.email).await? {
            return Err(AuthError::validation(vec![FieldViolation::new(
                "e-mail",
                "this e-mail already exists",
            )]));
        }

        let password_hash = secret::hash_secret(&request.password)?;
        let user = User::new(
            request.email.clone(),
            password_hash,
            request.first_name.clone(),
            request.last_name.clone(),
            request.roles.clone(),
            self.clock.now(),
        );
        self.users.create(&user).await?;

        info!(user_id = %user.id, "registered user");
        Ok(user.id)
    }

    /// Registers a new machine client and returns its raw secret.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the client id is empty or no
    /// scopes were requested, [`AuthError::DuplicateClient`] if the id is
    /// taken, or [`AuthError::Encoding`] if secret hashing fails.
    pub async fn register_client(
        &self,
        client_id: &str,
        scopes: &BTreeSet<Scope>,
    ) -> AuthResult<ClientRegistration> {
        let mut violations = Vec::new();
        violations.extend(validate_not_empty("clientId", client_id));
        if scopes.is_empty() {
            violations.push(FieldViolation::new("scope", "must not be empty"));
        }
        if !violations.is_empty() {
            return Err(AuthError::validation(violations));
        }

        if self.clients.exists_by_id(client_id).await? {
            return Err(AuthError::duplicate_client(client_id));
        }

        let raw_secret = secret::generate_client_secret(client_id);
        let secret_hash = secret::hash_secret(&raw_secret)?;
        let client = Client::new(client_id, secret_hash, scopes.clone(), self.clock.now());
        self.clients.create(&client).await?;

        info!(client_id, "registered client");
        Ok(ClientRegistration {
            client_id: client.client_id,
            raw_secret,
        })
    }
}
