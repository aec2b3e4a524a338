//! Authenticated principal.
//!
//! A [`Principal`] is the outcome of credential verification and the single
//! input to token issuance. Human users and machine clients are folded into
//! one tagged type so the issuer never dispatches on who authenticated.

use uuid::Uuid;

/// The kind of identity behind a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalKind {
    /// A human user authenticated with e-mail and password.
    User,
    /// A machine client authenticated with client id and secret.
    Client,
}

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Whether this principal is a user or a machine client.
    pub kind: PrincipalKind,

    /// Store id of the owning user. `None` for machine clients, which are
    /// keyed by their client id alone.
    pub user_id: Option<Uuid>,

    /// The subject placed in token claims: the user's e-mail or the
    /// client's id.
    pub subject: String,

    /// Granted authority strings: role names for users, scope codes for
    /// clients.
    pub authorities: Vec<String>,
}

impl Principal {
    /// Creates a user principal.
    #[must_use]
    pub fn user(id: Uuid, subject: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            kind: PrincipalKind::User,
            user_id: Some(id),
            subject: subject.into(),
            authorities,
        }
    }

    /// Creates a machine-client principal.
    #[must_use]
    pub fn client(subject: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            kind: PrincipalKind::Client,
            user_id: None,
            subject: subject.into(),
            authorities,
        }
    }

    /// Returns `true` for user principals.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.kind == PrincipalKind::User
    }
}
