//! Machine-client domain types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// =============================================================================
// Scope
// =============================================================================

/// Access scopes grantable to a machine client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Permission to read resources.
    Read,
    /// Permission to write or modify resources.
    Write,
    /// Permission to perform transfer operations.
    Transfer,
}

impl Scope {
    /// Returns the scope code as carried in token authorities.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Client
// =============================================================================

/// A registered machine-to-machine client.
///
/// The raw secret exists only in the registration response; this record
/// carries the Argon2 hash and is the sole persisted form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique client identifier. Immutable after registration.
    pub client_id: String,

    /// Argon2 hash of the client secret.
    pub secret_hash: String,

    /// Scopes granted to this client. Never empty.
    pub scopes: BTreeSet<Scope>,

    /// When the client was registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Client {
    /// Creates a new client record.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        secret_hash: impl Into<String>,
        scopes: BTreeSet<Scope>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            secret_hash: secret_hash.into(),
            scopes,
            created_at,
        }
    }

    /// The authority strings carried in tokens issued to this client.
    #[must_use]
    pub fn authorities(&self) -> Vec<String> {
        self.scopes.iter().map(|s| s.to_string()).collect()
    }

    /// Returns `true` if the client holds the given scope.
    #[must_use]
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> Client {
        Client::new(
            "svc-1",
            "$argon2id$fake",
            BTreeSet::from([Scope::Read, Scope::Write]),
            OffsetDateTime::now_utc(),
        )
    }

    #[test]
    fn test_authorities_are_scope_codes() {
        let client = test_client();
        assert_eq!(client.authorities(), vec!["read", "write"]);
    }

    #[test]
    fn test_has_scope() {
        let client = test_client();
        assert!(client.has_scope(Scope::Read));
        assert!(!client.has_scope(Scope::Transfer));
    }

    #[test]
    fn test_scope_serialization() {
        let json = serde_json::to_string(&Scope::Transfer).unwrap();
        assert_eq!(json, "\"transfer\"");
        let back: Scope = serde_json::from_str("\"read\"").unwrap();
        assert_eq!(back, Scope::Read);
    }

    #[test]
    fn test_client_serialization() {
        let client = test_client();
        let json = serde_json::to_string(&client).unwrap();
        assert!(json.contains("\"clientId\":\"svc-1\""));
        assert!(json.contains("\"scopes\":[\"read\",\"write\"]"));
    }
}
