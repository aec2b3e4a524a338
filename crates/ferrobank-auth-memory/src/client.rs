//! In-memory client store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use ferrobank_auth::storage::client::ClientStorage;
use ferrobank_auth::types::client::Client;
use ferrobank_auth::{AuthError, AuthResult};

/// Machine clients keyed by client id.
#[derive(Default)]
pub struct InMemoryClientStorage {
    clients: RwLock<HashMap<String, Client>>,
}

impl InMemoryClientStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStorage for InMemoryClientStorage {
    async fn exists_by_id(&self, client_id: &str) -> AuthResult<bool> {
        Ok(self
            .clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(client_id))
    }

    async fn find_by_id(&self, client_id: &str) -> AuthResult<Option<Client>> {
        Ok(self
            .clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(client_id)
            .cloned())
    }

    async fn create(&self, client: &Client) -> AuthResult<()> {
        let mut clients = self
            .clients
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if clients.contains_key(&client.client_id) {
            return Err(AuthError::storage("duplicate client id"));
        }
        clients.insert(client.client_id.clone(), client.clone());
        Ok(())
    }
}
