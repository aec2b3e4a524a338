//! Client storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::client::Client;

/// Storage operations for machine clients.
///
/// Client records are read-mostly: written once at registration, looked up
/// on every client authentication. Implementations must enforce uniqueness
/// of the client id on create.
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Returns `true` if a client with the given id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn exists_by_id(&self, client_id: &str) -> AuthResult<bool>;

    /// Find a client by its id.
    ///
    /// Returns `None` if the client doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, client_id: &str) -> AuthResult<Option<Client>>;

    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if a client with the same id already exists or the
    /// storage operation fails.
    async fn create(&self, client: &Client) -> AuthResult<()>;
}
