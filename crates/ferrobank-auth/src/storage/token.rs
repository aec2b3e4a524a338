//! Refresh token storage trait.
//!
//! # Security considerations
//!
//! - Tokens are stored as SHA-256 hashes only
//! - Revocation must be atomic and immediate
//! - Records are never hard-deleted; expiry is the passive cleanup signal

use async_trait::async_trait;
use uuid::Uuid;

use crate::AuthResult;
use crate::types::refresh_token::RefreshTokenRecord;

/// Storage trait for refresh token records.
///
/// Implementations must make [`revoke`](TokenStorage::revoke) a conditional
/// update on the revoked flag so refresh rotation is linearizable per token:
/// of two concurrent revocations of the same active record, exactly one
/// observes the flip.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Stores a new refresh token record.
    ///
    /// # Errors
    ///
    /// Returns an error if the token hash already exists or the storage
    /// operation fails.
    async fn create(&self, record: &RefreshTokenRecord) -> AuthResult<()>;

    /// Finds a record by its token hash.
    ///
    /// Returns records regardless of expiration or revocation status;
    /// callers check validity themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshTokenRecord>>;

    /// Conditionally revokes a record.
    ///
    /// Returns `true` iff the record existed and was active: the caller won
    /// the compare-and-set on the revoked flag. Returns `false` when the
    /// record is unknown or already revoked (idempotent, not an error).
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn revoke(&self, token_hash: &str) -> AuthResult<bool>;

    /// Revokes every active record owned by `user_id`.
    ///
    /// Must be atomic with respect to concurrent
    /// [`find_by_hash`](TokenStorage::find_by_hash) and
    /// [`revoke`](TokenStorage::revoke) calls: once this returns, no
    /// subsequent lookup observes an active record for the user.
    ///
    /// # Returns
    ///
    /// The number of records revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn revoke_all_by_user(&self, user_id: Uuid) -> AuthResult<u64>;

    /// Lists the records still presentable by `user_id` at `now`.
    ///
    /// Useful for session management surfaces.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list_active_by_user(
        &self,
        user_id: Uuid,
        now: time::OffsetDateTime,
    ) -> AuthResult<Vec<RefreshTokenRecord>>;
}
