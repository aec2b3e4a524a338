//! In-memory refresh token store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use ferrobank_auth::storage::token::TokenStorage;
use ferrobank_auth::types::refresh_token::RefreshTokenRecord;
use ferrobank_auth::{AuthError, AuthResult};

/// Refresh token records keyed by token hash.
///
/// All mutation happens under one write lock, which gives the two
/// guarantees the core relies on: [`revoke`](TokenStorage::revoke) is a
/// compare-and-set on the revoked flag, and once
/// [`revoke_all_by_user`](TokenStorage::revoke_all_by_user) returns, no
/// lookup observes an active record for that user. Records are never
/// removed; revoked and expired entries stay behind for audit.
#[derive(Default)]
pub struct InMemoryTokenStorage {
    records: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryTokenStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, regardless of state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TokenStorage for InMemoryTokenStorage {
    async fn create(&self, record: &RefreshTokenRecord) -> AuthResult<()> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if records.contains_key(&record.token_hash) {
            return Err(AuthError::storage("duplicate token hash"));
        }
        records.insert(record.token_hash.clone(), record.clone());
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshTokenRecord>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token_hash)
            .cloned())
    }

    async fn revoke(&self, token_hash: &str) -> AuthResult<bool> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match records.get_mut(token_hash) {
            Some(record) if record.revoked_at.is_none() => {
                record.revoked_at = Some(OffsetDateTime::now_utc());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_by_user(&self, user_id: Uuid) -> AuthResult<u64> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let now = OffsetDateTime::now_utc();
        let mut count = 0;
        for record in records.values_mut() {
            if record.user_id == user_id && record.revoked_at.is_none() {
                record.revoked_at = Some(now);
                count += 1;
            }
        }
        Ok(count)
    }

    async fn list_active_by_user(
        &self,
        user_id: Uuid,
        now: OffsetDateTime,
    ) -> AuthResult<Vec<RefreshTokenRecord>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|r| r.user_id == user_id && r.is_active(now))
            .cloned()
            .collect())
    }
}
