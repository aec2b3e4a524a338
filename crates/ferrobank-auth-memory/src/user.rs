//! In-memory user store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use ferrobank_auth::storage::user::{User, UserStorage};
use ferrobank_auth::{AuthError, AuthResult};

/// Users keyed by id, with e-mail uniqueness enforced on create.
#[derive(Default)]
pub struct InMemoryUserStorage {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a user, returning `true` if one was present.
    ///
    /// Not part of the core storage contract; test harnesses use it to
    /// simulate accounts vanishing between issuance and refresh.
    pub fn remove(&self, user_id: Uuid) -> bool {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&user_id)
            .is_some()
    }
}

#[async_trait]
impl UserStorage for InMemoryUserStorage {
    async fn find_by_id(&self, user_id: Uuid) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> AuthResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::storage("duplicate e-mail"));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use ferrobank_auth::storage::user::Role;

    use super::*;

    fn test_user(email: &str) -> User {
        User::new(
            email,
            "$argon2id$fake",
            "Ada",
            "Lovelace",
            vec![Role::User],
            OffsetDateTime::now_utc(),
        )
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = InMemoryUserStorage::new();
        let user = test_user("a@b.com");
        store.create(&user).await.unwrap();

        assert!(store.exists_by_email("a@b.com").await.unwrap());
        assert_eq!(
            store.find_by_id(user.id).await.unwrap().unwrap().email,
            "a@b.com"
        );
        assert!(store.find_by_email("x@b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_enforces_email_uniqueness() {
        let store = InMemoryUserStorage::new();
        store.create(&test_user("a@b.com")).await.unwrap();

        // Different id, same e-mail.
        let result = store.create(&test_user("a@b.com")).await;
        assert!(matches!(result, Err(AuthError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryUserStorage::new();
        let user = test_user("a@b.com");
        store.create(&user).await.unwrap();

        assert!(store.remove(user.id));
        assert!(!store.remove(user.id));
        assert!(store.find_by_id(user.id).await.unwrap().is_none());
    }
}
