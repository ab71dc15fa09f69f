//! In-Memory Repository Implementation
//!
//! Backing store for tests and local development. The user and session
//! maps share one mutex so the version-checked cart operations are atomic,
//! mirroring the row-level guarantees of the PostgreSQL implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use kernel::id::UserId;

use crate::domain::entity::{Cart, Session, User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, Session>,
}

/// In-memory auth repository
#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AuthResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AuthError::Internal("Repository lock poisoned".to_string()))
    }

    /// Clear the cart if the version still matches, under the same lock
    /// that guards every other user write
    ///
    /// Used by the in-memory order store to commit checkout atomically.
    pub fn clear_cart_if_version(
        &self,
        user_id: &UserId,
        expected_version: i64,
    ) -> AuthResult<bool> {
        let mut inner = self.lock()?;

        let Some(user) = inner.users.get_mut(user_id.as_uuid()) else {
            return Ok(false);
        };

        if user.cart_version != expected_version {
            return Ok(false);
        }

        user.cart = Cart::empty();
        user.cart_version += 1;
        user.updated_at = Utc::now();
        Ok(true)
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut inner = self.lock()?;

        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }

        inner.users.insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.lock()?.users.get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &crate::domain::value_object::Email,
    ) -> AuthResult<Option<User>> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &crate::domain::value_object::Email) -> AuthResult<bool> {
        Ok(self.lock()?.users.values().any(|u| u.email == *email))
    }

    async fn update_cart(
        &self,
        user_id: &UserId,
        cart: &Cart,
        expected_version: i64,
    ) -> AuthResult<bool> {
        let mut inner = self.lock()?;

        let Some(user) = inner.users.get_mut(user_id.as_uuid()) else {
            return Ok(false);
        };

        if user.cart_version != expected_version {
            return Ok(false);
        }

        user.cart = cart.clone();
        user.cart_version += 1;
        user.updated_at = Utc::now();
        Ok(true)
    }
}

impl SessionRepository for InMemoryAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        self.lock()?
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
        Ok(self.lock()?.sessions.get(&session_id).cloned())
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        self.lock()?.sessions.remove(&session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut inner = self.lock()?;

        let before = inner.sessions.len();
        inner.sessions.retain(|_, s| s.expires_at_ms >= now_ms);

        Ok((before - inner.sessions.len()) as u64)
    }
}
