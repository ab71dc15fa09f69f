//! Repository Traits
//!
//! Persistence interfaces for the auth domain. Implemented by
//! `infra::postgres::PgAuthRepository` (production) and
//! `infra::memory::InMemoryAuthRepository` (tests).

use uuid::Uuid;

use kernel::id::UserId;

use crate::domain::entity::{Cart, Session, User};
use crate::domain::value_object::Email;
use crate::error::AuthResult;

/// User persistence operations
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find a user by id
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Replace the user's cart if `expected_version` still matches
    ///
    /// Returns `false` when another writer bumped the version first; the
    /// caller re-reads and retries.
    async fn update_cart(
        &self,
        user_id: &UserId,
        cart: &Cart,
        expected_version: i64,
    ) -> AuthResult<bool>;
}

/// Session persistence operations
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Persist a new session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find a session by id
    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>>;

    /// Delete a session (no-op when absent)
    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Delete all expired sessions, returning how many were removed
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
