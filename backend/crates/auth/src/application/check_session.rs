//! Check Session Use Case
//!
//! Resolves a session cookie or a bearer token to a user. A session is
//! valid only while its server-side expiry has not passed; expired records
//! are deleted on sight rather than renewed.

use std::sync::Arc;

use chrono::Utc;
use platform::token;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Session, User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use kernel::id::UserId;

/// Check session use case
pub struct CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Resolve a session token to its live session record
    pub async fn session(&self, session_token: &str) -> AuthResult<Session> {
        let value = token::verify_opaque(&self.config.token_secret, session_token)
            .map_err(|_| AuthError::Unauthenticated)?;

        let session_id: Uuid = value.parse().map_err(|_| AuthError::Unauthenticated)?;

        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        if session.is_expired() {
            // Lazy sweep; the periodic cleanup catches the rest
            self.session_repo.delete(session_id).await?;
            return Err(AuthError::Unauthenticated);
        }

        Ok(session)
    }

    /// Resolve a session token to the session and its user
    pub async fn authenticate(&self, session_token: &str) -> AuthResult<(Session, User)> {
        let session = self.session(session_token).await?;

        let user = self
            .user_repo
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        Ok((session, user))
    }

    /// Resolve a bearer token to its user
    ///
    /// Expiry is embedded in the token, so no session record is consulted.
    pub async fn authenticate_bearer(&self, bearer_token: &str) -> AuthResult<User> {
        let claims = token::verify_expiring(
            &self.config.token_secret,
            bearer_token,
            Utc::now().timestamp_millis(),
        )
        .map_err(|_| AuthError::Unauthenticated)?;

        let user_id: UserId = claims
            .subject
            .parse()
            .map_err(|_| AuthError::Unauthenticated)?;

        self.user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}
