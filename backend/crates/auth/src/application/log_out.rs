//! Log Out Use Case
//!
//! Destroys the server-side session. Idempotent: an invalid, expired or
//! already-destroyed token still succeeds, the cookie gets cleared either
//! way.

use std::sync::Arc;

use platform::token;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Log out use case
pub struct LogOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LogOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, session_token: &str) -> AuthResult<()> {
        let value = match token::verify_opaque(&self.config.token_secret, session_token) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session token on logout");
                return Ok(());
            }
        };

        let session_id: Uuid = match value.parse() {
            Ok(id) => id,
            Err(_) => return Ok(()),
        };

        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "Session destroyed");

        Ok(())
    }
}
