//! Log In Use Case
//!
//! Verifies credentials and establishes either a cookie session (web
//! surface) or a signed bearer token (programmatic surface).
//!
//! Every failure path collapses to `InvalidCredentials` so the response
//! does not reveal whether the email exists.

use std::sync::Arc;

use chrono::Utc;
use platform::password::ClearTextPassword;
use platform::token;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Session, User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};
use kernel::id::UserId;

/// Log in input
pub struct LogInInput {
    pub email: String,
    pub password: String,
}

/// Log in output (cookie session)
#[derive(Debug)]
pub struct LogInOutput {
    pub user_id: UserId,
    /// Signed session token for the Set-Cookie header
    pub session_token: String,
    /// CSRF token the client must echo on state-changing requests
    pub csrf_token: String,
    pub expires_at_ms: i64,
}

/// Token issuance output (bearer)
#[derive(Debug)]
pub struct IssueTokenOutput {
    pub user_id: UserId,
    pub token: String,
    pub expires_at_ms: i64,
}

/// Log in use case
pub struct LogInUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> LogInUseCase<U, S>
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

    /// Establish a cookie session
    pub async fn execute(&self, input: LogInInput) -> AuthResult<LogInOutput> {
        let user = self.verify_credentials(input.email, input.password).await?;

        let session = Session::new(user.user_id, self.config.session_ttl);
        self.session_repo.create(&session).await?;

        let session_token =
            token::sign_opaque(&self.config.token_secret, &session.session_id.to_string());

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LogInOutput {
            user_id: user.user_id,
            session_token,
            csrf_token: session.csrf_token,
            expires_at_ms: session.expires_at_ms,
        })
    }

    /// Issue a signed bearer token with embedded expiry (no server record)
    pub async fn issue_token(&self, input: LogInInput) -> AuthResult<IssueTokenOutput> {
        let user = self.verify_credentials(input.email, input.password).await?;

        let expires_at_ms =
            Utc::now().timestamp_millis() + self.config.bearer_ttl.as_millis() as i64;
        let token = token::sign_expiring(
            &self.config.token_secret,
            &user.user_id.to_string(),
            expires_at_ms,
        );

        tracing::info!(user_id = %user.user_id, "Bearer token issued");

        Ok(IssueTokenOutput {
            user_id: user.user_id,
            token,
            expires_at_ms,
        })
    }

    async fn verify_credentials(&self, email: String, password: String) -> AuthResult<User> {
        let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let raw_password =
            ClearTextPassword::new(password).map_err(|_| AuthError::InvalidCredentials)?;

        if !user
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}
