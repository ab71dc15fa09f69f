//! Sign Up Use Case
//!
//! Creates a new user account and dispatches the welcome notification.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::notify::WelcomeNotifier;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};
use kernel::id::UserId;

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user_id: UserId,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    notifier: Arc<dyn WelcomeNotifier>,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        notifier: Arc<dyn WelcomeNotifier>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            notifier,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        // Validate email
        let email =
            Email::new(input.email).map_err(|e| AuthError::Validation(e.message().to_string()))?;

        // Fast pre-check; the unique index is the real guard against races
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        // Validate and hash password
        let raw_password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::PasswordPolicy(e.to_string()))?;
        let password_hash = raw_password
            .hash(self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // Create and persist
        let user = User::new(email.clone(), password_hash);
        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.user_id, "User signed up");

        // Fire-and-forget: a failed welcome mail must not fail the sign-up
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_welcome(&email).await {
                tracing::warn!(error = %e, "Failed to send welcome notification");
            }
        });

        Ok(SignUpOutput {
            user_id: user.user_id,
        })
    }
}
