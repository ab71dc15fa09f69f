//! Welcome Notifications
//!
//! Sign-up sends a welcome message on a background task. Delivery failures
//! are logged and never fail the sign-up itself, so the trait sits behind
//! `Arc<dyn WelcomeNotifier>` and implementations decide the transport
//! (SMTP in production, log-only in development and tests).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::value_object::Email;

/// Notification delivery error
#[derive(Debug, Error)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

/// Sends the post-sign-up welcome message
#[async_trait]
pub trait WelcomeNotifier: Send + Sync {
    async fn send_welcome(&self, to: &Email) -> Result<(), NotifyError>;
}

/// Notifier that only logs, for environments without an SMTP relay
#[derive(Debug, Clone, Default)]
pub struct LogOnlyNotifier;

#[async_trait]
impl WelcomeNotifier for LogOnlyNotifier {
    async fn send_welcome(&self, to: &Email) -> Result<(), NotifyError> {
        tracing::info!(to = %to, "Welcome notification (log only)");
        Ok(())
    }
}
