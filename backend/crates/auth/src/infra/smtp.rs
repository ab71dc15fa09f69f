//! SMTP Welcome Notifier
//!
//! Sends the post-sign-up welcome mail over an SMTP relay (STARTTLS).

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::application::notify::{NotifyError, WelcomeNotifier};
use crate::domain::value_object::Email;

/// SMTP relay configuration
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    /// From address, e.g. `"Shop <shop@example.com>"`
    pub from_address: String,
}

/// Welcome notifier backed by an SMTP relay
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    pub fn new(config: &MailerConfig) -> Result<Self, NotifyError> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| NotifyError(format!("SMTP relay setup failed: {}", e)))?
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl WelcomeNotifier for SmtpNotifier {
    async fn send_welcome(&self, to: &Email) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| NotifyError(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|e| NotifyError(format!("Invalid recipient address: {}", e)))?)
            .subject("Signup succeeded!")
            .header(ContentType::TEXT_HTML)
            .body("<h1>You successfully signed up!</h1>".to_string())
            .map_err(|e| NotifyError(format!("Failed to build message: {}", e)))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| NotifyError(format!("SMTP send failed: {}", e)))?;

        tracing::debug!(to = %to, "Welcome mail sent");
        Ok(())
    }
}
