//! Outbound mail delivery.
//!
//! Messages are delivered through an HTTP mail-provider API. When mail is
//! disabled in configuration (the default, and the mode used by tests) the
//! service logs the message instead of performing network I/O.

use thiserror::Error;
use tracing::{debug, info};

use crate::config::MailConfig;

use super::message::{email_verification_email, password_reset_email, OutboundEmail};

/// Mail delivery errors.
#[derive(Error, Debug)]
pub enum MailError {
    /// The provider request failed at the transport level.
    #[error("mail transport error: {0}")]
    Transport(String),

    /// The provider rejected the message.
    #[error("mail provider rejected message: status {0}")]
    Rejected(u16),
}

/// Service for sending account emails.
#[derive(Debug, Clone)]
pub struct MailService {
    config: MailConfig,
    client: reqwest::Client,
}

impl MailService {
    /// Create a mail service from configuration.
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a disabled mail service (logs instead of sending).
    pub fn disabled() -> Self {
        Self::new(MailConfig::default())
    }

    /// Whether outbound delivery is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send an email through the provider API.
    pub async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        if !self.config.enabled {
            debug!(to = %email.to, subject = %email.subject, "Mail disabled; skipping send");
            return Ok(());
        }

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status().as_u16()));
        }

        info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }

    /// Send the password-reset email carrying the raw reset token.
    pub async fn send_password_reset(&self, to: &str, raw_token: &str) -> Result<(), MailError> {
        let reset_url = format!("{}/reset-password", self.config.frontend_url);
        let email = password_reset_email(&self.config.from, to, &reset_url, raw_token);
        self.send(&email).await
    }

    /// Send the email-verification email carrying the raw verification token.
    pub async fn send_email_verification(
        &self,
        to: &str,
        raw_token: &str,
    ) -> Result<(), MailError> {
        let verification_url = format!("{}/verify-email", self.config.frontend_url);
        let email = email_verification_email(&self.config.from, to, &verification_url, raw_token);
        self.send(&email).await
    }
}
