// src/notify/email.rs

//! SMTP email channel.
//!
//! Delivers through a STARTTLS relay (Gmail by default), authenticating with
//! the sender address and an app password.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::notify::Notifier;

const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Sends alerts as plain-text email over SMTP.
pub struct EmailNotifier {
    from: String,
    password: String,
    to: String,
    server: String,
    port: u16,
}

impl EmailNotifier {
    /// Build from `EMAIL_FROM` / `EMAIL_PASSWORD` / `EMAIL_TO`, if all are
    /// set. `SMTP_SERVER` and `SMTP_PORT` override the Gmail defaults.
    pub fn from_env() -> Option<Self> {
        let from = std::env::var("EMAIL_FROM").ok()?;
        let password = std::env::var("EMAIL_PASSWORD").ok()?;
        let to = std::env::var("EMAIL_TO").ok()?;
        if from.is_empty() || password.is_empty() || to.is_empty() {
            return None;
        }

        let server =
            std::env::var("SMTP_SERVER").unwrap_or_else(|_| DEFAULT_SMTP_SERVER.to_string());
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);

        Some(Self {
            from,
            password,
            to,
            server,
            port,
        })
    }

    fn mailbox(address: &str) -> Result<Mailbox> {
        address
            .parse()
            .map_err(|e| AppError::notify("email", format!("invalid address {address}: {e}")))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, subject: &str, _body_html: &str, body_text: &str) -> Result<()> {
        let message = Message::builder()
            .from(Self::mailbox(&self.from)?)
            .to(Self::mailbox(&self.to)?)
            .subject(subject)
            .body(body_text.to_string())
            .map_err(|e| AppError::notify("email", e))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.server)
            .map_err(|e| AppError::notify("email", e))?
            .port(self.port)
            .credentials(Credentials::new(self.from.clone(), self.password.clone()))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| AppError::notify("email", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_parses_plain_address() {
        assert!(EmailNotifier::mailbox("alerts@example.com").is_ok());
    }

    #[test]
    fn test_mailbox_parses_named_address() {
        assert!(EmailNotifier::mailbox("Stock Monitor <alerts@example.com>").is_ok());
    }

    #[test]
    fn test_mailbox_rejects_garbage() {
        assert!(EmailNotifier::mailbox("not-an-address").is_err());
    }
}
