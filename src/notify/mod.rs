//! Outbound notification channels.
//!
//! Channels are configured purely through environment variables; a channel
//! with missing credentials is silently disabled so that alerting stays
//! opt-in.

pub mod email;
pub mod telegram;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::StatusChange;

// Re-export for convenience
pub use email::EmailNotifier;
pub use telegram::TelegramNotifier;

/// A channel that can deliver a status-change alert.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &'static str;

    /// Deliver a raw message. `subject` is used only by channels that
    /// have one; chat channels take the HTML body, email the plain one.
    async fn send(&self, subject: &str, body_html: &str, body_text: &str) -> Result<()>;

    /// Deliver a formatted status-change alert.
    async fn notify(&self, change: &StatusChange) -> Result<()> {
        self.send(
            &change.subject(),
            &change.html_message(),
            &change.text_message(),
        )
        .await
    }
}

/// Build every notifier whose credentials are present in the environment.
pub fn from_env() -> Vec<Box<dyn Notifier>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();

    match TelegramNotifier::from_env() {
        Some(notifier) => notifiers.push(Box::new(notifier)),
        None => log::debug!("Telegram credentials not set, channel disabled"),
    }
    match EmailNotifier::from_env() {
        Some(notifier) => notifiers.push(Box::new(notifier)),
        None => log::debug!("Email credentials not set, channel disabled"),
    }

    notifiers
}

/// Names of the channels that are currently configured.
pub fn configured_channels() -> Vec<&'static str> {
    from_env().iter().map(|n| n.name()).collect()
}

/// Deliver a change through every channel.
///
/// Delivery failures are logged and do not abort the run; returns the number
/// of successful sends.
pub async fn dispatch(notifiers: &[Box<dyn Notifier>], change: &StatusChange) -> usize {
    let mut sent = 0;
    for notifier in notifiers {
        match notifier.notify(change).await {
            Ok(()) => {
                log::info!("{} alert sent for {}", notifier.name(), change.name);
                sent += 1;
            }
            Err(error) => {
                log::error!(
                    "{} alert failed for {}: {}",
                    notifier.name(),
                    change.name,
                    error
                );
            }
        }
    }
    sent
}
