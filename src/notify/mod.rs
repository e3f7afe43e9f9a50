//! Outbound notifications.
//!
//! Defines the `Notifier` trait, the Telegram implementation, and the
//! HTML message formatting shared by the cycle engine and the binaries.

pub mod format;
pub mod telegram;

use async_trait::async_trait;

use crate::types::NewsBotError;

/// Delivers pre-formatted text to a chat destination.
///
/// `Ok(())` means the endpoint accepted the message. Any error means it
/// was not delivered and the caller must not record the article as sent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NewsBotError>;
}
