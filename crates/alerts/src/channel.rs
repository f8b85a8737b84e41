//! Notification channel seam.

use crate::format::MessageFormat;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Authentication rejected (HTTP {0})")]
    Auth(u16),
    #[error("Post rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

/// A place alerts get posted to.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Text format this channel expects.
    fn format(&self) -> MessageFormat;

    /// Post already-formatted text.
    async fn post(&self, message: &str) -> Result<(), ChannelError>;
}
