//! Telegram channel.

use crate::channel::{Channel, ChannelError};
use crate::format::MessageFormat;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

/// Posts HTML alerts to a single Telegram chat.
pub struct TelegramChannel {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramChannel {
    /// Create a channel with the given bot token and target chat.
    pub fn new(token: &str, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn format(&self) -> MessageFormat {
        MessageFormat::Html
    }

    async fn post(&self, message: &str) -> Result<(), ChannelError> {
        self.bot
            .send_message(self.chat_id, message)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}
