use std::collections::HashMap;

use async_trait::async_trait;
use teloxide::{prelude::*, types::MessageId};
use tokio::sync::Mutex;

use super::{Notification, NotificationSink, NotificationSinkError};

const MAX_TRACKED_TAGS: usize = 64;

/// Delivers notifications to a single Telegram chat. A notification whose tag
/// was already delivered edits the earlier message instead of posting again.
pub struct TelegramNotificationSink {
    bot: Bot,
    chat_id: ChatId,
    sent_messages: Mutex<HashMap<String, MessageId>>,
}

impl TelegramNotificationSink {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
            sent_messages: Mutex::new(HashMap::new()),
        }
    }

    pub fn create(token: String, chat_id: i64) -> Self {
        Self::new(Bot::new(token), chat_id)
    }
}

#[async_trait]
impl NotificationSink for TelegramNotificationSink {
    async fn send_notification(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationSinkError> {
        let text = message_text(notification);
        let known_message = self
            .sent_messages
            .lock()
            .await
            .get(&notification.tag)
            .copied();

        if let Some(message_id) = known_message {
            self.bot
                .edit_message_text(self.chat_id, message_id, text)
                .await?;
            return Ok(());
        }

        let message = self.bot.send_message(self.chat_id, text).await?;
        remember_message(
            &mut *self.sent_messages.lock().await,
            notification.tag.clone(),
            message.id,
        );

        log::info!(
            "Delivered notification to Telegram. [chat_id = {}, tag = {}]",
            self.chat_id.0,
            notification.tag
        );
        Ok(())
    }
}

fn message_text(notification: &Notification) -> String {
    format!("{}\n{}", notification.title, notification.body)
}

fn remember_message(
    sent_messages: &mut HashMap<String, MessageId>,
    tag: String,
    message_id: MessageId,
) {
    if sent_messages.len() >= MAX_TRACKED_TAGS && !sent_messages.contains_key(&tag) {
        sent_messages.clear();
    }
    sent_messages.insert(tag, message_id);
}
