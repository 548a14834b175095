use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode};
use crate::quiz::state::{Keyboard, Reply};
use crate::utils::markdown::escape_markdown;

/// Feedback types for messages outside the quiz flow
#[derive(Debug, Clone)]
pub enum FeedbackType {
    Info,
    Warning,
}

impl FeedbackType {
    fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Info => "ℹ️",
            FeedbackType::Warning => "⚠️",
        }
    }
}

/// Sends bot output to one chat
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
}

impl CommandFeedback {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    /// Send a plain-text notice, escaping it for MarkdownV2
    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        let formatted_message = format!("{} {}", feedback_type.emoji(), escape_markdown(message));

        self.bot
            .send_message(self.chat_id, formatted_message)
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    /// Send info feedback
    pub async fn info(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Info, message).await
    }

    /// Send warning feedback
    pub async fn warning(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Warning, message).await
    }

    /// Deliver a controller reply; its text is already MarkdownV2
    pub async fn deliver(&self, reply: &Reply) -> ResponseResult<Message> {
        let request = self
            .bot
            .send_message(self.chat_id, reply.text.clone())
            .parse_mode(ParseMode::MarkdownV2);

        match &reply.keyboard {
            Some(Keyboard::Options(options)) => request.reply_markup(options_keyboard(options)).await,
            Some(Keyboard::Remove) => request.reply_markup(KeyboardRemove::new()).await,
            None => request.await,
        }
    }

    /// Deliver every reply of a turn in order
    pub async fn deliver_all(&self, replies: &[Reply]) -> ResponseResult<()> {
        for reply in replies {
            self.deliver(reply).await?;
        }
        Ok(())
    }
}

/// One answer per row, resized to fit
pub fn options_keyboard(options: &[String]) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = options
        .iter()
        .map(|option| vec![KeyboardButton::new(option.clone())])
        .collect();

    KeyboardMarkup::new(rows).resize_keyboard(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_emojis() {
        assert_eq!(FeedbackType::Info.emoji(), "ℹ️");
        assert_eq!(FeedbackType::Warning.emoji(), "⚠️");
    }

    #[test]
    fn test_options_keyboard_one_button_per_row() {
        let options = vec!["Tree".to_string(), "World".to_string(), "🏆 Рейтинг".to_string()];
        let keyboard = options_keyboard(&options);

        assert_eq!(keyboard.keyboard.len(), 3);
        assert!(keyboard.keyboard.iter().all(|row| row.len() == 1));
        assert_eq!(keyboard.keyboard[1][0].text, "World");
    }
}
