pub mod general_message;
pub mod message;

use std::sync::Arc;
use teloxide::{
    dispatching::{dialogue::ErasedStorage, HandlerExt, UpdateFilterExt, UpdateHandler},
    dptree,
    prelude::{Dialogue, Requester},
    types::{Message, Update},
    Bot,
};
use crate::bot::commands::Command;
use crate::quiz::{Continuation, QuizController, Turn, UserAction};
use crate::utils::feedback::CommandFeedback;
use crate::utils::validation::validate_telegram_user_id;

/// Per-chat dialogue holding the pending [`Continuation`].
pub type QuizDialogue = Dialogue<Continuation, ErasedStorage<Continuation>>;
pub type DialogueStorage = Arc<ErasedStorage<Continuation>>;
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub struct BotHandler {
    pub controller: Arc<QuizController>,
}

impl BotHandler {
    pub fn new(controller: Arc<QuizController>) -> Self {
        Self { controller }
    }

    /// Commands are matched first so `/start` works from any state; every
    /// other message goes to the quiz loop.
    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        let controller = self.controller.clone();
        let controller_message = self.controller.clone();

        // Quiz state is kept per chat, so only private chats take part
        Update::filter_message()
            .filter(|msg: Message| msg.chat.is_private())
            .enter_dialogue::<Message, ErasedStorage<Continuation>, Continuation>()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(
                        move |bot: Bot,
                              dialogue: QuizDialogue,
                              state: Continuation,
                              msg: Message,
                              cmd: Command| {
                            let controller = controller.clone();
                            async move {
                                message::command_handler(bot, dialogue, state, msg, cmd, controller)
                                    .await
                            }
                        },
                    ),
            )
            .branch(dptree::endpoint(
                move |bot: Bot, dialogue: QuizDialogue, state: Continuation, msg: Message| {
                    let controller = controller_message.clone();
                    async move {
                        general_message::handle_general_message(bot, dialogue, state, msg, controller)
                            .await
                    }
                },
            ))
    }
}

/// Builds the controller input from a Telegram message. Messages without a
/// sender are ignored.
pub fn user_action(msg: &Message) -> Option<UserAction> {
    let user = msg.from()?;
    let external_id = i64::try_from(user.id.0).ok()?;

    action_for(external_id, msg.chat.id.0, msg.text().unwrap_or_default())
}

/// Accepts a message as a quiz turn only when it comes from a valid user in
/// their own private chat, where the chat id equals the user id.
pub fn action_for(external_id: i64, chat_id: i64, text: &str) -> Option<UserAction> {
    if let Err(e) = validate_telegram_user_id(external_id) {
        tracing::warn!("Ignoring message from user {}: {}", external_id, e);
        return None;
    }

    if chat_id != external_id {
        tracing::debug!("Ignoring message from user {} in shared chat {}", external_id, chat_id);
        return None;
    }

    Some(UserAction::new(external_id, chat_id, text))
}

/// Stores the next continuation, then sends the replies.
pub async fn apply_turn(
    bot: &Bot,
    msg: &Message,
    dialogue: &QuizDialogue,
    turn: Turn,
) -> HandlerResult {
    if turn.next == Continuation::Idle {
        dialogue.exit().await?;
    } else {
        dialogue.update(turn.next).await?;
    }

    if turn.replies.is_empty() {
        return Ok(());
    }

    bot.send_chat_action(msg.chat.id, teloxide::types::ChatAction::Typing).await?;
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    feedback.deliver_all(&turn.replies).await?;
    Ok(())
}
