use std::sync::Arc;
use teloxide::prelude::*;
use crate::bot::handlers::{apply_turn, user_action, HandlerResult, QuizDialogue};
use crate::quiz::{Continuation, QuizController};
use crate::utils::feedback::CommandFeedback;

/// Feeds a non-command message to the quiz loop.
pub async fn handle_general_message(
    bot: Bot,
    dialogue: QuizDialogue,
    state: Continuation,
    msg: Message,
    controller: Arc<QuizController>,
) -> HandlerResult {
    if msg.text().is_none() {
        // Stickers, photos and the like keep the chat armed for a text reply
        if state != Continuation::Idle {
            let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
            feedback.warning("Пожалуйста, ответьте текстом или кнопкой.").await?;
        }
        return Ok(());
    }

    let Some(action) = user_action(&msg) else {
        return Ok(());
    };

    let turn = controller.step(state, &action).await;
    apply_turn(&bot, &msg, &dialogue, turn).await
}
