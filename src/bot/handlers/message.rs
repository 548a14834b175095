use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use crate::bot::commands::Command;
use crate::bot::handlers::{apply_turn, user_action, HandlerResult, QuizDialogue};
use crate::quiz::{Continuation, QuizController};
use crate::utils::feedback::CommandFeedback;

pub async fn command_handler(
    bot: Bot,
    dialogue: QuizDialogue,
    state: Continuation,
    msg: Message,
    cmd: Command,
    controller: Arc<QuizController>,
) -> HandlerResult {
    match cmd {
        Command::Help => {
            CommandFeedback::new(bot, msg.chat.id)
                .info(&Command::descriptions().to_string())
                .await?;
        }
        Command::Start => {
            let Some(action) = user_action(&msg) else {
                return Ok(());
            };
            let turn = controller.begin(&action).await;
            apply_turn(&bot, &msg, &dialogue, turn).await?;
        }
        Command::Rating => {
            let Some(action) = user_action(&msg) else {
                return Ok(());
            };
            let turn = controller.show_rating(&action, state).await;
            apply_turn(&bot, &msg, &dialogue, turn).await?;
        }
    }
    Ok(())
}
