use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Vocabulary Quiz Bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start or resume the game")]
    Start,
    #[command(description = "Show the leaderboard")]
    Rating,
}
