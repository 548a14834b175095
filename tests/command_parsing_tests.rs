use teloxide::utils::command::BotCommands;
use vocab_quiz_bot::bot::commands::Command;

#[cfg(test)]
mod command_parsing_tests {
    use super::*;

    #[test]
    fn test_help_command_parsing() {
        let result = Command::parse("/help", "quizbot");
        assert!(matches!(result, Ok(Command::Help)));
    }

    #[test]
    fn test_start_command_parsing() {
        let result = Command::parse("/start", "quizbot");
        assert!(matches!(result, Ok(Command::Start)));
    }

    #[test]
    fn test_rating_command_parsing() {
        let result = Command::parse("/rating", "quizbot");
        assert!(matches!(result, Ok(Command::Rating)));
    }

    #[test]
    fn test_command_with_bot_mention() {
        let result = Command::parse("/start@quizbot", "quizbot");
        assert!(matches!(result, Ok(Command::Start)));

        // Addressed to a different bot
        assert!(Command::parse("/start@otherbot", "quizbot").is_err());
    }

    #[test]
    fn test_answers_are_not_commands() {
        for text in ["World", "🏆 Рейтинг", "▶️ Продолжить игру", "rating"] {
            assert!(Command::parse(text, "quizbot").is_err(), "parsed {text} as a command");
        }
    }

    #[test]
    fn test_unknown_command() {
        assert!(Command::parse("/schedule", "quizbot").is_err());
    }

    #[test]
    fn test_descriptions_list_every_command() {
        let help = Command::descriptions().to_string();
        assert!(help.contains("/help"));
        assert!(help.contains("/start"));
        assert!(help.contains("/rating"));
    }
}
