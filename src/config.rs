use anyhow::{anyhow, Result};
use std::env;

/// Words are retired for a user after this many correct answers.
pub const DEFAULT_EXPOSURE_THRESHOLD: i64 = 4;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/quiz.db";
pub const DEFAULT_WORD_LIST_PATH: &str = "./russian_english_words.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    /// Delimited `source,translation` list used as the bulk word source
    pub word_list_path: String,
    pub exposure_threshold: i64,
    /// SQLite file backing the per-chat dialogue state
    pub dialogue_db_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = Self::database_url_from_env();

        let port_str = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let word_list_path = Self::word_list_path_from_env();
        let dialogue_db_path = var_or_default("DIALOGUE_DB_PATH", "./data/dialogues.sqlite");

        let exposure_threshold = match env::var("EXPOSURE_THRESHOLD") {
            Ok(raw) if !raw.trim().is_empty() => raw.trim()
                .parse::<i64>()
                .ok()
                .filter(|threshold| *threshold >= 1)
                .ok_or_else(|| anyhow!("Invalid EXPOSURE_THRESHOLD"))?,
            _ => DEFAULT_EXPOSURE_THRESHOLD,
        };

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            word_list_path,
            exposure_threshold,
            dialogue_db_path,
        })
    }

    /// `DATABASE_URL` alone, for tools that never talk to Telegram.
    pub fn database_url_from_env() -> String {
        var_or_default("DATABASE_URL", DEFAULT_DATABASE_URL)
    }

    pub fn word_list_path_from_env() -> String {
        var_or_default("WORD_LIST_PATH", DEFAULT_WORD_LIST_PATH)
    }
}

fn var_or_default(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}
