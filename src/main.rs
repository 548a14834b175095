//! # Vocabulary Quiz Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database and the
//! bulk word list, and runs the Telegram bot next to the health server.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use teloxide::dispatching::dialogue::{serializer::Json, SqliteStorage, Storage};
use teloxide::prelude::*;
use tracing::{info, warn};

use vocab_quiz_bot::bot::handlers::{BotHandler, DialogueStorage};
use vocab_quiz_bot::config::Config;
use vocab_quiz_bot::database::connection::{ensure_parent_dir, DatabaseManager};
use vocab_quiz_bot::quiz::word_list::WordList;
use vocab_quiz_bot::quiz::{QuizController, QuizSettings};
use vocab_quiz_bot::services::health::HealthService;
use vocab_quiz_bot::utils::logging::{init_tracing, log_system_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Loads .env before building the log filter
    init_tracing();

    let config = Config::from_env()?;

    info!("Starting Vocabulary Quiz Bot v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded - Database: {}, HTTP Port: {}, Word list: {}",
        config.database_url, config.http_port, config.word_list_path);

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // A missing word list is not fatal: rounds then come from the word store only
    let words = match WordList::load(&config.word_list_path) {
        Ok(words) => {
            log_system_event("Word list loaded", Some(&format!("{} pairs", words.len())));
            words
        }
        Err(e) => {
            warn!("Falling back to the word store only: {}", e);
            WordList::default()
        }
    };
    let bulk_words = words.len();

    ensure_parent_dir(Path::new(&config.dialogue_db_path))?;
    let storage: DialogueStorage = SqliteStorage::open(&config.dialogue_db_path, Json)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open dialogue storage: {}", e))?
        .erase();

    // Initialize bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let controller = Arc::new(QuizController::new(
        db_arc.as_ref().clone(),
        Arc::new(words),
        QuizSettings {
            exposure_threshold: config.exposure_threshold,
        },
    ));
    let handler = BotHandler::new(controller);
    info!("Telegram bot initialized successfully");

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone(), bulk_words);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .dependencies(dptree::deps![storage])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    log_system_event("Application stopped", None);
    Ok(())
}
