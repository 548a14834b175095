/// Telegram command definitions
pub mod commands;
/// Dispatcher schema and update handlers
pub mod handlers;
