//! # Vocabulary Quiz Bot
//!
//! A Telegram bot that drills Russian-English vocabulary one question at a time.
//!
//! ## Features
//! - Multiple-choice rounds built from a bulk word list and the word store
//! - Words retire for a player after a fixed number of correct answers
//! - Signed score per player (+1 right, -3 wrong)
//! - Leaderboard relative to the player asking for it
//! - Persistent storage with SQLite

/// Bot command handlers and message processing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Quiz rounds, rating and the per-user turn controller
pub mod quiz;
/// HTTP health probes
pub mod services;
/// Utility functions for validation, formatting and logging
pub mod utils;
