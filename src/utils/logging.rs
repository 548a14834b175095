use tracing::{error, info, warn, debug};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "vocab_quiz_bot=debug,tower_http=debug";

/// Loads `.env` and installs the global subscriber. `.env` is read first so a
/// `RUST_LOG` set there reaches the filter.
pub fn init_tracing() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// `RUST_LOG` if set and valid, otherwise [`DEFAULT_LOG_FILTER`].
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Logs the start of a quiz turn with consistent format
pub fn log_turn_start(step: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "TURN_START: {} for user {} in chat {} - {}",
            step, user_id, chat_id, d
        ),
        None => info!(
            "TURN_START: {} for user {} in chat {}",
            step, user_id, chat_id
        ),
    }
}

/// Logs the outcome of a quiz turn with consistent format
pub fn log_turn_success(step: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "TURN_SUCCESS: {} for user {} in chat {} - {}",
            step, user_id, chat_id, d
        ),
        None => info!(
            "TURN_SUCCESS: {} for user {} in chat {}",
            step, user_id, chat_id
        ),
    }
}

/// Logs a turn aborted by a storage failure
pub fn log_turn_error(step: &str, user_id: i64, chat_id: i64, error: &str) {
    error!(
        "TURN_ERROR: {} for user {} in chat {} - {}",
        step, user_id, chat_id, error
    );
}

/// Logs rejected user input
pub fn log_validation_error(field: &str, value: &str, error: &str, user_id: i64, chat_id: i64) {
    warn!(
        "VALIDATION_ERROR: field '{}' value '{}' invalid: {} - user {} in chat {}",
        field, value, error, user_id, chat_id
    );
}

/// Logs database operations with consistent format
pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

/// Logs database errors with consistent format
pub fn log_database_error(operation: &str, table: &str, error: &str, details: Option<&str>) {
    match details {
        Some(d) => error!("DB_ERROR: {} on {} failed: {} - {}", operation, table, error, d),
        None => error!("DB_ERROR: {} on {} failed: {}", operation, table, error),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_filter_reads_rust_log_from_dotenv_file() {
        std::env::remove_var("RUST_LOG");
        assert!(log_filter().to_string().contains("tower_http=debug"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "RUST_LOG=vocab_quiz_bot=warn").unwrap();
        dotenvy::from_path(file.path()).unwrap();

        let filter = log_filter().to_string();
        assert!(filter.contains("vocab_quiz_bot=warn"));
        assert!(!filter.contains("tower_http"));

        std::env::remove_var("RUST_LOG");
    }
}
