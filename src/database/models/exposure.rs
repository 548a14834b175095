use crate::database::error::StoreError;
use crate::utils::logging::log_database_operation;

/// Per (user, word) counter of correct answers.
pub struct Exposure;

impl Exposure {
    /// Increments the counter, creating the row at 1 when absent.
    pub async fn record(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        word_id: i64,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO exposures (user_id, word_id, times_shown)
            VALUES (?, ?, 1)
            ON CONFLICT (user_id, word_id) DO UPDATE SET times_shown = times_shown + 1
            "#
        )
        .bind(user_id)
        .bind(word_id)
        .execute(pool)
        .await?;

        log_database_operation(
            "UPSERT",
            "exposures",
            Some(&format!("user_id={user_id} word_id={word_id}")),
        );
        Ok(())
    }

    /// Creates the row at 0 the first time a word is shown; leaves an
    /// existing counter untouched.
    pub async fn ensure(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        word_id: i64,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT OR IGNORE INTO exposures (user_id, word_id, times_shown) VALUES (?, ?, 0)"
        )
        .bind(user_id)
        .bind(word_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn times_shown(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        word_id: i64,
    ) -> Result<i64, StoreError> {
        let times = sqlx::query_scalar::<_, i64>(
            "SELECT times_shown FROM exposures WHERE user_id = ? AND word_id = ?"
        )
        .bind(user_id)
        .bind(word_id)
        .fetch_optional(pool)
        .await?;

        Ok(times.unwrap_or(0))
    }
}
