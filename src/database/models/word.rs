use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;

use crate::database::error::StoreError;
use crate::utils::logging::log_database_operation;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub source_text: String,
    pub translation: String,
}

impl Word {
    pub async fn find_id_by_text(
        pool: &sqlx::SqlitePool,
        source_text: &str,
    ) -> Result<Option<i64>, StoreError> {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM words WHERE source_text = ?")
            .bind(source_text)
            .fetch_optional(pool)
            .await?;

        Ok(id)
    }

    /// Inserts a new word. Callers check [`Word::find_id_by_text`] first; an
    /// existing source text fails with [`StoreError::Duplicate`].
    pub async fn create(
        pool: &sqlx::SqlitePool,
        source_text: &str,
        translation: &str,
    ) -> Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO words (source_text, translation) VALUES (?, ?)")
            .bind(source_text)
            .bind(translation)
            .execute(pool)
            .await
            .map_err(|e| StoreError::from_insert(e, &format!("word '{source_text}'")))?;

        log_database_operation("INSERT", "words", Some(source_text));
        Ok(result.last_insert_rowid())
    }

    /// Up to `count` random words the user has seen fewer than `threshold`
    /// times. Returns fewer when not enough are eligible.
    pub async fn draw_unexhausted(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        count: usize,
        threshold: i64,
    ) -> Result<Vec<Self>, StoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let words = sqlx::query_as::<_, Word>(
            r#"
            SELECT w.id, w.source_text, w.translation
            FROM words w
            WHERE w.id NOT IN (
                SELECT e.word_id
                FROM exposures e
                WHERE e.user_id = ?
                GROUP BY e.word_id
                HAVING SUM(e.times_shown) >= ?
            )
            ORDER BY RANDOM()
            LIMIT ?
            "#
        )
        .bind(user_id)
        .bind(threshold)
        .bind(count as i64)
        .fetch_all(pool)
        .await?;

        Ok(words)
    }

    /// Source texts the user has already seen `threshold` times or more.
    pub async fn exhausted_texts(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        threshold: i64,
    ) -> Result<HashSet<String>, StoreError> {
        let texts = sqlx::query_scalar::<_, String>(
            r#"
            SELECT w.source_text
            FROM words w
            JOIN exposures e ON e.word_id = w.id
            WHERE e.user_id = ? AND e.times_shown >= ?
            "#
        )
        .bind(user_id)
        .bind(threshold)
        .fetch_all(pool)
        .await?;

        Ok(texts.into_iter().collect())
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM words")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
