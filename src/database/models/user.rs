use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::error::StoreError;
use crate::utils::logging::log_database_operation;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub external_id: i64, // telegram user id
    pub name: String,
    pub score: i64,
}

impl User {
    pub async fn find_by_external_id(
        pool: &sqlx::SqlitePool,
        external_id: i64,
    ) -> Result<Option<Self>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, external_id, name, score FROM users WHERE external_id = ?"
        )
        .bind(external_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn create(
        pool: &sqlx::SqlitePool,
        name: &str,
        external_id: i64,
    ) -> Result<Self, StoreError> {
        sqlx::query("INSERT INTO users (external_id, name, score) VALUES (?, ?, 0)")
            .bind(external_id)
            .bind(name)
            .execute(pool)
            .await
            .map_err(|e| StoreError::from_insert(e, &format!("user {external_id}")))?;

        log_database_operation("INSERT", "users", Some(&format!("external_id={external_id}")));

        Self::find_by_external_id(pool, external_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {external_id}")))
    }

    /// Adds or subtracts `delta` in one UPDATE statement. Scores may go
    /// negative.
    pub async fn adjust_score(
        pool: &sqlx::SqlitePool,
        external_id: i64,
        delta: i64,
        increase: bool,
    ) -> Result<(), StoreError> {
        let signed_delta = if increase { delta } else { -delta };

        let result = sqlx::query("UPDATE users SET score = score + ? WHERE external_id = ?")
            .bind(signed_delta)
            .bind(external_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("user {external_id}")));
        }

        log_database_operation(
            "UPDATE",
            "users",
            Some(&format!("external_id={external_id} score{signed_delta:+}")),
        );
        Ok(())
    }

    /// Every user, highest score first. Ties come back in insertion order.
    pub async fn all_by_score(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, external_id, name, score FROM users ORDER BY score DESC, id ASC"
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
