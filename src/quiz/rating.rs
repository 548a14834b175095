//! Leaderboard computation and rendering.
//!
//! The view is always relative to the user asking for it: the podium is
//! shown, and the user's own row is appended (or reached) when they are
//! below it.

use crate::database::error::StoreError;
use crate::database::models::User;
use crate::utils::markdown::{bold, escape_markdown};

/// Users ranked 1..=PODIUM_SIZE are always shown.
const PODIUM_SIZE: usize = 3;

/// Users ranked at most this far down see every row above them.
const CONTIGUOUS_LIMIT: usize = 5;

const ELLIPSIS_LINE: &str = "…";

pub const NOT_FOUND_MESSAGE: &str = "Вас пока нет в рейтинге\\. Отправьте /start, чтобы присоединиться к игре\\!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingEntry {
    pub external_id: i64,
    pub name: String,
    pub score: i64,
}

impl From<User> for RatingEntry {
    fn from(user: User) -> Self {
        Self {
            external_id: user.external_id,
            name: user.name,
            score: user.score,
        }
    }
}

/// Orders entries by score, highest first. The sort is stable, so ties keep
/// the order they arrived in.
pub fn rank_entries(mut entries: Vec<RatingEntry>) -> Vec<RatingEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}

/// Loads every user and ranks them.
pub async fn compute_ranking(pool: &sqlx::SqlitePool) -> Result<Vec<RatingEntry>, StoreError> {
    let users = User::all_by_score(pool).await?;
    Ok(rank_entries(users.into_iter().map(RatingEntry::from).collect()))
}

/// Loads the ranking and renders it for `external_id`.
pub async fn render_for_user(
    pool: &sqlx::SqlitePool,
    external_id: i64,
) -> Result<String, StoreError> {
    let ranking = compute_ranking(pool).await?;
    Ok(render_ranking(&ranking, external_id))
}

/// Renders `ranking` as MarkdownV2 lines, bolding the row of `external_id`.
pub fn render_ranking(ranking: &[RatingEntry], external_id: i64) -> String {
    let Some(position) = ranking.iter().position(|e| e.external_id == external_id) else {
        return NOT_FOUND_MESSAGE.to_string();
    };
    let rank = position + 1;

    let mut lines = Vec::new();
    if rank <= CONTIGUOUS_LIMIT {
        let shown = rank.max(PODIUM_SIZE).min(ranking.len());
        for (index, entry) in ranking.iter().take(shown).enumerate() {
            lines.push(format_row(index + 1, entry, index == position));
        }
    } else {
        for (index, entry) in ranking.iter().take(PODIUM_SIZE).enumerate() {
            lines.push(format_row(index + 1, entry, false));
        }
        lines.push(ELLIPSIS_LINE.to_string());
        lines.push(format_row(rank, &ranking[position], true));
    }

    lines.join("\n")
}

fn rank_marker(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{n}."),
    }
}

fn format_row(rank: usize, entry: &RatingEntry, highlight: bool) -> String {
    let row = escape_markdown(&format!(
        "{} {} - \"{} очков\"",
        rank_marker(rank),
        entry.name,
        entry.score
    ));
    if highlight {
        bold(&row)
    } else {
        row
    }
}
