//! The per-user quiz loop.
//!
//! [`QuizController::step`] takes the chat's pending [`Continuation`] and the
//! user's message and returns a [`Turn`]: the replies to send and the next
//! continuation. The controller holds no per-user memory between turns;
//! everything it needs is in the database or in the continuation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::database::connection::DatabaseManager;
use crate::database::error::StoreError;
use crate::database::models::{Exposure, User, Word};
use crate::quiz::rating;
use crate::quiz::round::{merge_candidates, QuizRound, CONTINUE_OPTION, RATING_OPTION};
use crate::quiz::state::{Continuation, Reply, Turn, UserAction};
use crate::quiz::word_list::{WordList, WordPair};
use crate::utils::logging::{
    log_database_error, log_turn_error, log_turn_start, log_turn_success, log_validation_error,
};
use crate::utils::markdown::{bold, escape_markdown};
use crate::utils::validation::validate_display_name;

/// Words offered per round, the prompt included.
pub const ROUND_SIZE: usize = 4;

pub const CORRECT_ANSWER_POINTS: i64 = 1;
pub const WRONG_ANSWER_PENALTY: i64 = 3;

const ASK_NAME: &str = "Как я могу к вам обращаться?";
const GAME_CONTINUES: &str = "Игра продолжается\\!\\!";
const CORRECT_ANSWER: &str = "Превосходно\\! Вы справились\\! 🌟 \\+1 балл\\!";
const NO_WORDS: &str = "Словарь пока пуст\\. Загляните позже и отправьте /start\\.";
const RATING_HEADER: &str = "🏆 *Рейтинг игроков*";

/// Tunables passed in from [`crate::config::Config`].
#[derive(Debug, Clone, Copy)]
pub struct QuizSettings {
    pub exposure_threshold: i64,
}

pub struct QuizController {
    db: DatabaseManager,
    words: Arc<WordList>,
    settings: QuizSettings,
    rng: Mutex<StdRng>,
}

impl QuizController {
    pub fn new(db: DatabaseManager, words: Arc<WordList>, settings: QuizSettings) -> Self {
        Self::from_rng(db, words, settings, StdRng::from_entropy())
    }

    /// Deterministic controller for tests.
    pub fn with_seed(
        db: DatabaseManager,
        words: Arc<WordList>,
        settings: QuizSettings,
        seed: u64,
    ) -> Self {
        Self::from_rng(db, words, settings, StdRng::seed_from_u64(seed))
    }

    fn from_rng(
        db: DatabaseManager,
        words: Arc<WordList>,
        settings: QuizSettings,
        rng: StdRng,
    ) -> Self {
        Self {
            db,
            words,
            settings,
            rng: Mutex::new(rng),
        }
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.db.pool
    }

    /// Dispatches `action` to the handler the chat is armed for.
    pub async fn step(&self, continuation: Continuation, action: &UserAction) -> Turn {
        let (step, result) = match continuation {
            Continuation::Idle => ("idle", Ok(Turn::new(Vec::new(), Continuation::Idle))),
            Continuation::AwaitingName => ("capture_name", self.capture_name(action).await),
            Continuation::AwaitingAnswer {
                word_id,
                correct_translation,
            } => (
                "evaluate",
                self.evaluate(action, word_id, &correct_translation).await,
            ),
            Continuation::ViewingRating => ("resume", self.start_round(action).await),
        };

        Self::finish(step, action, result)
    }

    /// Entry point for `/start`, valid from any state.
    pub async fn begin(&self, action: &UserAction) -> Turn {
        let result = self.try_begin(action).await;
        Self::finish("begin", action, result)
    }

    /// Leaderboard on demand; leaves the pending continuation in place.
    pub async fn show_rating(&self, action: &UserAction, continuation: Continuation) -> Turn {
        log_turn_start("rating", action.external_id, action.chat_id, None);
        let result = rating::render_for_user(self.pool(), action.external_id)
            .await
            .map(|text| {
                Turn::new(
                    vec![Reply::text(format!("{RATING_HEADER}\n\n{text}"))],
                    continuation,
                )
            });

        Self::finish("rating", action, result)
    }

    fn finish(step: &str, action: &UserAction, result: Result<Turn, StoreError>) -> Turn {
        match result {
            Ok(turn) => {
                log_turn_success(
                    step,
                    action.external_id,
                    action.chat_id,
                    Some(&format!("{} replies, next {:?}", turn.replies.len(), turn.next)),
                );
                turn
            }
            Err(e) => {
                log_turn_error(
                    step,
                    action.external_id,
                    action.chat_id,
                    &format!("{}: {}", e.kind(), e),
                );
                Turn::silent()
            }
        }
    }

    async fn try_begin(&self, action: &UserAction) -> Result<Turn, StoreError> {
        log_turn_start("begin", action.external_id, action.chat_id, None);

        match User::find_by_external_id(self.pool(), action.external_id).await? {
            None => Ok(Turn::new(
                vec![Reply::removing_keyboard(ASK_NAME)],
                Continuation::AwaitingName,
            )),
            Some(user) => {
                debug!("Returning player {} ({})", user.name, user.external_id);
                Ok(self.start_round(action).await?.prepend(Reply::text(GAME_CONTINUES)))
            }
        }
    }

    async fn capture_name(&self, action: &UserAction) -> Result<Turn, StoreError> {
        log_turn_start("capture_name", action.external_id, action.chat_id, None);

        let name = match validate_display_name(&action.text) {
            Ok(name) => name,
            Err(e) => {
                log_validation_error(
                    "name",
                    &action.text,
                    &e.to_string(),
                    action.external_id,
                    action.chat_id,
                );
                return Ok(Turn::new(
                    vec![Reply::text(format!(
                        "{}\n{}",
                        escape_markdown(&e.to_string()),
                        ASK_NAME
                    ))],
                    Continuation::AwaitingName,
                ));
            }
        };

        let user = match User::create(self.pool(), &name, action.external_id).await {
            Ok(user) => user,
            Err(StoreError::Duplicate(what)) => {
                warn!("Skipped registering {}: already present", what);
                User::find_by_external_id(self.pool(), action.external_id)
                    .await?
                    .ok_or_else(|| StoreError::NotFound(format!("user {}", action.external_id)))?
            }
            Err(e) => return Err(e),
        };

        let greeting = format!(
            "Приятно познакомиться, {}\\!\nДа начнется игра\\!\\!",
            escape_markdown(&user.name)
        );
        Ok(self.start_round(action).await?.prepend(Reply::text(greeting)))
    }

    async fn start_round(&self, action: &UserAction) -> Result<Turn, StoreError> {
        let user = User::find_by_external_id(self.pool(), action.external_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", action.external_id)))?;

        let candidates = self.draw_candidates(user.id).await?;
        let Some(prompt) = candidates.first() else {
            warn!("No words available for user {}", user.external_id);
            return Ok(Turn::new(
                vec![Reply::removing_keyboard(NO_WORDS)],
                Continuation::Idle,
            ));
        };

        let word_id = Word::find_id_by_text(self.pool(), &prompt.source_text)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("word '{}'", prompt.source_text)))?;
        Exposure::ensure(self.pool(), user.id, word_id).await?;

        let round = self
            .with_rng(|rng| QuizRound::from_candidates(&candidates, word_id, rng))
            .ok_or_else(|| StoreError::NotFound("round candidates".to_string()))?;
        debug!(
            "Round for user {}: '{}' with {} distractors",
            user.external_id,
            round.word,
            round.distractors().count()
        );

        let question = format!("Как перевести слово {}?", bold(&escape_markdown(&round.word)));
        Ok(Turn::new(
            vec![Reply::with_options(question, round.options)],
            Continuation::AwaitingAnswer {
                word_id: round.word_id,
                correct_translation: round.correct_translation,
            },
        ))
    }

    async fn evaluate(
        &self,
        action: &UserAction,
        word_id: i64,
        correct_translation: &str,
    ) -> Result<Turn, StoreError> {
        log_turn_start(
            "evaluate",
            action.external_id,
            action.chat_id,
            Some(&format!("word_id={word_id}")),
        );

        if action.text == correct_translation {
            let user = User::find_by_external_id(self.pool(), action.external_id)
                .await?
                .ok_or_else(|| StoreError::NotFound(format!("user {}", action.external_id)))?;
            User::adjust_score(self.pool(), action.external_id, CORRECT_ANSWER_POINTS, true).await?;
            Exposure::record(self.pool(), user.id, word_id).await?;

            return Ok(self.start_round(action).await?.prepend(Reply::text(CORRECT_ANSWER)));
        }

        if action.text == RATING_OPTION {
            let text = rating::render_for_user(self.pool(), action.external_id).await?;
            return Ok(Turn::new(
                vec![Reply::with_options(
                    format!("{RATING_HEADER}\n\n{text}"),
                    vec![CONTINUE_OPTION.to_string()],
                )],
                Continuation::ViewingRating,
            ));
        }

        if action.text == CONTINUE_OPTION {
            // A stale tap on the rating view's button is not an answer
            debug!("Repeated continue from user {}", action.external_id);
            return self.start_round(action).await;
        }

        User::adjust_score(self.pool(), action.external_id, WRONG_ANSWER_PENALTY, false).await?;
        let consolation = format!(
            "Не совсем так\\. Правильный ответ: {}\\. Но не отчаивайтесь\\! 💔 \\-3 балла\\!",
            bold(&escape_markdown(correct_translation))
        );
        Ok(self.start_round(action).await?.prepend(Reply::text(consolation)))
    }

    /// Picks one of the two candidate strategies at random. Either way the
    /// result has at most [`ROUND_SIZE`] distinct words, none of them retired
    /// for this user.
    async fn draw_candidates(&self, user_id: i64) -> Result<Vec<WordPair>, StoreError> {
        let bulk_first = self.with_rng(|rng| rng.gen_bool(0.5));

        let mut candidates = if bulk_first {
            let mut drawn = self.draw_from_bulk(user_id, ROUND_SIZE).await?;
            if drawn.len() < ROUND_SIZE {
                let extra = self.draw_from_store(user_id, ROUND_SIZE).await?;
                merge_candidates(&mut drawn, extra);
            }
            drawn
        } else {
            let mut drawn = self.draw_from_store(user_id, ROUND_SIZE).await?;
            if drawn.len() < ROUND_SIZE {
                let extra = self.draw_from_bulk(user_id, ROUND_SIZE).await?;
                merge_candidates(&mut drawn, extra);
            }
            drawn
        };

        candidates.truncate(ROUND_SIZE);
        Ok(candidates)
    }

    /// Samples the bulk list, saving words the store has not seen yet.
    async fn draw_from_bulk(&self, user_id: i64, count: usize) -> Result<Vec<WordPair>, StoreError> {
        if self.words.is_empty() {
            return Ok(Vec::new());
        }

        let exhausted =
            Word::exhausted_texts(self.pool(), user_id, self.settings.exposure_threshold).await?;
        let drawn = self.with_rng(|rng| self.words.sample(rng, count, &exhausted));

        for pair in &drawn {
            if Word::find_id_by_text(self.pool(), &pair.source_text).await?.is_some() {
                continue;
            }
            match Word::create(self.pool(), &pair.source_text, &pair.translation).await {
                Ok(_) => {}
                Err(StoreError::Duplicate(what)) => {
                    log_database_error("INSERT", "words", "duplicate", Some(&what));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(drawn)
    }

    async fn draw_from_store(&self, user_id: i64, count: usize) -> Result<Vec<WordPair>, StoreError> {
        let words =
            Word::draw_unexhausted(self.pool(), user_id, count, self.settings.exposure_threshold)
                .await?;

        Ok(words
            .into_iter()
            .map(|word| WordPair {
                source_text: word.source_text,
                translation: word.translation,
            })
            .collect())
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}
