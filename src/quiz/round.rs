use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::word_list::WordPair;

/// Literal text of the answer option that opens the leaderboard.
pub const RATING_OPTION: &str = "🏆 Рейтинг";

/// Literal text of the control that returns from the leaderboard to the game.
pub const CONTINUE_OPTION: &str = "▶️ Продолжить игру";

/// One question on screen: the prompt word and the buttons offered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRound {
    pub word: String,
    pub word_id: i64,
    pub correct_translation: String,
    /// Shuffled translations followed by [`RATING_OPTION`].
    pub options: Vec<String>,
}

impl QuizRound {
    /// Builds a round from an ordered candidate list. The first candidate is
    /// the prompt; every candidate's translation becomes an option. Returns
    /// `None` when there are no candidates.
    pub fn from_candidates<R: Rng + ?Sized>(
        candidates: &[WordPair],
        word_id: i64,
        rng: &mut R,
    ) -> Option<Self> {
        let prompt = candidates.first()?;

        let mut options: Vec<String> = Vec::with_capacity(candidates.len() + 1);
        for candidate in candidates {
            if !options.contains(&candidate.translation) {
                options.push(candidate.translation.clone());
            }
        }
        options.shuffle(rng);
        options.push(RATING_OPTION.to_string());

        Some(Self {
            word: prompt.source_text.clone(),
            word_id,
            correct_translation: prompt.translation.clone(),
            options,
        })
    }

    /// The distractors offered alongside the correct translation.
    pub fn distractors(&self) -> impl Iterator<Item = &String> {
        self.options
            .iter()
            .filter(move |option| *option != &self.correct_translation && option.as_str() != RATING_OPTION)
    }
}

/// Appends `extra` pairs whose source text is not already present, keeping
/// the order of `base` so its first entry stays the prompt.
pub fn merge_candidates(base: &mut Vec<WordPair>, extra: Vec<WordPair>) {
    for pair in extra {
        if !base.iter().any(|existing| existing.source_text == pair.source_text) {
            base.push(pair);
        }
    }
}
