//! Bulk word source.
//!
//! A flat `source,translation` file read once at startup. Draws sample from
//! the in-memory list and never rewrite the file, so one user's progress can
//! not starve another; per-user retirement is tracked by exposures instead.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::database::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPair {
    pub source_text: String,
    pub translation: String,
}

#[derive(Debug, Clone, Default)]
pub struct WordList {
    pairs: Vec<WordPair>,
}

impl WordList {
    pub fn new(pairs: Vec<WordPair>) -> Self {
        Self { pairs }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StoreError::MalformedBulkSource(format!("{}: {e}", path.display()))
        })?;

        let list = Self::parse(&contents);
        if list.is_empty() {
            return Err(StoreError::MalformedBulkSource(format!(
                "{}: no word pairs found",
                path.display()
            )));
        }

        debug!("Loaded {} word pairs from {}", list.len(), path.display());
        Ok(list)
    }

    /// Parses `source,translation` lines. The first line is a header; blank
    /// lines, lines without a comma and lines with an empty side are skipped,
    /// as are repeated source texts.
    pub fn parse(contents: &str) -> Self {
        let mut seen = HashSet::new();
        let pairs = contents
            .lines()
            .skip(1)
            .filter_map(|line| {
                let (source, translation) = line.split_once(',')?;
                let source = strip_quotes(source.trim());
                let translation = strip_quotes(translation.trim());
                if source.is_empty() || translation.is_empty() {
                    return None;
                }
                Some(WordPair {
                    source_text: source.to_string(),
                    translation: translation.to_string(),
                })
            })
            .filter(|pair| seen.insert(pair.source_text.clone()))
            .collect();

        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    /// Up to `count` distinct pairs whose source text is not in `exclude`,
    /// in random order.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
        exclude: &HashSet<String>,
    ) -> Vec<WordPair> {
        let eligible: Vec<&WordPair> = self
            .pairs
            .iter()
            .filter(|pair| !exclude.contains(&pair.source_text))
            .collect();

        eligible
            .choose_multiple(rng, count)
            .map(|pair| (*pair).clone())
            .collect()
    }
}

fn strip_quotes(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}
