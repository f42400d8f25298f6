//! Polarity scoring.
//!
//! A [`PolarityScorer`] turns free text into a continuous score in `[-1.0, 1.0]`, where
//! negative values mean negative sentiment. The default [`LexiconScorer`] averages the
//! polarity of known words, adjusting each for a preceding intensifier or negation.

use std::collections::HashMap;

use thiserror::Error;

/// Lower bound of every polarity score.
pub const MIN_SCORE: f64 = -1.0;
/// Upper bound of every polarity score.
pub const MAX_SCORE: f64 = 1.0;

/// Errors raised when a score cannot be produced.
#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("polarity scorer unavailable: {0}")]
    Unavailable(String),
    #[error("polarity scorer returned a non-finite score ({0})")]
    NonFinite(f64),
}

/// Something that can estimate the sentiment polarity of text.
///
/// Implementations must not fail on any valid UTF-8 input and must return `0.0` for text
/// with no recognizable words. Failure is reserved for the capability itself being
/// unusable (e.g. a missing language resource or an unreachable service).
pub trait PolarityScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<f64, ScorerError>;
}

/// Word polarities used by [`LexiconScorer::default`].
const WORDS: &[(&str, f64)] = &[
    ("happy", 0.8),
    ("glad", 0.5),
    ("great", 0.8),
    ("good", 0.7),
    ("better", 0.5),
    ("best", 1.0),
    ("love", 0.5),
    ("loved", 0.7),
    ("wonderful", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("excellent", 1.0),
    ("nice", 0.6),
    ("thankful", 0.6),
    ("grateful", 0.6),
    ("thanks", 0.2),
    ("hopeful", 0.5),
    ("calm", 0.3),
    ("peaceful", 0.5),
    ("proud", 0.8),
    ("excited", 0.4),
    ("fun", 0.3),
    ("beautiful", 0.85),
    ("kind", 0.6),
    ("helpful", 0.5),
    ("supportive", 0.5),
    ("strong", 0.4),
    ("safe", 0.5),
    ("relieved", 0.4),
    ("okay", 0.5),
    ("joy", 0.8),
    ("cheerful", 0.8),
    ("brave", 0.6),
    ("sad", -0.5),
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("hate", -0.8),
    ("angry", -0.5),
    ("upset", -0.5),
    ("hurt", -0.4),
    ("pain", -0.5),
    ("painful", -0.7),
    ("lonely", -0.3),
    ("hopeless", -0.8),
    ("empty", -0.1),
    ("depressed", -0.6),
    ("miserable", -1.0),
    ("tired", -0.4),
    ("exhausted", -0.5),
    ("afraid", -0.6),
    ("scared", -0.5),
    ("worried", -0.4),
    ("anxious", -0.3),
    ("nervous", -0.2),
    ("stressed", -0.4),
    ("overwhelmed", -0.5),
    ("worthless", -0.8),
    ("stupid", -0.8),
    ("pathetic", -1.0),
    ("disgusting", -1.0),
    ("ugly", -0.7),
    ("wrong", -0.5),
    ("broken", -0.4),
    ("failed", -0.5),
    ("failure", -0.6),
    ("useless", -0.5),
];

/// Multipliers applied to the word that directly follows them.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("too", 1.2),
    ("quite", 1.1),
    ("super", 1.3),
    ("totally", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.4),
];

/// Tokens that flip (and dampen) a polarity word up to two tokens later.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "hardly", "don't", "dont", "doesn't", "didn't", "isn't",
    "wasn't", "aren't", "can't", "cannot", "won't",
];

/// Factor applied to a negated word.
const NEGATION_FACTOR: f64 = -0.5;

/// Word-table polarity scorer.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::with_words(WORDS.iter().map(|&(w, p)| (w.to_owned(), p)))
    }
}

impl LexiconScorer {
    /// Build a scorer from a custom word table. Polarities are clamped into range.
    pub fn with_words(words: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            words: words
                .into_iter()
                .map(|(w, p)| (w.to_lowercase(), p.clamp(MIN_SCORE, MAX_SCORE)))
                .collect(),
        }
    }

    fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut sum = 0.0;
        let mut count = 0_u32;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(token.as_str()) else {
                continue;
            };

            let mut polarity = base;
            if let Some(prev) = i.checked_sub(1).map(|p| tokens[p].as_str()) {
                if let Some(&(_, factor)) = INTENSIFIERS.iter().find(|(w, _)| *w == prev) {
                    polarity = (polarity * factor).clamp(MIN_SCORE, MAX_SCORE);
                }
            }
            if tokens[i.saturating_sub(2)..i]
                .iter()
                .any(|t| NEGATORS.contains(&t.as_str()))
            {
                polarity *= NEGATION_FACTOR;
            }

            sum += polarity;
            count += 1;
        }

        if count == 0 {
            0.0
        } else {
            (sum / f64::from(count)).clamp(MIN_SCORE, MAX_SCORE)
        }
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<f64, ScorerError> {
        Ok(self.polarity(text))
    }
}

/// Split into lowercase word tokens. Apostrophes stay inside words so that "don't" survives.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}
