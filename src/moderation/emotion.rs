//! Emotion categorization for posts.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lexicon::{Lexicon, contains_any};

/// Scores strictly below this classify as sad when no keyword matched.
pub const SAD_THRESHOLD: f64 = -0.3;
/// Scores strictly above this classify as positive when no keyword matched.
pub const POSITIVE_THRESHOLD: f64 = 0.3;

/// The inferred emotional tone of a post.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EmotionCategory {
    Stressed,
    Anxious,
    Sad,
    Positive,
    Neutral,
}

impl EmotionCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stressed => "stressed",
            Self::Anxious => "anxious",
            Self::Sad => "sad",
            Self::Positive => "positive",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assign an emotion to `text` given its polarity `score`.
///
/// First match wins, and keyword checks take precedence over score thresholds: stress
/// terms, then anxiety terms, then sadness terms or a score below [`SAD_THRESHOLD`], then
/// a score above [`POSITIVE_THRESHOLD`]. Anything else is neutral.
pub fn classify(lexicon: &Lexicon, text: &str, score: f64) -> EmotionCategory {
    let text = text.to_lowercase();

    if contains_any(&text, &lexicon.stress) {
        EmotionCategory::Stressed
    } else if contains_any(&text, &lexicon.anxiety) {
        EmotionCategory::Anxious
    } else if contains_any(&text, &lexicon.sadness) || score < SAD_THRESHOLD {
        EmotionCategory::Sad
    } else if score > POSITIVE_THRESHOLD {
        EmotionCategory::Positive
    } else {
        EmotionCategory::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::default()
    }

    #[test]
    fn stress_terms_win_over_any_score() {
        let text = "I'm so stressed about my deadline at work";
        for score in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            assert_eq!(classify(&lexicon(), text, score), EmotionCategory::Stressed);
        }
    }

    #[test]
    fn order_is_stress_anxiety_sadness() {
        let l = lexicon();
        assert_eq!(
            classify(&l, "worried and sad about work", -0.9),
            EmotionCategory::Stressed
        );
        assert_eq!(
            classify(&l, "worried and sad tonight", 0.9),
            EmotionCategory::Anxious
        );
        assert_eq!(
            classify(&l, "I feel hopeless and empty", -0.5),
            EmotionCategory::Sad
        );
        assert_eq!(classify(&l, "so LONELY lately", 0.9), EmotionCategory::Sad);
    }

    #[test]
    fn thresholds_apply_without_keywords() {
        let l = lexicon();
        let text = "This is a neutral statement about the weather";
        assert_eq!(classify(&l, text, 0.0), EmotionCategory::Neutral);
        assert_eq!(classify(&l, text, 0.3), EmotionCategory::Neutral);
        assert_eq!(classify(&l, text, -0.3), EmotionCategory::Neutral);
        assert_eq!(classify(&l, text, 0.31), EmotionCategory::Positive);
        assert_eq!(classify(&l, text, -0.31), EmotionCategory::Sad);
    }

    #[test]
    fn injected_lexicon_replaces_builtin_terms() {
        let l = Lexicon {
            stress: vec!["exam".to_owned()],
            anxiety: vec![],
            sadness: vec![],
            toxicity: vec![],
        };
        assert_eq!(classify(&l, "Big EXAM tomorrow", 0.0), EmotionCategory::Stressed);
        assert_eq!(classify(&l, "so much work", 0.0), EmotionCategory::Neutral);
    }

    #[test]
    fn classify_is_repeatable() {
        let l = lexicon();
        let text = "nervous about tomorrow";
        assert_eq!(classify(&l, text, 0.2), classify(&l, text, 0.2));
    }
}
